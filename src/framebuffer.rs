//! Software frame buffer with immediate-mode 2D drawing primitives.
//!
//! Coordinates are floating point, like a canvas: a pixel is covered when
//! its centre lies inside the shape. Everything is clipped to the buffer.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB`
    pub const fn hex(value: u32) -> Self {
        Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Rgb::BLACK; width * height];
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn row(&self, y: usize) -> &[Rgb] {
        if y >= self.height {
            return &[];
        }
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Pixel index span `[start, end)` whose centres fall in `[a, b)`.
    fn span(a: f32, b: f32, limit: usize) -> (usize, usize) {
        if a.is_nan() || b.is_nan() {
            return (0, 0);
        }
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let clamp = |v: f32| v.round().clamp(0.0, limit as f32) as usize;
        (clamp(lo), clamp(hi))
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        let (x0, x1) = Self::span(x, x + w, self.width);
        let (y0, y1) = Self::span(y, y + h, self.height);
        for py in y0..y1 {
            let row = py * self.width;
            self.pixels[row + x0..row + x1].fill(color);
        }
    }

    /// Outline centred on the rectangle's edges.
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, line_width: f32, color: Rgb) {
        let half = line_width / 2.0;
        self.fill_rect(x - half, y - half, w + line_width, line_width, color);
        self.fill_rect(x - half, y + h - half, w + line_width, line_width, color);
        self.fill_rect(x - half, y - half, line_width, h + line_width, color);
        self.fill_rect(x + w - half, y - half, line_width, h + line_width, color);
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        if radius <= 0.0 {
            return;
        }
        let (x0, x1) = Self::span(cx - radius, cx + radius, self.width);
        let (y0, y1) = Self::span(cy - radius, cy + radius, self.height);
        let r2 = radius * radius;
        for py in y0..y1 {
            let dy = py as f32 + 0.5 - cy;
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    self.pixels[py * self.width + px] = color;
                }
            }
        }
    }

    /// Straight stroke of the given width.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Rgb) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let samples = (dx.abs().max(dy.abs()) * 2.0).ceil().max(1.0) as u32;
        let half = width / 2.0;
        for i in 0..=samples {
            let t = i as f32 / samples as f32;
            self.fill_rect(x0 + dx * t - half, y0 + dy * t - half, width, width, color);
        }
    }

    /// Even-odd scanline fill of a closed polygon.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let (y0, y1) = Self::span(min_y, max_y, self.height);

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for py in y0..y1 {
            let sy = py as f32 + 0.5;
            crossings.clear();
            for (i, &(ax, ay)) in points.iter().enumerate() {
                let (bx, by) = points[(i + 1) % points.len()];
                if (ay <= sy && by > sy) || (by <= sy && ay > sy) {
                    crossings.push(ax + (sy - ay) / (by - ay) * (bx - ax));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let (x0, x1) = Self::span(pair[0], pair[1], self.width);
                let row = py * self.width;
                self.pixels[row + x0..row + x1].fill(color);
            }
        }
    }
}
