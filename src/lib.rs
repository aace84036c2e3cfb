//! Ray-casting first-person shooter core.
//!
//! The library holds everything that is pure simulation or pure drawing:
//! the tile grid, the ray caster, the entity model, the per-tick
//! simulation step, the software renderer and the fixed-timestep driver.
//! Terminal I/O lives in the binary.

pub mod compute;
pub mod config;
pub mod entities;
pub mod framebuffer;
pub mod game_loop;
pub mod input;
pub mod map;
pub mod raycast;
pub mod render;
