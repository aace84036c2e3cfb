//! Campaign progress persisted between runs: per-level high scores,
//! completed levels and permanently unlocked weapons.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use raycast_shooter::entities::{GameState, GameStatus, WeaponType};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Progress {
    pub completed_levels: BTreeSet<usize>,
    pub high_scores: BTreeMap<usize, u32>,
    pub unlocked_weapons: BTreeSet<WeaponType>,
}

impl Progress {
    /// A missing or unreadable file starts a fresh campaign.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&text) {
            Ok(progress) => progress,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Ignoring corrupt progress file");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write progress to {}", path.display()))?;
        Ok(())
    }

    pub fn high_score(&self, level: usize) -> u32 {
        self.high_scores.get(&level).copied().unwrap_or(0)
    }

    pub fn is_completed(&self, level: usize) -> bool {
        self.completed_levels.contains(&level)
    }

    /// Starting arsenal: the pistol plus everything picked up before.
    pub fn arsenal(&self) -> Vec<WeaponType> {
        let mut arsenal = vec![WeaponType::Pistol];
        arsenal.extend(
            self.unlocked_weapons
                .iter()
                .copied()
                .filter(|&w| w != WeaponType::Pistol),
        );
        arsenal
    }

    /// Fold the outcome of a play session into the record. Returns true
    /// when anything changed.
    pub fn record(&mut self, level: usize, state: &GameState) -> bool {
        let mut changed = false;

        if state.score > self.high_score(level) {
            info!(level, score = state.score, "New high score");
            self.high_scores.insert(level, state.score);
            changed = true;
        }
        if state.status == GameStatus::LevelComplete {
            changed |= self.completed_levels.insert(level);
        }
        for &weapon in &state.player.arsenal {
            changed |= self.unlocked_weapons.insert(weapon);
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arsenal_always_starts_with_pistol() {
        let mut progress = Progress::default();
        assert_eq!(progress.arsenal(), vec![WeaponType::Pistol]);

        progress.unlocked_weapons.insert(WeaponType::Rifle);
        progress.unlocked_weapons.insert(WeaponType::Pistol);
        assert_eq!(progress.arsenal(), vec![WeaponType::Pistol, WeaponType::Rifle]);
    }

    #[test]
    fn corrupt_file_falls_back_to_default() {
        let path = std::env::temp_dir().join(format!("raycast_progress_{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Progress::load(&path), Progress::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_then_load_keeps_scores() {
        let path = std::env::temp_dir().join(format!("raycast_progress_rt_{}.json", std::process::id()));
        let mut progress = Progress::default();
        progress.high_scores.insert(1, 400);
        progress.completed_levels.insert(0);
        progress.save(&path).unwrap();

        let loaded = Progress::load(&path);
        assert_eq!(loaded.high_score(1), 400);
        assert!(loaded.is_completed(0));
        assert!(!loaded.is_completed(1));
        let _ = fs::remove_file(&path);
    }
}
