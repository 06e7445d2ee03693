// What survives a scene change

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::engine::assets::{AssetError, AssetLoader, AssetType};

/// The knight's persisted fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnightSaveData {
    pub life: f32,
    pub died: bool,
}

impl KnightSaveData {
    /// Write the save slot `name` under the saves directory
    pub fn store(&self, loader: &AssetLoader, name: &str) -> Result<(), AssetError> {
        loader.save_ron(AssetType::Save, name, self)?;
        Ok(())
    }

    pub fn load(loader: &AssetLoader, name: &str) -> Result<Self, AssetError> {
        loader.load_ron(AssetType::Save, name)
    }
}

/// Where the knight appears in the next scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec2,
    pub facing_right: bool,
    /// Side doors make the knight walk in for a moment
    pub horizontal_door: bool,
}

impl SpawnPoint {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            facing_right: true,
            horizontal_door: false,
        }
    }

    pub fn facing(&self) -> f32 {
        if self.facing_right {
            1.0
        } else {
            -1.0
        }
    }
}

/// Everything the knight is told when a new scene starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransition {
    pub spawn: SpawnPoint,
    pub save: KnightSaveData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_slot_round_trip() {
        let dir = std::env::temp_dir().join(format!("rusted-knight-save-{}", std::process::id()));
        let loader = AssetLoader::new(&dir);
        let data = KnightSaveData {
            life: 35.0,
            died: false,
        };

        data.store(&loader, "knight.ron").unwrap();
        assert_eq!(KnightSaveData::load(&loader, "knight.ron").unwrap(), data);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_spawn_facing() {
        let mut spawn = SpawnPoint::new(Vec2::ZERO);
        assert_eq!(spawn.facing(), 1.0);
        spawn.facing_right = false;
        assert_eq!(spawn.facing(), -1.0);
    }
}
