// Asset loading functionality

use super::AssetError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Supported asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    /// Character and gameplay tuning
    Config,
    /// Persisted game state
    Save,
}

impl AssetType {
    /// Get the default directory for this asset type
    pub fn default_directory(&self) -> &'static str {
        match self {
            AssetType::Config => "config",
            AssetType::Save => "saves",
        }
    }

    /// Get supported file extensions for this asset type
    pub fn extensions(&self) -> &'static [&'static str] {
        &["ron"]
    }
}

/// Asset loader responsible for finding, reading and writing asset files
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset
    pub fn resolve_path(&self, asset_type: AssetType, name: &str) -> PathBuf {
        self.base_path
            .join(asset_type.default_directory())
            .join(name)
    }

    /// Load asset bytes from disk
    pub fn load_bytes(&self, asset_type: AssetType, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve_path(asset_type, name);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
        }

        Ok(std::fs::read(&path)?)
    }

    /// Load and deserialize a RON asset
    pub fn load_ron<T: DeserializeOwned>(&self, asset_type: AssetType, name: &str) -> Result<T, AssetError> {
        let bytes = self.load_bytes(asset_type, name)?;
        let text = String::from_utf8_lossy(&bytes);
        from_ron_str(&text)
    }

    /// Serialize and write a RON asset, creating its directory if needed
    pub fn save_ron<T: Serialize>(&self, asset_type: AssetType, name: &str, value: &T) -> Result<PathBuf, AssetError> {
        let path = self.resolve_path(asset_type, name);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&path, to_ron_string(value)?)?;
        log::debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Check if an asset exists
    pub fn exists(&self, asset_type: AssetType, name: &str) -> bool {
        self.resolve_path(asset_type, name).exists()
    }

    /// List all assets of a given type
    pub fn list_assets(&self, asset_type: AssetType) -> Result<Vec<String>, AssetError> {
        let dir = self.base_path.join(asset_type.default_directory());

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut assets = Vec::new();
        let extensions = asset_type.extensions();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            let matches = path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| extensions.contains(&ext.to_string_lossy().as_ref()));
            if matches {
                if let Some(name) = path.file_name() {
                    assets.push(name.to_string_lossy().to_string());
                }
            }
        }

        assets.sort();
        Ok(assets)
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Parse a RON document
pub fn from_ron_str<T: DeserializeOwned>(text: &str) -> Result<T, AssetError> {
    Ok(ron::from_str(text)?)
}

/// Render a value as pretty RON
pub fn to_ron_string<T: Serialize>(value: &T) -> Result<String, AssetError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());
    Ok(ron::ser::to_string_pretty(value, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        speed: f32,
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rusted-knight-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_asset_type_directories() {
        assert_eq!(AssetType::Config.default_directory(), "config");
        assert_eq!(AssetType::Save.default_directory(), "saves");
        assert!(AssetType::Config.extensions().contains(&"ron"));
    }

    #[test]
    fn test_loader_path_resolution() {
        let loader = AssetLoader::new("/game/assets");
        let path = loader.resolve_path(AssetType::Config, "knight.ron");

        assert_eq!(path, PathBuf::from("/game/assets/config/knight.ron"));
    }

    #[test]
    fn test_missing_asset_is_not_found() {
        let loader = AssetLoader::new(scratch_dir("missing"));
        let result: Result<Sample, _> = loader.load_ron(AssetType::Config, "nope.ron");
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_save_then_load_ron() {
        let dir = scratch_dir("roundtrip");
        let loader = AssetLoader::new(&dir);
        let sample = Sample {
            name: "knight".into(),
            speed: 7.5,
        };

        loader.save_ron(AssetType::Save, "slot0.ron", &sample).unwrap();
        assert!(loader.exists(AssetType::Save, "slot0.ron"));
        assert_eq!(loader.list_assets(AssetType::Save).unwrap(), vec!["slot0.ron"]);

        let loaded: Sample = loader.load_ron(AssetType::Save, "slot0.ron").unwrap();
        assert_eq!(loaded, sample);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let result: Result<Sample, _> = from_ron_str("(name: \"knight\", speed: )");
        assert!(matches!(result, Err(AssetError::Parse(_))));
    }
}
