// Asset management system
//
// Loads and stores the RON documents the game runs on: character tuning
// and save data.

mod loader;

pub use loader::{from_ron_str, to_ron_string, AssetLoader, AssetType};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to parse asset: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Failed to serialize asset: {0}")]
    Serialize(#[from] ron::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::NotFound("knight.ron".to_string());
        assert_eq!(err.to_string(), "Asset not found: knight.ron");
    }

    #[test]
    fn test_parse_error_converts() {
        let parsed: Result<u32, _> = ron::from_str("not a number");
        let err: AssetError = parsed.unwrap_err().into();
        assert!(matches!(err, AssetError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse asset"));
    }
}
