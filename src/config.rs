//! Tool settings (regions.yaml) parsing.
//!
//! Settings hold the defaults the command line falls back to: the mask
//! mode, the subpixel factor, where PNGs go and how large a mask may get.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RegionError, Result};
use crate::render::MaskMode;

/// Default settings file name.
pub const SETTINGS_FILE: &str = "regions.yaml";

/// Settings loaded from regions.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mask mode name: center, subpixels or exact.
    pub mode: String,

    /// Subpixel factor used by the subpixels mode.
    pub subpixels: i64,

    /// Output directory for rendered masks.
    pub output: PathBuf,

    /// Integer scale factor for PNG output.
    pub scale: u32,

    /// Largest mask, in pixels, before validation warns.
    pub max_mask_pixels: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: "center".to_string(),
            subpixels: MaskMode::DEFAULT_SUBPIXELS,
            output: PathBuf::from("dist"),
            scale: 1,
            max_mask_pixels: 16_777_216,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RegionError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read settings: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load `path` if given, else `regions.yaml` in the working directory
    /// when it exists, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(SETTINGS_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse settings from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| RegionError::Parse {
            message: format!("Invalid settings: {}", e),
            help: Some(format!("Check {} syntax", SETTINGS_FILE)),
        })
    }

    /// The configured mask mode.
    pub fn mask_mode(&self) -> Result<MaskMode> {
        MaskMode::parse(&self.mode, self.subpixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_empty() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.mask_mode().unwrap(), MaskMode::Center);
    }

    #[test]
    fn test_parse_partial() {
        let settings = Settings::parse("mode: subpixels\nsubpixels: 8\n").unwrap();
        assert_eq!(settings.mask_mode().unwrap(), MaskMode::Subpixels(8));
        assert_eq!(settings.output, PathBuf::from("dist"));
        assert_eq!(settings.max_mask_pixels, 16_777_216);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            Settings::parse("mode: [unclosed"),
            Err(RegionError::Parse { .. })
        ));
    }

    #[test]
    fn test_bad_mode_surfaces_on_use() {
        let settings = Settings::parse("mode: bogus").unwrap();
        assert!(matches!(
            settings.mask_mode(),
            Err(RegionError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "output: masks\nscale: 4\n").unwrap();

        let settings = Settings::discover(Some(&path)).unwrap();
        assert_eq!(settings.output, PathBuf::from("masks"));
        assert_eq!(settings.scale, 4);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Settings::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, RegionError::Io { .. }));
    }
}
