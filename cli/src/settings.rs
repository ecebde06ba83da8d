//! Settings file handling
//!
//! Defaults for every command can live in `glyphmap.toml` in the working
//! directory or in a file passed with `--config`. Command-line flags win
//! over the file, the file wins over built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SETTINGS_FILE: &str = "glyphmap.toml";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub render: RenderSettings,
    pub mono: MonoSettings,
    pub colour: ColourSettings,
}

/// Shared by both commands
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    pub max_height: Option<u32>,
    pub max_width: Option<u32>,
    pub h_stretch: Option<f32>,
    /// File extension of images to pick up from an input directory
    pub extension: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonoSettings {
    pub output: Option<PathBuf>,
    pub buckets: Option<usize>,
    pub reverse: Option<bool>,
    pub symbols: Option<String>,
    pub font: Option<PathBuf>,
    pub cache: Option<PathBuf>,
    pub line_height: Option<f32>,
    pub font_size: Option<f32>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColourSettings {
    pub output: Option<PathBuf>,
    pub symbol: Option<String>,
    pub clusters: Option<Vec<usize>>,
    pub background: Option<String>,
    pub browser: Option<String>,
    pub line_height: Option<f32>,
    pub font_size: Option<f32>,
}

impl Settings {
    /// Load settings from `path`, or from the default file if it exists.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
        };

        if !required && !path.exists() {
            log::debug!("no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let settings: Settings = toml::from_str(
            r#"
            [render]
            max_height = 200
            h_stretch = 2.0
            extension = "png"

            [mono]
            buckets = 40
            reverse = true
            font = "fonts/DejaVuSansMono.ttf"

            [colour]
            clusters = [5, 10, 15]
            background = "black"
            "#,
        )
        .unwrap();

        assert_eq!(settings.render.max_height, Some(200));
        assert_eq!(settings.render.max_width, None);
        assert_eq!(settings.render.extension.as_deref(), Some("png"));
        assert_eq!(settings.mono.buckets, Some(40));
        assert_eq!(settings.mono.reverse, Some(true));
        assert_eq!(
            settings.mono.font,
            Some(PathBuf::from("fonts/DejaVuSansMono.ttf"))
        );
        assert_eq!(settings.colour.clusters, Some(vec![5, 10, 15]));
        assert_eq!(settings.colour.background.as_deref(), Some("black"));
    }

    #[test]
    fn test_empty_file_is_default() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glyphmap.toml");
        std::fs::write(&path, "[colour]\nsymbol = \"@\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.colour.symbol.as_deref(), Some("@"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[mono]\nbuckets = \"many\"\n").unwrap();
        assert!(Settings::load(Some(&path)).is_err());
    }
}
