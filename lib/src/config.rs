use crate::alphabet::Alphabet;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Bounding box of the output grid, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxSize {
    pub height: u32,
    pub width: u32,
}

impl Default for MaxSize {
    fn default() -> Self {
        Self {
            height: 300,
            width: 300,
        }
    }
}

/// How cells get their symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColorMode {
    /// Grayscale: each cell's luminance picks a symbol from a ranked alphabet
    Luminance {
        /// Alphabet to rank; `None` uses the default printable set
        #[serde(default)]
        symbols: Option<Vec<String>>,
        #[serde(default = "default_num_buckets")]
        num_buckets: usize,
        /// Rank by descending coverage instead of ascending
        #[serde(default)]
        reverse: bool,
    },

    /// Colour: every cell draws the same symbol and carries the pixel colour
    Colour {
        #[serde(default = "default_symbol")]
        symbol: String,
        /// Quantize the palette to this many colours first
        #[serde(default)]
        num_clusters: Option<usize>,
    },
}

/// Luminance buckets when none are configured
pub const DEFAULT_NUM_BUCKETS: usize = 80;

fn default_num_buckets() -> usize {
    DEFAULT_NUM_BUCKETS
}

fn default_symbol() -> String {
    "#".to_string()
}

impl ColorMode {
    pub fn luminance() -> Self {
        ColorMode::Luminance {
            symbols: None,
            num_buckets: default_num_buckets(),
            reverse: false,
        }
    }

    pub fn colour() -> Self {
        ColorMode::Colour {
            symbol: default_symbol(),
            num_clusters: None,
        }
    }

    /// The alphabet a luminance rendering ranks; `None` for colour
    pub fn alphabet(&self) -> Result<Option<Alphabet>> {
        match self {
            ColorMode::Luminance {
                symbols: Some(symbols),
                ..
            } => Alphabet::new(symbols.iter().cloned()).map(Some),
            ColorMode::Luminance { symbols: None, .. } => Ok(Some(Alphabet::default())),
            ColorMode::Colour { .. } => Ok(None),
        }
    }
}

/// Configuration for a single image conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub max_size: MaxSize,

    /// Horizontal stretch applied after fitting, default 1.5
    #[serde(default = "default_h_stretch")]
    pub h_stretch: f32,

    #[serde(flatten)]
    pub mode: ColorMode,
}

fn default_h_stretch() -> f32 {
    1.5
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_size: MaxSize::default(),
            h_stretch: default_h_stretch(),
            mode: ColorMode::luminance(),
        }
    }
}

impl RenderConfig {
    pub fn colour() -> Self {
        Self {
            mode: ColorMode::colour(),
            ..Default::default()
        }
    }

    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.max_size.height == 0 || self.max_size.width == 0 {
            return Err(Error::config(format!(
                "max_size must be non-zero, got {}x{}",
                self.max_size.height, self.max_size.width
            )));
        }
        if !self.h_stretch.is_finite() || self.h_stretch <= 0.0 {
            return Err(Error::config(format!(
                "h_stretch must be positive, got {}",
                self.h_stretch
            )));
        }

        match &self.mode {
            ColorMode::Luminance { num_buckets, .. } => {
                if *num_buckets == 0 {
                    return Err(Error::config("num_buckets must be at least 1"));
                }
                // Surfaces empty or duplicated symbol lists
                self.mode.alphabet()?;
            }
            ColorMode::Colour {
                symbol,
                num_clusters,
            } => {
                if symbol.is_empty() {
                    return Err(Error::config("colour symbol must not be empty"));
                }
                if *num_clusters == Some(0) {
                    return Err(Error::config("num_clusters must be at least 1"));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert!(RenderConfig::colour().validate().is_ok());
    }

    #[test]
    fn test_invalid_max_size() {
        let mut config = RenderConfig::default();
        config.max_size.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_h_stretch() {
        let mut config = RenderConfig::default();
        config.h_stretch = 0.0;
        assert!(config.validate().is_err());

        config.h_stretch = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_buckets() {
        let config = RenderConfig {
            mode: ColorMode::Luminance {
                symbols: None,
                num_buckets: 0,
                reverse: false,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_symbols() {
        let config = RenderConfig {
            mode: ColorMode::Luminance {
                symbols: Some(vec!["a".into(), "a".into()]),
                num_buckets: 1,
                reverse: false,
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_invalid_colour() {
        let config = RenderConfig {
            mode: ColorMode::Colour {
                symbol: String::new(),
                num_clusters: None,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RenderConfig {
            mode: ColorMode::Colour {
                symbol: "#".into(),
                num_clusters: Some(0),
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_alphabet_for_mode() {
        assert_eq!(ColorMode::luminance().alphabet().unwrap().unwrap().len(), 94);
        assert!(ColorMode::colour().alphabet().unwrap().is_none());
    }

    #[test]
    fn test_deserialize_luminance() {
        let config: RenderConfig = serde_json::from_str(
            r#"{"max_size": {"height": 100, "width": 300}, "mode": "luminance", "num_buckets": 12, "reverse": true}"#,
        )
        .unwrap();
        assert_eq!(config.max_size, MaxSize { height: 100, width: 300 });
        assert_eq!(config.h_stretch, 1.5);
        assert_eq!(
            config.mode,
            ColorMode::Luminance {
                symbols: None,
                num_buckets: 12,
                reverse: true
            }
        );
    }

    #[test]
    fn test_deserialize_colour_defaults() {
        let config: RenderConfig = serde_json::from_str(r#"{"mode": "colour"}"#).unwrap();
        assert_eq!(config.mode, ColorMode::colour());
        assert_eq!(config.max_size, MaxSize::default());
    }
}
