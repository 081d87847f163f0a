use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::OverlayError;

/// Used when no colour stop is configured at all
pub const FALLBACK_COLOR: &str = "#000000";

/// Fill colour for one travel time
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColorStop {
    /// Travel time in seconds
    pub travel_time: f64,
    /// Any SVG colour, e.g. `#006837`
    pub color: String,
}

impl ColorStop {
    pub fn new(travel_time: f64, color: impl Into<String>) -> Self {
        Self {
            travel_time,
            color: color.into(),
        }
    }
}

fn default_colors() -> Vec<ColorStop> {
    vec![
        ColorStop::new(300.0, "#006837"),
        ColorStop::new(600.0, "#39B54A"),
        ColorStop::new(900.0, "#8CC63F"),
        ColorStop::new(1200.0, "#F7931E"),
        ColorStop::new(1500.0, "#F15A24"),
        ColorStop::new(1800.0, "#C1272D"),
    ]
}
fn default_opacity() -> f64 {
    0.5
}
fn default_stroke_width() -> f64 {
    20.0
}
fn default_inverse_color() -> String {
    "#333333".to_string()
}
fn default_svg_precision() -> usize {
    2
}

/// Styling of the overlay, applied on the next draw
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```toml
/// opacity = 0.7
/// stroke_width = 10.0
///
/// [[colors]]
/// travel_time = 600
/// color = "#39B54A"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderOptions {
    /// Shade everything outside the bands instead of the bands themselves
    #[serde(default)]
    pub inverse: bool,
    #[serde(default = "default_colors")]
    pub colors: Vec<ColorStop>,
    #[serde(default = "default_inverse_color")]
    pub inverse_color: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Outline width in pixels; band outlines are stroked in the fill colour
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Decimal places written for SVG coordinates
    #[serde(default = "default_svg_precision")]
    pub svg_precision: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            inverse: false,
            colors: default_colors(),
            inverse_color: default_inverse_color(),
            opacity: default_opacity(),
            stroke_width: default_stroke_width(),
            svg_precision: default_svg_precision(),
        }
    }
}

impl RenderOptions {
    /// Parse and validate options from TOML
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let options: Self = toml::from_str(contents).context("Failed to parse render options")?;
        options.validate()?;
        Ok(options)
    }

    /// Read options from an explicit file
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Options from the first config file found, or the defaults
    pub fn load() -> Self {
        Self::load_from(&get_config_paths())
    }

    /// Like [`RenderOptions::load`] with an explicit search list
    ///
    /// A file that exists but does not parse is skipped with a warning.
    pub fn load_from(paths: &[PathBuf]) -> Self {
        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::from_path(path) {
                Ok(options) => {
                    debug!("Loaded render options from {}", path.display());
                    return options;
                }
                Err(e) => {
                    warn!("Skipping config file {}: {:#}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    pub fn validate(&self) -> Result<(), OverlayError> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(OverlayError::InvalidOptions(format!(
                "opacity must be within [0, 1], got {}",
                self.opacity
            )));
        }
        if !(self.stroke_width >= 0.0 && self.stroke_width.is_finite()) {
            return Err(OverlayError::InvalidOptions(format!(
                "stroke width must be a non-negative number, got {}",
                self.stroke_width
            )));
        }
        if let Some(stop) = self.colors.iter().find(|s| !s.travel_time.is_finite()) {
            return Err(OverlayError::InvalidOptions(format!(
                "colour stop {} has a non-finite travel time",
                stop.color
            )));
        }
        Ok(())
    }

    /// Colour for a band
    ///
    /// The stop matching `travel_time` exactly, else the nearest stop above
    /// it, else the highest stop.
    pub fn color_for(&self, travel_time: f64) -> &str {
        let mut above: Option<&ColorStop> = None;
        let mut highest: Option<&ColorStop> = None;

        for stop in &self.colors {
            if stop.travel_time == travel_time {
                return &stop.color;
            }
            if stop.travel_time > travel_time
                && above.is_none_or(|a| stop.travel_time < a.travel_time)
            {
                above = Some(stop);
            }
            if highest.is_none_or(|h| stop.travel_time > h.travel_time) {
                highest = Some(stop);
            }
        }

        above
            .or(highest)
            .map(|stop| stop.color.as_str())
            .unwrap_or(FALLBACK_COLOR)
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("isoverlay.toml"));
    paths.push(PathBuf::from(".isoverlay.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("isoverlay").join("config.toml"));
        paths.push(config_dir.join("isoverlay.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert!(!options.inverse);
        assert_eq!(options.opacity, 0.5);
        assert_eq!(options.stroke_width, 20.0);
        assert_eq!(options.colors.len(), 6);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let options = RenderOptions::from_toml_str("").unwrap();
        assert_eq!(options, RenderOptions::default());
    }

    #[test]
    fn test_partial_toml() {
        let options = RenderOptions::from_toml_str(
            r##"
            inverse = true
            opacity = 0.8

            [[colors]]
            travel_time = 600
            color = "red"

            [[colors]]
            travel_time = 1200.5
            color = "blue"
            "##,
        )
        .unwrap();

        assert!(options.inverse);
        assert_eq!(options.opacity, 0.8);
        assert_eq!(options.stroke_width, 20.0);
        assert_eq!(options.colors.len(), 2);
        assert_eq!(options.colors[1].travel_time, 1200.5);
    }

    #[test]
    fn test_invalid_opacity_rejected() {
        assert!(RenderOptions::from_toml_str("opacity = 1.5").is_err());
        assert!(RenderOptions::from_toml_str("stroke_width = -1.0").is_err());
    }

    #[test]
    fn test_color_lookup() {
        let options = RenderOptions::default();
        assert_eq!(options.color_for(600.0), "#39B54A");
        // Between stops: the next one up
        assert_eq!(options.color_for(700.0), "#8CC63F");
        assert_eq!(options.color_for(10.0), "#006837");
        // Beyond the last stop
        assert_eq!(options.color_for(5000.0), "#C1272D");

        let empty = RenderOptions {
            colors: Vec::new(),
            ..Default::default()
        };
        assert_eq!(empty.color_for(300.0), FALLBACK_COLOR);
    }

    #[test]
    fn test_color_lookup_unsorted_stops() {
        let options = RenderOptions {
            colors: vec![
                ColorStop::new(900.0, "c"),
                ColorStop::new(300.0, "a"),
                ColorStop::new(600.0, "b"),
            ],
            ..Default::default()
        };
        assert_eq!(options.color_for(400.0), "b");
        assert_eq!(options.color_for(1000.0), "c");
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("isoverlay.toml");
        fs::write(&path, "stroke_width = 4.0\n").unwrap();

        let options = RenderOptions::from_path(&path).unwrap();
        assert_eq!(options.stroke_width, 4.0);

        let missing = dir.path().join("missing.toml");
        assert!(RenderOptions::from_path(&missing).is_err());
    }

    #[test]
    fn test_load_from_skips_broken_files() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        fs::write(&broken, "opacity = \"lots\"").unwrap();
        fs::write(&good, "opacity = 0.25").unwrap();

        let options = RenderOptions::load_from(&[dir.path().join("absent.toml"), broken, good]);
        assert_eq!(options.opacity, 0.25);

        let options = RenderOptions::load_from(&[]);
        assert_eq!(options, RenderOptions::default());
    }
}
