//! Top-level localizer configuration and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LocalizationError, Result};

use super::frames::FramesSection;
use super::fusion::FusionSection;
use super::map::MapSection;
use super::optimizer::OptimizerSection;
use super::search::SearchSection;

/// Full localizer configuration loaded from TOML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct LocalizerConfig {
    /// Frame names and broadcast switch
    #[serde(default)]
    pub frames: FramesSection,

    /// Map preparation
    #[serde(default)]
    pub map: MapSection,

    /// Pose optimizer
    #[serde(default)]
    pub optimizer: OptimizerSection,

    /// Hypothesis search
    #[serde(default)]
    pub search: SearchSection,

    /// Offset fusion
    #[serde(default)]
    pub fusion: FusionSection,
}

impl LocalizerConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load from the default config path (configs/sthana.toml), falling back
    /// to built-in defaults when the file is absent
    pub fn load_default() -> Result<Self> {
        let path = Path::new("configs/sthana.toml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| LocalizationError::InvalidConfig(e.to_string()))
    }

    /// Check every option against its valid range
    pub fn validate(&self) -> Result<()> {
        let frames = &self.frames;
        for (name, value) in [
            ("frames.base_frame", &frames.base_frame),
            ("frames.odom_frame", &frames.odom_frame),
            ("frames.map_frame", &frames.map_frame),
        ] {
            if value.trim().is_empty() {
                return invalid(format!("{name} must not be empty"));
            }
        }
        if frames.base_frame == frames.odom_frame
            || frames.odom_frame == frames.map_frame
            || frames.base_frame == frames.map_frame
        {
            return invalid("frames.base_frame, odom_frame and map_frame must differ".to_string());
        }

        if self.optimizer.iterations == 0 {
            return invalid("optimizer.iterations must be at least 1".to_string());
        }
        check_range("optimizer.gain", self.optimizer.gain, 0.0, f64::MAX, false)?;
        check_range("optimizer.damping", self.optimizer.damping, 0.0, f64::MAX, true)?;

        for (name, std) in [
            ("search.sample_std_x", self.search.sample_std_x),
            ("search.sample_std_y", self.search.sample_std_y),
            ("search.sample_std_yaw", self.search.sample_std_yaw),
        ] {
            check_range(name, std, 0.0, f64::MAX, true)?;
        }
        if self.search.min_scan_points == 0 {
            return invalid("search.min_scan_points must be at least 1".to_string());
        }

        check_range("fusion.update_gain", self.fusion.update_gain, 0.0, 1.0, true)?;
        check_range("fusion.confidence_gain", self.fusion.confidence_gain, 0.0, 1.0, true)?;
        check_range("fusion.max_confidence", self.fusion.max_confidence, 0.0, 1.0, true)?;

        Ok(())
    }
}

fn invalid(message: String) -> Result<()> {
    Err(LocalizationError::InvalidConfig(message))
}

/// `value` must be finite and within `[min, max]`; the lower bound is
/// exclusive unless `min_inclusive`.
fn check_range(name: &str, value: f64, min: f64, max: f64, min_inclusive: bool) -> Result<()> {
    let above_min = if min_inclusive { value >= min } else { value > min };
    if value.is_finite() && above_min && value <= max {
        Ok(())
    } else {
        let open = if min_inclusive { '[' } else { '(' };
        invalid(format!("{name} = {value} outside {open}{min}, {max}]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = LocalizerConfig::default();
        assert!(config.frames.broadcast_enabled);
        assert_eq!(config.frames.base_frame, "base_link");
        assert_eq!(config.frames.odom_frame, "odom");
        assert_eq!(config.frames.map_frame, "map");
        assert_eq!(config.map.downscale_levels, 0);
        assert_eq!(config.map.smoothing_iterations, 5);
        assert_eq!(config.optimizer.iterations, 20);
        assert_eq!(config.optimizer.gain, 0.1);
        assert_eq!(config.optimizer.damping, 1000.0);
        assert_eq!(config.search.sample_count, 10);
        assert_eq!(config.search.sample_std_x, 0.5);
        assert_eq!(config.search.sample_std_y, 0.5);
        assert_eq!(config.search.sample_std_yaw, 0.5);
        assert_eq!(config.search.min_scan_points, 10);
        assert_eq!(config.search.seed, 0);
        assert_eq!(config.fusion.update_gain, 0.5);
        assert_eq!(config.fusion.confidence_gain, 0.01);
        assert_eq!(config.fusion.max_confidence, 0.95);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = LocalizerConfig::from_toml("").unwrap();
        assert_eq!(config, LocalizerConfig::default());
    }

    #[test]
    fn test_partial_section() {
        let config = LocalizerConfig::from_toml(
            r#"
            [optimizer]
            iterations = 7

            [frames]
            map_frame = "world"
            "#,
        )
        .unwrap();
        assert_eq!(config.optimizer.iterations, 7);
        assert_eq!(config.optimizer.gain, 0.1);
        assert_eq!(config.frames.map_frame, "world");
        assert_eq!(config.frames.odom_frame, "odom");
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = LocalizerConfig::default();
        config.search.seed = 42;
        config.map.downscale_levels = 2;
        let text = config.to_toml().unwrap();
        let parsed = LocalizerConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let cases = [
            "[fusion]\nupdate_gain = 1.5",
            "[fusion]\nmax_confidence = -0.1",
            "[optimizer]\niterations = 0",
            "[optimizer]\ngain = 0.0",
            "[optimizer]\ndamping = -1.0",
            "[search]\nsample_std_yaw = -0.5",
            "[search]\nmin_scan_points = 0",
            "[frames]\nmap_frame = \"\"",
            "[frames]\nmap_frame = \"odom\"",
            "[frames]\nbase_frame = \"odom\"",
            "[frames]\nmap_frame = \"base_link\"",
        ];
        for case in cases {
            let err = LocalizerConfig::from_toml(case).unwrap_err();
            assert!(
                matches!(err, LocalizationError::InvalidConfig(_)),
                "{case}: {err}"
            );
        }
    }

    #[test]
    fn test_parse_error() {
        let err = LocalizerConfig::from_toml("[optimizer]\niterations = \"many\"").unwrap_err();
        assert!(matches!(err, LocalizationError::ConfigParse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = LocalizerConfig::load(Path::new("/nonexistent/sthana.toml")).unwrap_err();
        assert!(matches!(err, LocalizationError::Io(_)));
    }
}
