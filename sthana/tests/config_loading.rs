//! Loading `LocalizerConfig` from TOML files on disk.

use std::io::Write;
use std::path::Path;

use sthana::{LocalizationError, Localizer, LocalizerConfig};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn shipped_config_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/sthana.toml");
    let config = LocalizerConfig::load(&path).unwrap();
    assert_eq!(config, LocalizerConfig::default());
}

#[test]
fn partial_file_fills_defaults() {
    let file = write_config(
        r#"
        [frames]
        broadcast_enabled = false
        odom_frame = "wheel_odom"

        [search]
        seed = 99
        sample_count = 4
        "#,
    );
    let config = LocalizerConfig::load(file.path()).unwrap();
    assert!(!config.frames.broadcast_enabled);
    assert_eq!(config.frames.odom_frame, "wheel_odom");
    assert_eq!(config.frames.base_frame, "base_link");
    assert_eq!(config.search.seed, 99);
    assert_eq!(config.search.sample_count, 4);
    assert_eq!(config.optimizer.iterations, 20);
    assert!(Localizer::new(config).is_ok());
}

#[test]
fn out_of_range_file_is_rejected() {
    let file = write_config("[fusion]\nconfidence_gain = 2.0\n");
    let err = LocalizerConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, LocalizationError::InvalidConfig(_)));
}

#[test]
fn malformed_file_is_rejected() {
    let file = write_config("[optimizer\niterations = 3\n");
    let err = LocalizerConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, LocalizationError::ConfigParse(_)));
}

#[test]
fn saved_config_loads_back() {
    let mut config = LocalizerConfig::default();
    config.map.smoothing_iterations = 2;
    config.fusion.update_gain = 0.25;

    let file = write_config(&config.to_toml().unwrap());
    assert_eq!(LocalizerConfig::load(file.path()).unwrap(), config);
}
