//! Default value functions for serde deserialization.

pub fn enabled() -> bool {
    true
}

pub fn base_frame() -> String {
    "base_link".to_string()
}

pub fn odom_frame() -> String {
    "odom".to_string()
}

pub fn map_frame() -> String {
    "map".to_string()
}

pub fn downscale_levels() -> usize {
    0
}

pub fn smoothing_iterations() -> usize {
    5
}

pub fn optimizer_iterations() -> usize {
    20
}

pub fn optimizer_gain() -> f64 {
    0.1
}

pub fn optimizer_damping() -> f64 {
    1000.0
}

pub fn sample_count() -> usize {
    10
}

pub fn sample_std_xy() -> f64 {
    0.5
}

pub fn sample_std_yaw() -> f64 {
    0.5
}

pub fn min_scan_points() -> usize {
    10
}

pub fn update_gain() -> f64 {
    0.5
}

pub fn confidence_gain() -> f64 {
    0.01
}

pub fn max_confidence() -> f64 {
    0.95
}
