//! Shared fixtures for integration tests: a synthetic room map, a ray-cast
//! scan simulator and matching transform tables.

#![allow(dead_code)]

use sthana::{
    LocalizerConfig, OccupancyMap, Pose2D, RangeScan, StaticTransforms, Transform3D,
};

pub const RESOLUTION: f64 = 0.05;
pub const SIZE: usize = 100;
pub const MAX_RANGE: f64 = 8.0;

/// Laser mounted 5 cm ahead of the base.
pub const LASER_X: f64 = 0.05;

/// 5 m × 5 m map centered on the origin: a walled room with an
/// off-center pillar to break symmetry.
pub fn room_map() -> OccupancyMap {
    let mut data = vec![0i8; SIZE * SIZE];
    let mut occupy = |x: usize, y: usize| data[y * SIZE + x] = 100;

    for i in 10..90 {
        occupy(i, 10);
        occupy(i, 89);
        occupy(10, i);
        occupy(89, i);
    }
    for y in 60..70 {
        for x in 25..32 {
            occupy(x, y);
        }
    }
    // Unknown band outside the room
    for y in 0..5 {
        for x in 0..SIZE {
            data[y * SIZE + x] = -1;
        }
    }

    OccupancyMap {
        frame_id: "map".to_string(),
        width: SIZE,
        height: SIZE,
        resolution: RESOLUTION,
        origin: Pose2D::new(-2.5, -2.5, 0.0),
        data,
    }
}

/// Single horizontal wall at row `row`, no smoothing applied.
pub fn wall_map(row: usize) -> OccupancyMap {
    let mut data = vec![0i8; SIZE * SIZE];
    for x in 0..SIZE {
        data[row * SIZE + x] = 100;
    }
    OccupancyMap {
        frame_id: "map".to_string(),
        width: SIZE,
        height: SIZE,
        resolution: RESOLUTION,
        origin: Pose2D::identity(),
        data,
    }
}

fn occupied(map: &OccupancyMap, x: f64, y: f64) -> bool {
    let gx = ((x - map.origin.x) / map.resolution).floor();
    let gy = ((y - map.origin.y) / map.resolution).floor();
    if gx < 0.0 || gy < 0.0 || gx >= map.width as f64 || gy >= map.height as f64 {
        return false;
    }
    map.data[gy as usize * map.width + gx as usize] >= 50
}

/// Ray-cast a full-circle scan from the laser of a robot at `robot` (map frame).
pub fn simulate_scan(map: &OccupancyMap, robot: &Pose2D, beams: usize, timestamp_us: u64) -> RangeScan {
    let sensor = robot.compose(&Pose2D::new(LASER_X, 0.0, 0.0));
    let increment = std::f64::consts::TAU / beams as f64;
    let step = map.resolution * 0.25;

    let ranges = (0..beams)
        .map(|i| {
            let angle = sensor.theta + i as f64 * increment;
            let (sin_a, cos_a) = angle.sin_cos();
            let mut r = step;
            while r < MAX_RANGE {
                if occupied(map, sensor.x + r * cos_a, sensor.y + r * sin_a) {
                    return r as f32;
                }
                r += step;
            }
            0.0
        })
        .collect();

    RangeScan::new("laser", timestamp_us, 0.0, increment as f32, ranges)
}

/// Transform table for a robot at `robot` (map frame) whose odometry is
/// off by `map_from_odom`.
pub fn robot_transforms(robot: &Pose2D, map_from_odom: &Pose2D) -> StaticTransforms {
    let odom_from_base = map_from_odom.inverse().compose(robot);
    StaticTransforms::new()
        .with("base_link", "laser", Transform3D::translate(LASER_X, 0.0))
        .with("odom", "base_link", Transform3D::from_pose2d(&odom_from_base))
}

/// Defaults with a fixed seed.
pub fn seeded_config(seed: u64) -> LocalizerConfig {
    let mut config = LocalizerConfig::default();
    config.search.seed = seed;
    config
}
