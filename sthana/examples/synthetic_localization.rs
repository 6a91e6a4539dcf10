//! Synthetic localization run.
//!
//! Builds a walled room, drives a simulated robot around it with drifting
//! odometry and feeds ray-cast scans through the [`Localizer`]. The log
//! shows the estimated map→odom offset closing in on the true drift.
//!
//! Usage:
//!   cargo run --example synthetic_localization -- [--config configs/sthana.toml]
//!
//! Set `RUST_LOG=debug` to see per-sample search diagnostics.

use std::f64::consts::TAU;
use std::path::Path;

use sthana::{
    Localizer, LocalizerConfig, OccupancyMap, Pose2D, PoseEstimate, RangeScan, StaticTransforms,
    Transform3D,
};

const SIZE: usize = 160;
const RESOLUTION: f64 = 0.05;
const BEAMS: usize = 240;
const MAX_RANGE: f64 = 8.0;
const STEPS: u64 = 120;
const SCAN_PERIOD_US: u64 = 100_000;

struct Args {
    config_path: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut result = Args { config_path: None };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    result.config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("synthetic_localization [--config <path>]");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    result
}

/// 8 m × 8 m room with two obstacles.
fn build_map() -> OccupancyMap {
    let mut data = vec![-1i8; SIZE * SIZE];
    for y in 10..150 {
        for x in 10..150 {
            data[y * SIZE + x] = 0;
        }
    }
    let mut occupy = |x: usize, y: usize| data[y * SIZE + x] = 100;
    for i in 10..150 {
        occupy(i, 10);
        occupy(i, 149);
        occupy(10, i);
        occupy(149, i);
    }
    for y in 40..55 {
        for x in 100..120 {
            occupy(x, y);
        }
    }
    for i in 30..70 {
        occupy(50, i);
    }

    OccupancyMap {
        frame_id: "map".to_string(),
        width: SIZE,
        height: SIZE,
        resolution: RESOLUTION,
        origin: Pose2D::new(-4.0, -4.0, 0.0),
        data,
    }
}

fn ray_cast(map: &OccupancyMap, sensor: &Pose2D) -> Vec<f32> {
    let step = map.resolution * 0.25;
    (0..BEAMS)
        .map(|i| {
            let angle = sensor.theta + i as f64 * TAU / BEAMS as f64;
            let (sin_a, cos_a) = angle.sin_cos();
            let mut r = step;
            while r < MAX_RANGE {
                let gx = ((sensor.x + r * cos_a - map.origin.x) / map.resolution).floor();
                let gy = ((sensor.y + r * sin_a - map.origin.y) / map.resolution).floor();
                if gx >= 0.0 && gy >= 0.0 && gx < map.width as f64 && gy < map.height as f64 {
                    let v = map.data[gy as usize * map.width + gx as usize];
                    if v >= 50 {
                        return r as f32;
                    }
                }
                r += step;
            }
            0.0
        })
        .collect()
}

/// Robot pose along a slow loop around the room center.
fn true_pose(t: f64) -> Pose2D {
    let angle = t * 0.08;
    Pose2D::new(1.5 * angle.cos(), 1.5 * angle.sin(), angle + TAU / 4.0)
}

/// Odometry drift grows linearly with time.
fn true_drift(t: f64) -> Pose2D {
    Pose2D::new(0.004 * t, -0.003 * t, 0.0015 * t)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args();

    let config = match args.config_path.as_deref() {
        Some(path) => LocalizerConfig::load(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Failed to load config {}: {}", path, e);
            std::process::exit(1);
        }),
        None => LocalizerConfig::load_default().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}, using defaults", e);
            LocalizerConfig::default()
        }),
    };

    let localizer = Localizer::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    let map = build_map();
    if let Err(e) = localizer.ingest_map(&map) {
        eprintln!("Map rejected: {}", e);
        std::process::exit(1);
    }

    let laser_mount = Transform3D::translate(0.05, 0.0);
    let frames = localizer.config().frames.clone();

    // Operator supplies the starting pose, so drift starts at zero
    let start = true_pose(0.0);
    let initial_transforms = StaticTransforms::new().with(
        &frames.odom_frame,
        &frames.base_frame,
        Transform3D::from_pose2d(&start),
    );
    let estimate = PoseEstimate::planar(&frames.map_frame, 0, start.x, start.y, start.theta);
    if let Err(e) = localizer.handle_pose_estimate(&estimate, &initial_transforms) {
        eprintln!("Initial pose rejected: {}", e);
        std::process::exit(1);
    }

    for k in 1..=STEPS {
        let t = k as f64 * SCAN_PERIOD_US as f64 * 1e-6;
        let robot = true_pose(t);
        let drift = true_drift(t);
        // map←odom is the inverse of the accumulated odometry error
        let map_from_odom = drift.inverse();
        let odom_from_base = drift.compose(&robot);

        let transforms = StaticTransforms::new()
            .with(&frames.base_frame, "laser", laser_mount)
            .with(
                &frames.odom_frame,
                &frames.base_frame,
                Transform3D::from_pose2d(&odom_from_base),
            );

        let sensor = robot.compose(&Pose2D::new(0.05, 0.0, 0.0));
        let scan = RangeScan::new(
            "laser",
            k * SCAN_PERIOD_US,
            0.0,
            (TAU / BEAMS as f64) as f32,
            ray_cast(&map, &sensor),
        );

        match localizer.process_scan(&scan, &transforms) {
            Ok(correction) => {
                if k % 10 == 0 {
                    let estimate = correction.offset.pose();
                    log::info!(
                        "t={:5.1}s offset error {:.3} m / {:.3} rad, confidence {:.2}",
                        t,
                        estimate.distance(&map_from_odom),
                        estimate.heading_error(&map_from_odom),
                        correction.offset.confidence
                    );
                }
            }
            Err(e) => log::warn!("Scan {} skipped: {}", k, e),
        }
    }

    if let Some(tf) = localizer.published_transform() {
        println!(
            "final {}→{}: x={:.3} y={:.3} yaw={:.3}",
            tf.parent_frame, tf.child_frame, tf.x, tf.y, tf.yaw
        );
    }
}
