//! Likelihood grid properties exercised through map ingestion.

mod common;

use approx::assert_relative_eq;
use sthana::config::MapSection;
use sthana::grid::{LikelihoodGrid, prepare_grid};
use sthana::{Localizer, LocalizerConfig};

use common::{RESOLUTION, SIZE, room_map};

#[test]
fn downscale_levels_halve_size_and_keep_mean() {
    let map = room_map();
    let full = LikelihoodGrid::<f64>::from_occupancy_map(&map).unwrap();

    for levels in 0..=3 {
        let grid: LikelihoodGrid<f64> = prepare_grid(
            &map,
            &MapSection {
                downscale_levels: levels,
                smoothing_iterations: 0,
            },
        )
        .unwrap();
        let expected = SIZE >> levels;
        assert_eq!(grid.size(), expected);
        assert_relative_eq!(grid.resolution(), RESOLUTION * (1 << levels) as f64, epsilon = 1e-12);
        // 100 → 50 → 25 stays exact; 25 → 12 drops a row and column
        if levels <= 2 {
            assert_relative_eq!(grid.mean(), full.mean(), epsilon = 1e-12);
        }
    }
}

#[test]
fn smoothing_preserves_uniform_map() {
    let mut map = room_map();
    map.data.iter_mut().for_each(|v| *v = 40);
    let grid: LikelihoodGrid<f32> = prepare_grid(
        &map,
        &MapSection {
            downscale_levels: 1,
            smoothing_iterations: 10,
        },
    )
    .unwrap();
    for &v in grid.cells() {
        assert_relative_eq!(v, 0.4, epsilon = 1e-5);
    }
}

#[test]
fn smoothing_keeps_values_in_unit_range() {
    let grid: LikelihoodGrid<f32> = prepare_grid(&room_map(), &MapSection::default()).unwrap();
    assert!(grid.cells().iter().all(|v| (0.0..=1.0).contains(v)));
    // Wall mass spreads but is not lost
    let raw = LikelihoodGrid::<f32>::from_occupancy_map(&room_map()).unwrap();
    assert_relative_eq!(grid.mean(), raw.mean(), epsilon = 1e-3);
}

#[test]
fn sampling_matches_cells_at_centers() {
    let grid: LikelihoodGrid<f64> = prepare_grid(&room_map(), &MapSection::default()).unwrap();
    let res = grid.resolution();
    for (x, y) in [(10usize, 10usize), (50, 50), (28, 65), (89, 40)] {
        let (v, _, _) = grid.sample_bilinear((x as f64 + 0.5) * res, (y as f64 + 0.5) * res);
        assert_relative_eq!(v, grid.get(x, y).unwrap(), epsilon = 1e-12);
    }
}

#[test]
fn ingestion_uses_configured_preparation() {
    let mut config = LocalizerConfig::default();
    config.map.downscale_levels = 1;
    let localizer = Localizer::new(config).unwrap();
    let grid = localizer.ingest_map(&room_map()).unwrap();
    assert_eq!(grid.size(), SIZE / 2);
    assert_relative_eq!(grid.resolution(), 2.0 * RESOLUTION);
}
