//! Square occupancy-likelihood grid.
//!
//! The grid stores occupancy likelihoods in [0, 1] on an N×N lattice with
//! cell edge length `resolution`. Coordinates passed to
//! [`LikelihoodGrid::sample_bilinear`] are in the grid frame: cell (i, j)
//! covers `[i·res, (i+1)·res) × [j·res, (j+1)·res)` and its center sits at
//! `((i+½)·res, (j+½)·res)`.
//!
//! ## Preparation pipeline
//!
//! ```text
//! occupancy map ──► cells in [0,1] ──► downscale ×k ──► smooth ×n ──► Arc snapshot
//!                                       (N → N/2^k)     (3×3 box)
//! ```
//!
//! Storage is row-major (`index = y·N + x`), matching the occupancy map
//! layout so conversion is a straight copy.

use crate::core::Scalar;
use crate::error::{LocalizationError, Result};

/// N×N grid of occupancy likelihoods, generic over cell precision.
#[derive(Debug, Clone, PartialEq)]
pub struct LikelihoodGrid<T: Scalar = f32> {
    cells: Vec<T>,
    size: usize,
    resolution: f64,
    /// Pre-computed 1.0 / resolution for faster sampling.
    inv_resolution: T,
}

impl<T: Scalar> LikelihoodGrid<T> {
    /// Create a zero-filled grid.
    ///
    /// Fails on size 0 or a non-positive (or non-finite) resolution.
    pub fn new(size: usize, resolution: f64) -> Result<Self> {
        if size == 0 {
            return Err(LocalizationError::GridTooSmall(size));
        }
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(LocalizationError::InvalidResolution(resolution));
        }
        Ok(Self {
            cells: vec![T::zero(); size * size],
            size,
            resolution,
            inv_resolution: T::cast_from(1.0 / resolution),
        })
    }

    /// Create a grid from row-major cell values. Values are clamped to [0, 1].
    pub fn from_cells(size: usize, resolution: f64, cells: Vec<T>) -> Result<Self> {
        let mut grid = Self::new(size, resolution)?;
        if cells.len() != size * size {
            return Err(LocalizationError::MapDataMismatch {
                expected: size * size,
                actual: cells.len(),
            });
        }
        grid.cells = cells.into_iter().map(clamp_unit).collect();
        Ok(grid)
    }

    /// Edge length in cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell edge length in meters.
    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Row-major cell values.
    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Edge length of the covered area in meters.
    #[inline]
    pub fn extent(&self) -> f64 {
        self.size as f64 * self.resolution
    }

    /// Cell value, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.size && y < self.size {
            Some(self.cells[y * self.size + x])
        } else {
            None
        }
    }

    /// Set a cell value, clamped to [0, 1]. Returns `false` outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        if x < self.size && y < self.size {
            self.cells[y * self.size + x] = clamp_unit(value);
            true
        } else {
            false
        }
    }

    /// Mean cell value.
    pub fn mean(&self) -> T {
        let sum = self.cells.iter().fold(T::zero(), |acc, &v| acc + v);
        sum / T::cast_from(self.cells.len() as f64)
    }

    /// Half-resolution copy: size N/2 (truncating), resolution doubled.
    ///
    /// Each output cell averages the matching 2×2 source block. On odd sizes
    /// the last source row and column are dropped. Fails if the result would
    /// be empty.
    pub fn downscale(&self) -> Result<Self> {
        let half = self.size / 2;
        if half == 0 {
            return Err(LocalizationError::GridTooSmall(self.size));
        }

        let quarter = T::cast_from(0.25);
        let mut out = Self::new(half, self.resolution * 2.0)?;
        for y in 0..half {
            for x in 0..half {
                let sx = 2 * x;
                let sy = 2 * y;
                let sum = self.cell(sx, sy)
                    + self.cell(sx + 1, sy)
                    + self.cell(sx, sy + 1)
                    + self.cell(sx + 1, sy + 1);
                out.cells[y * half + x] = sum * quarter;
            }
        }
        Ok(out)
    }

    /// 3×3 box smoothing, applied `iterations` times.
    ///
    /// Each pass reads only the previous pass's values. Border cells average
    /// their in-bounds neighbours only, so a uniform grid is left unchanged.
    pub fn smooth(&mut self, iterations: usize) {
        if iterations == 0 {
            return;
        }

        let n = self.size;
        let mut scratch = vec![T::zero(); self.cells.len()];

        for _ in 0..iterations {
            for y in 0..n {
                let y_lo = y.saturating_sub(1);
                let y_hi = (y + 1).min(n - 1);
                for x in 0..n {
                    let x_lo = x.saturating_sub(1);
                    let x_hi = (x + 1).min(n - 1);

                    let mut sum = T::zero();
                    for ny in y_lo..=y_hi {
                        let row = ny * n;
                        for nx in x_lo..=x_hi {
                            sum = sum + self.cells[row + nx];
                        }
                    }
                    let count = ((y_hi - y_lo + 1) * (x_hi - x_lo + 1)) as f64;
                    scratch[y * n + x] = sum / T::cast_from(count);
                }
            }
            std::mem::swap(&mut self.cells, &mut scratch);
        }
    }

    /// Bilinearly interpolated value and gradient at a grid-frame point.
    ///
    /// Returns `(value, d/dx, d/dy)` with the gradient in units per meter.
    /// Neighbours outside the grid read as 0; a query entirely outside the
    /// grid (or non-finite) yields `(0, 0, 0)`.
    pub fn sample_bilinear(&self, x: T, y: T) -> (T, T, T) {
        let zero = T::zero();
        let one = T::one();
        let half = T::cast_from(0.5);
        let n = T::cast_from(self.size as f64);

        let gx = x * self.inv_resolution - half;
        let gy = y * self.inv_resolution - half;

        // Also rejects NaN
        if !(gx > -one && gx < n && gy > -one && gy < n) {
            return (zero, zero, zero);
        }

        let fx0 = gx.floor();
        let fy0 = gy.floor();
        let fx = gx - fx0;
        let fy = gy - fy0;

        // In (-1, N) so the floor fits comfortably in isize
        let x0 = fx0.into_f64() as isize;
        let y0 = fy0.into_f64() as isize;

        let v00 = self.cell_or_zero(x0, y0);
        let v10 = self.cell_or_zero(x0 + 1, y0);
        let v01 = self.cell_or_zero(x0, y0 + 1);
        let v11 = self.cell_or_zero(x0 + 1, y0 + 1);

        let value = (one - fx) * (one - fy) * v00
            + fx * (one - fy) * v10
            + (one - fx) * fy * v01
            + fx * fy * v11;

        let grad_x = ((one - fy) * (v10 - v00) + fy * (v11 - v01)) * self.inv_resolution;
        let grad_y = ((one - fx) * (v01 - v00) + fx * (v11 - v10)) * self.inv_resolution;

        (value, grad_x, grad_y)
    }

    /// Convert the grid to another precision.
    pub fn cast<U: Scalar>(&self) -> LikelihoodGrid<U> {
        LikelihoodGrid {
            cells: self
                .cells
                .iter()
                .map(|v| U::cast_from(v.into_f64()))
                .collect(),
            size: self.size,
            resolution: self.resolution,
            inv_resolution: U::cast_from(1.0 / self.resolution),
        }
    }

    #[inline]
    fn cell(&self, x: usize, y: usize) -> T {
        self.cells[y * self.size + x]
    }

    #[inline]
    fn cell_or_zero(&self, x: isize, y: isize) -> T {
        if x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size {
            self.cells[y as usize * self.size + x as usize]
        } else {
            T::zero()
        }
    }
}

#[inline]
fn clamp_unit<T: Scalar>(value: T) -> T {
    if value.is_nan() {
        T::zero()
    } else {
        value.max(T::zero()).min(T::one())
    }
}
