use rayon::prelude::*;
use vivarium_data::Rect;

/// Uniform-grid spatial index over creature positions.
///
/// Uses the offset-array layout: `cell_offsets[i]..cell_offsets[i + 1]` is the
/// slice of `entity_indices` that falls in cell `i`. Positions outside the arena
/// are folded into the nearest border cell so every indexed creature stays
/// reachable by a query.
///
/// # Examples
/// ```
/// use vivarium_core::spatial_hash::SpatialHash;
/// use vivarium_data::Rect;
///
/// let mut spatial = SpatialHash::new(10.0, Rect::default());
/// spatial.build(&[(15.0, 15.0), (25.0, 25.0), (85.0, 55.0)]);
///
/// let mut nearby = Vec::new();
/// spatial.query_into(15.0, 15.0, 20.0, &mut nearby);
/// assert!(nearby.contains(&0));
/// ```
#[derive(Clone, Debug)]
pub struct SpatialHash {
    pub cell_size: f64,
    pub bounds: Rect,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub entity_indices: Vec<usize>,
}

impl Default for SpatialHash {
    fn default() -> Self {
        Self::new(5.0, Rect::default())
    }
}

impl SpatialHash {
    pub fn new(cell_size: f64, bounds: Rect) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            5.0
        };
        let cols = ((bounds.width() / cell_size).ceil() as usize).max(1);
        let rows = ((bounds.height() / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            bounds,
            cols,
            rows,
            cell_offsets: vec![0; cols * rows + 1],
            entity_indices: Vec::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, v: f64, origin: f64, cells: usize) -> i64 {
        let c = ((v - origin) / self.cell_size).floor();
        if c.is_nan() {
            0
        } else {
            (c as i64).clamp(0, cells as i64 - 1)
        }
    }

    /// Flat cell index for a world coordinate, clamped into the grid.
    /// Returns `None` only for non-finite input.
    #[inline]
    pub fn get_cell_idx(&self, x: f64, y: f64) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let cx = self.cell_coord(x, self.bounds.min_x, self.cols) as usize;
        let cy = self.cell_coord(y, self.bounds.min_y, self.rows) as usize;
        Some(cy * self.cols + cx)
    }

    /// Rebuilds the index. Entity indices are positions in `positions`.
    pub fn build(&mut self, positions: &[(f64, f64)]) {
        let cell_count = self.cols * self.rows;

        let cells: Vec<Option<usize>> = positions
            .par_iter()
            .map(|&(x, y)| self.get_cell_idx(x, y))
            .collect();

        let mut counts = vec![0usize; cell_count];
        for idx in cells.iter().flatten() {
            counts[*idx] += 1;
        }

        self.cell_offsets.resize(cell_count + 1, 0);
        let mut total = 0;
        for (i, &count) in counts.iter().enumerate() {
            self.cell_offsets[i] = total;
            total += count;
        }
        self.cell_offsets[cell_count] = total;

        self.entity_indices.clear();
        self.entity_indices.resize(total, 0);
        let mut cursor = self.cell_offsets[..cell_count].to_vec();
        for (entity_idx, cell) in cells.into_iter().enumerate() {
            if let Some(cell_idx) = cell {
                self.entity_indices[cursor[cell_idx]] = entity_idx;
                cursor[cell_idx] += 1;
            }
        }
    }

    fn cell_span(&self, x: f64, y: f64, radius: f64) -> Option<(i64, i64, i64, i64)> {
        if !x.is_finite() || !y.is_finite() || !radius.is_finite() || radius < 0.0 {
            return None;
        }
        let min_cx = self.cell_coord(x - radius, self.bounds.min_x, self.cols);
        let max_cx = self.cell_coord(x + radius, self.bounds.min_x, self.cols);
        let min_cy = self.cell_coord(y - radius, self.bounds.min_y, self.rows);
        let max_cy = self.cell_coord(y + radius, self.bounds.min_y, self.rows);
        Some((min_cx, max_cx, min_cy, max_cy))
    }

    /// Visits every indexed entity in the cells overlapping the query square.
    /// Callers still need an exact distance check.
    pub fn query_callback<F>(&self, x: f64, y: f64, radius: f64, mut callback: F)
    where
        F: FnMut(usize),
    {
        let Some((min_cx, max_cx, min_cy, max_cy)) = self.cell_span(x, y, radius) else {
            return;
        };
        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                let cell_idx = cy as usize * self.cols + cx as usize;
                let start = self.cell_offsets[cell_idx];
                let end = self.cell_offsets[cell_idx + 1];
                for &entity_idx in &self.entity_indices[start..end] {
                    callback(entity_idx);
                }
            }
        }
    }

    #[inline]
    pub fn query_into(&self, x: f64, y: f64, radius: f64, result: &mut Vec<usize>) {
        result.clear();
        self.query_callback(x, y, radius, |idx| result.push(idx));
    }

    pub fn count_nearby(&self, x: f64, y: f64, radius: f64) -> usize {
        let Some((min_cx, max_cx, min_cy, max_cy)) = self.cell_span(x, y, radius) else {
            return 0;
        };
        let mut count = 0;
        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                let cell_idx = cy as usize * self.cols + cx as usize;
                count += self.cell_offsets[cell_idx + 1] - self.cell_offsets[cell_idx];
            }
        }
        count
    }
}
