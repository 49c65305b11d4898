use ndarray::{concatenate, s, Array2, Axis, Zip};

use crate::config::MAX_ITER;
use crate::coord::PlaneMapping;
use crate::solver::{escape_time, Solver};
use crate::threads::{Join, RangeSplitter, Split};

/// Escape counts for a band of pixel rows.
///
/// A full frame has `row_offset == 0`. Bands produced by `Split` keep the
/// frame's mapping and their own first row, so each cell maps to the same
/// plane coordinate whichever band computes it.
#[derive(Clone, Debug)]
pub struct EscapeGrid {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) row_offset: usize,
    pub(crate) mapping: PlaneMapping,
    pub(crate) counts: Array2<u16>,
}

impl EscapeGrid {
    pub fn new(mapping: PlaneMapping, width: usize, height: usize) -> Self {
        Self::band(mapping, width, 0, height)
    }

    fn band(mapping: PlaneMapping, width: usize, row_offset: usize, height: usize) -> Self {
        Self {
            width,
            height,
            row_offset,
            mapping,
            counts: Array2::zeros((height, width)),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mapping(&self) -> &PlaneMapping {
        &self.mapping
    }

    pub fn count(&self, x: usize, y: usize) -> u16 {
        self.counts[[y, x]]
    }

    pub fn counts(&self) -> &Array2<u16> {
        &self.counts
    }
}

impl Split for EscapeGrid {
    fn split_parts(self, n: usize) -> Vec<Self> {
        RangeSplitter::split(0, self.height, n)
            .into_iter()
            .map(|(start, end)| {
                let mut part = Self::band(
                    self.mapping,
                    self.width,
                    self.row_offset + start,
                    end - start,
                );
                part.counts.assign(&self.counts.slice(s![start..end, ..]));
                part
            })
            .collect()
    }
}

impl Join for EscapeGrid {
    fn join_parts(parts: Vec<Self>) -> Self {
        let first = &parts[0];
        let width = first.width;
        let row_offset = first.row_offset;
        let mapping = first.mapping;
        let mut height = 0;
        for part in &parts {
            assert!(part.width == width, "different width");
            assert!(part.row_offset == row_offset + height, "bands out of order");
            height += part.height;
        }
        let views: Vec<_> = parts.iter().map(|p| p.counts.view()).collect();
        let counts = match concatenate(Axis(0), &views) {
            Ok(counts) => counts,
            Err(e) => panic!("bands do not line up: {}", e),
        };
        Self {
            width,
            height,
            row_offset,
            mapping,
            counts,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GridSolver {
    max_iter: u16,
}

impl GridSolver {
    pub fn new(max_iter: u16) -> Self {
        Self { max_iter }
    }

    pub fn max_iter(&self) -> u16 {
        self.max_iter
    }
}

impl Default for GridSolver {
    fn default() -> Self {
        Self::new(MAX_ITER)
    }
}

impl Solver<EscapeGrid> for GridSolver {
    fn solve(&self, mut state: EscapeGrid) -> EscapeGrid {
        let mapping = state.mapping;
        let row_offset = state.row_offset;
        Zip::indexed(&mut state.counts).for_each(|(y, x), count| {
            let c = mapping.to_plane(x as f64, (y + row_offset) as f64);
            *count = escape_time(c, self.max_iter);
        });
        state
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coord::{Viewport, WindowSize};

    fn grid(width: usize, height: usize) -> EscapeGrid {
        let mapping = Viewport::default()
            .mapping(WindowSize::new(width as f64, height as f64))
            .unwrap();
        EscapeGrid::new(mapping, width, height)
    }

    #[test]
    fn test_grid_shape() {
        let g = grid(7, 3);
        assert_eq!(g.counts().dim(), (3, 7));
        assert_eq!(g.width(), 7);
        assert_eq!(g.height(), 3);
    }

    #[test]
    fn test_split_join_keeps_row_offsets() {
        let g = GridSolver::default().solve(grid(9, 10));
        let parts = g.clone().split_parts(3);
        let offsets: Vec<usize> = parts.iter().map(|p| p.row_offset).collect();
        let heights: Vec<usize> = parts.iter().map(|p| p.height).collect();
        assert_eq!(offsets, vec![0, 4, 7]);
        assert_eq!(heights, vec![4, 3, 3]);
        let joined = EscapeGrid::join_parts(parts);
        assert_eq!(joined.counts, g.counts);
        assert_eq!(joined.row_offset, 0);
    }

    #[test]
    fn test_band_solves_same_as_full_frame() {
        let full = GridSolver::default().solve(grid(12, 8));
        let bands: Vec<EscapeGrid> = grid(12, 8)
            .split_parts(4)
            .into_iter()
            .map(|band| GridSolver::default().solve(band))
            .collect();
        assert_eq!(EscapeGrid::join_parts(bands).counts, full.counts);
    }

    #[test]
    fn test_more_parts_than_rows() {
        let parts = grid(4, 2).split_parts(5);
        assert_eq!(parts.len(), 5);
        let joined = EscapeGrid::join_parts(parts);
        assert_eq!(joined.height, 2);
    }

    #[test]
    fn test_every_cell_in_range() {
        let g = GridSolver::default().solve(grid(30, 20));
        assert!(g.counts().iter().all(|&i| (1..=MAX_ITER).contains(&i)));
    }

    #[test]
    fn test_center_pixel_is_in_set() {
        let g = GridSolver::default().solve(grid(900, 800));
        assert_eq!(g.count(450, 400), MAX_ITER);
        assert_eq!(g.count(0, 0), 1);
    }
}
