use image::{Rgb, RgbImage};

use crate::config::MAX_ITER;
use crate::solver::EscapeGrid;

pub trait Painter {
    fn escape_color(&self, count: u16) -> Rgb<u8>;

    fn paint(&self, grid: &EscapeGrid) -> RgbImage {
        let width: u32 = grid.width() as u32;
        let height: u32 = grid.height() as u32;

        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = self.escape_color(grid.count(x as usize, y as usize));
        }
        img
    }
}

/// Grayscale level for an escape count: black for points that never
/// escaped, otherwise `count * 255 / max_iter` rounded down.
pub fn intensity(count: u16, max_iter: u16) -> u8 {
    if count >= max_iter {
        0
    } else {
        (count as u32 * 255 / max_iter as u32) as u8
    }
}

#[derive(Clone, Debug)]
pub struct GreyscalePainter {
    max_iter: u16,
}

impl GreyscalePainter {
    pub fn new(max_iter: u16) -> Self {
        Self { max_iter }
    }
}

impl Default for GreyscalePainter {
    fn default() -> Self {
        Self::new(MAX_ITER)
    }
}

impl Painter for GreyscalePainter {
    fn escape_color(&self, count: u16) -> Rgb<u8> {
        let v = intensity(count, self.max_iter);
        Rgb([v, v, v])
    }
}

#[cfg(feature = "gui")]
pub fn convert_image(img: RgbImage) -> druid::ImageBuf {
    use std::sync::Arc;

    let width = img.width() as usize;
    let height = img.height() as usize;
    let raw: Arc<[u8]> = img.into_raw().into();

    druid::ImageBuf::from_raw(raw, druid::piet::ImageFormat::Rgb, width, height)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coord::{Viewport, WindowSize};
    use crate::solver::{GridSolver, Solver};

    #[test]
    fn test_intensity() {
        assert_eq!(intensity(255, 255), 0);
        assert_eq!(intensity(1, 255), 1);
        assert_eq!(intensity(254, 255), 254);
        assert_eq!(intensity(0, 255), 0);
        // truncating
        assert_eq!(intensity(1, 100), 2);
        assert_eq!(intensity(99, 100), 252);
    }

    #[test]
    fn test_greyscale_channels_equal() {
        let painter = GreyscalePainter::default();
        for count in 0..=MAX_ITER {
            let Rgb([r, g, b]) = painter.escape_color(count);
            assert_eq!(r, g);
            assert_eq!(g, b);
        }
        assert_eq!(painter.escape_color(MAX_ITER), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_paint_layout() {
        let mapping = Viewport::default()
            .mapping(WindowSize::new(5.0, 3.0))
            .unwrap();
        let grid = GridSolver::default().solve(EscapeGrid::new(mapping, 5, 3));
        let painter = GreyscalePainter::default();
        let img = painter.paint(&grid);
        assert_eq!(img.dimensions(), (5, 3));
        for y in 0..3 {
            for x in 0..5 {
                let v = intensity(grid.count(x, y), MAX_ITER);
                assert_eq!(*img.get_pixel(x as u32, y as u32), Rgb([v, v, v]));
            }
        }
    }
}
