use std::time::Instant;

use image::RgbImage;
use log::{debug, info};

use crate::coord::{PlaneMapping, Viewport, WindowSize};
use crate::painter::{GreyscalePainter, Painter};
use crate::solver::{make_solver, EscapeGrid, GridSolver, Solver};

/// One frame: `width * height` grayscale pixels, all channels equal.
pub type PixelBuffer = RgbImage;

/// Render a frame on the calling thread.
///
/// A zero width or height gives a buffer with no pixels; the viewport is not
/// consulted at all in that case.
pub fn render(viewport: &Viewport, width: u32, height: u32) -> PixelBuffer {
    Renderer::default().render(viewport, width, height)
}

pub struct Renderer {
    solver: Box<dyn Solver<EscapeGrid> + Send>,
    painter: Box<dyn Painter + Send>,
}

impl Renderer {
    pub fn new<S, P>(solver: S, painter: P) -> Self
    where
        S: Solver<EscapeGrid> + Send + 'static,
        P: Painter + Send + 'static,
    {
        Self {
            solver: Box::new(solver),
            painter: Box::new(painter),
        }
    }

    /// `threads == 0` solves inline, otherwise on a pool of that size.
    pub fn threaded(threads: usize) -> Self {
        Self {
            solver: make_solver(threads),
            painter: Box::<GreyscalePainter>::default(),
        }
    }

    pub fn render(&self, viewport: &Viewport, width: u32, height: u32) -> PixelBuffer {
        if width == 0 || height == 0 {
            debug!("skipping render of empty {}x{} frame", width, height);
            return PixelBuffer::new(width, height);
        }
        match viewport.mapping(WindowSize::from_pixels(width, height)) {
            Some(mapping) => self.render_mapping(mapping, width, height),
            None => PixelBuffer::new(width, height),
        }
    }

    /// Render from a mapping snapshot taken earlier on another thread.
    pub fn render_mapping(&self, mapping: PlaneMapping, width: u32, height: u32) -> PixelBuffer {
        if width == 0 || height == 0 {
            return PixelBuffer::new(width, height);
        }
        let start = Instant::now();
        let grid = EscapeGrid::new(mapping, width as usize, height as usize);
        let solved = self.solver.solve(grid);
        let img = self.painter.paint(&solved);
        info!(
            "Time to generate image: {}ms ({}x{})",
            start.elapsed().as_millis(),
            width,
            height
        );
        img
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(GridSolver::default(), GreyscalePainter::default())
    }
}
