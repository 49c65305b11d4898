#![allow(clippy::new_without_default)]
use log::debug;

use crate::coord::{PlaneMapping, Viewport, WindowSize};

pub mod bench;
pub mod complex;
pub mod config;
pub mod coord;
#[cfg(feature = "gui")]
pub mod gui;
pub mod logger;
pub mod painter;
pub mod render;
pub mod solver;
pub mod threads;
pub mod worker;

pub use render::{render, PixelBuffer, Renderer};

/// Input that changes what the next frame shows.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ViewAction {
    Resize(f64, f64),
    /// Pointer released at this window position; pans by its offset from
    /// the window center.
    Release(f64, f64),
    Pan(i32, i32),
    Scroll(f64),
    Reset,
}

/// Viewport plus the window it is shown in. Owned by the UI thread.
#[derive(Copy, Clone, Debug)]
pub struct Mandelbrot {
    pub viewport: Viewport,
    pub window: WindowSize,
}

impl Mandelbrot {
    pub fn new(window: WindowSize) -> Self {
        Self {
            viewport: Viewport::default(),
            window,
        }
    }

    /// Apply one action; true if the view changed and a new frame is due.
    pub fn apply(&mut self, action: ViewAction) -> bool {
        match action {
            ViewAction::Resize(width, height) => {
                let window = WindowSize::new(width, height);
                if window == self.window {
                    return false;
                }
                self.window = window;
            }
            ViewAction::Release(x, y) => {
                let dx = (x - self.window.width / 2.0) as i32;
                let dy = (y - self.window.height / 2.0) as i32;
                self.viewport.pan(dx, dy, self.window);
            }
            ViewAction::Pan(dx, dy) => self.viewport.pan(dx, dy, self.window),
            ViewAction::Scroll(amount) => self.viewport.scroll(amount),
            ViewAction::Reset => self.viewport.reset(),
        }
        debug!(
            "{:?} -> center {:?} zoom {} window {:?}",
            action,
            self.viewport.center(),
            self.viewport.zoom(),
            self.window
        );
        true
    }

    /// Window size in whole pixels, as the renderer needs it.
    pub fn pixels(&self) -> (u32, u32) {
        if self.window.is_degenerate() {
            (0, 0)
        } else {
            (self.window.width.round() as u32, self.window.height.round() as u32)
        }
    }

    pub fn mapping(&self) -> Option<PlaneMapping> {
        let (width, height) = self.pixels();
        self.viewport.mapping(WindowSize::from_pixels(width, height))
    }

    pub fn render(&self, renderer: &Renderer) -> PixelBuffer {
        let (width, height) = self.pixels();
        renderer.render(&self.viewport, width, height)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coord::Point;

    fn window() -> WindowSize {
        WindowSize::new(900.0, 800.0)
    }

    #[test]
    fn test_release_at_center_does_not_move() {
        let mut m = Mandelbrot::new(window());
        assert!(m.apply(ViewAction::Release(450.0, 400.0)));
        assert_eq!(m.viewport.center(), Point::new(-0.75, 0.0));
    }

    #[test]
    fn test_release_pans_by_offset_from_center() {
        let mut m = Mandelbrot::new(window());
        m.apply(ViewAction::Release(900.0, 400.0));
        let mut expected = Viewport::default();
        expected.pan(450, 0, window());
        assert_eq!(m.viewport, expected);
    }

    #[test]
    fn test_release_offset_truncates() {
        let mut a = Mandelbrot::new(window());
        a.apply(ViewAction::Release(460.9, 389.5));
        let mut b = Mandelbrot::new(window());
        b.apply(ViewAction::Pan(10, -10));
        assert_eq!(a.viewport, b.viewport);
    }

    #[test]
    fn test_resize_only_reports_changes() {
        let mut m = Mandelbrot::new(window());
        assert!(!m.apply(ViewAction::Resize(900.0, 800.0)));
        assert!(m.apply(ViewAction::Resize(640.0, 480.0)));
        assert_eq!(m.pixels(), (640, 480));
    }

    #[test]
    fn test_scroll_and_reset() {
        let mut m = Mandelbrot::new(window());
        m.apply(ViewAction::Scroll(1.0));
        m.apply(ViewAction::Scroll(-1.0));
        assert_eq!(m.viewport.zoom(), 1.1 * 0.9);
        m.apply(ViewAction::Reset);
        assert_eq!(m.viewport, Viewport::default());
    }

    #[test]
    fn test_zero_window_renders_nothing() {
        let mut m = Mandelbrot::new(window());
        m.apply(ViewAction::Resize(0.0, 800.0));
        assert_eq!(m.pixels(), (0, 0));
        assert!(m.mapping().is_none());
        assert_eq!(m.render(&Renderer::default()).len(), 0);
    }
}
