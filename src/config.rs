//! Startup defaults and command-line overrides for the viewer.

#[cfg(feature = "cli")]
use structopt::StructOpt;

use crate::coord::{Point, Viewport, WindowSize};

pub const WINDOW_TITLE: &str = "Mandel";
pub const WINDOW_WIDTH: u32 = 900;
pub const WINDOW_HEIGHT: u32 = 800;

/// Plane coordinates of the image center at startup.
pub const CENTER: (f64, f64) = (-0.75, 0.0);
/// Plane width and height spanned at zoom 1; frames the whole set.
pub const BASE_EXTENT: (f64, f64) = (2.7, 2.4);
pub const INITIAL_ZOOM: f64 = 1.0;

/// Zoom multiplier for a positive scroll amount (extents grow).
pub const ZOOM_OUT_FACTOR: f64 = 1.1;
/// Zoom multiplier for a zero or negative scroll amount (extents shrink).
pub const ZOOM_IN_FACTOR: f64 = 0.9;

pub const MAX_ITER: u16 = 255;

pub fn initial_viewport() -> Viewport {
    Viewport::new(
        Point::new(CENTER.0, CENTER.1),
        Point::new(BASE_EXTENT.0, BASE_EXTENT.1),
    )
}

pub fn initial_window() -> WindowSize {
    WindowSize::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64)
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(StructOpt))]
#[cfg_attr(
    feature = "cli",
    structopt(name = "mandelpan-viewer", about = "Interactive Mandelbrot viewer")
)]
pub struct ViewerOptions {
    /// Initial window width in pixels
    #[cfg_attr(feature = "cli", structopt(long, default_value = "900"))]
    pub width: u32,

    /// Initial window height in pixels
    #[cfg_attr(feature = "cli", structopt(long, default_value = "800"))]
    pub height: u32,

    /// Render threads; 0 renders on the worker thread without a pool
    #[cfg_attr(feature = "cli", structopt(long))]
    pub threads: Option<usize>,
}

impl ViewerOptions {
    pub fn window(&self) -> WindowSize {
        WindowSize::new(self.width as f64, self.height as f64)
    }

    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get_physical)
    }
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            threads: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_options_match_startup_window() {
        let options = ViewerOptions::default();
        assert_eq!(options.window(), initial_window());
        assert!(options.thread_count() >= 1);
    }

    #[test]
    fn test_explicit_zero_threads() {
        let options = ViewerOptions {
            threads: Some(0),
            ..ViewerOptions::default()
        };
        assert_eq!(options.thread_count(), 0);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_parse_overrides() {
        let options = ViewerOptions::from_iter(&[
            "viewer", "--width", "640", "--height", "480", "--threads", "2",
        ]);
        assert_eq!(options.width, 640);
        assert_eq!(options.height, 480);
        assert_eq!(options.threads, Some(2));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_parse_no_flags() {
        let options = ViewerOptions::from_iter(&["viewer"]);
        assert_eq!(options.width, WINDOW_WIDTH);
        assert_eq!(options.height, WINDOW_HEIGHT);
        assert_eq!(options.threads, None);
    }
}
