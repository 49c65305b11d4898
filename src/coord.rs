use num::{traits::NumOps, Num, One};

use crate::complex::*;
use crate::config;

trait Two {
    fn two() -> Self;
}

impl<T> Two for T
where
    T: One + NumOps,
{
    fn two() -> Self {
        T::one() + T::one()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Axis<T> {
    pub min: T,
    pub max: T,
}

impl<T> Axis<T>
where
    T: Num + Copy,
{
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn length(&self) -> T {
        self.max - self.min
    }

    pub fn center(&self) -> T {
        (self.max + self.min) / T::two()
    }

    /// Widen from `length` to `new_length`, split evenly between both ends.
    fn grow(&mut self, length: T, new_length: T) {
        let half = (new_length - length) / T::two();
        self.max = self.max + half;
        self.min = self.min - half;
    }
}

/// Rectangle of the complex plane, `x` along the real axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds<T> {
    pub x: Axis<T>,
    pub y: Axis<T>,
}

impl<T> Bounds<T>
where
    T: Num + Copy,
{
    pub fn new(x: Axis<T>, y: Axis<T>) -> Self {
        Self { x, y }
    }

    pub fn from_nums(x1: T, x2: T, y1: T, y2: T) -> Self {
        Self::new(Axis::new(x1, x2), Axis::new(y1, y2))
    }

    pub fn from_box(center_x: T, center_y: T, width: T, height: T) -> Self {
        let x1 = center_x - (width / T::two());
        let x2 = center_x + (width / T::two());
        let y1 = center_y - (height / T::two());
        let y2 = center_y + (height / T::two());
        Self::from_nums(x1, x2, y1, y2)
    }

    pub fn aspect_ratio(&self) -> T {
        self.x.length() / self.y.length()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point<T>
where
    T: Num + Copy,
{
    pub x: T,
    pub y: T,
}

impl<T> Point<T>
where
    T: Num + Copy,
{
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
    pub fn add(&self, point: &Self) -> Self {
        Point::new(self.x + point.x, self.y + point.y)
    }
    pub fn mul(&self, scalar: T) -> Self {
        Point::new(self.x * scalar, self.y * scalar)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WindowSize {
    pub width: f64,
    pub height: f64,
}

impl WindowSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Region of the complex plane shown in the window.
///
/// Only `center` and `zoom` change after construction. The base extents and
/// the aspect ratio derived from them are fixed, and serve as the reference
/// when the window is resized to a different shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    center: Point<f64>,
    base_extent: Point<f64>,
    base_aspect: f64,
    zoom: f64,
}

impl Viewport {
    pub fn new(center: Point<f64>, base_extent: Point<f64>) -> Self {
        Self {
            center,
            base_extent,
            base_aspect: base_extent.x / base_extent.y,
            zoom: config::INITIAL_ZOOM,
        }
    }

    pub fn center(&self) -> Point<f64> {
        self.center
    }

    pub fn base_extent(&self) -> Point<f64> {
        self.base_extent
    }

    pub fn base_aspect(&self) -> f64 {
        self.base_aspect
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// No clamp: extreme values run into f64 precision limits, which is
    /// left visible rather than corrected.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Nominal plane extents at the current zoom, before aspect correction.
    pub fn extent(&self) -> Point<f64> {
        self.base_extent.mul(self.zoom)
    }

    /// Move the center by a pixel offset measured in a window of the given
    /// size. Dragging right moves the center right.
    pub fn pan(&mut self, pixel_dx: i32, pixel_dy: i32, window: WindowSize) {
        if window.is_degenerate() {
            log::warn!("ignoring pan on degenerate window {:?}", window);
            return;
        }
        let extent = self.extent();
        let offset = Point::new(
            pixel_dx as f64 / window.width * extent.x,
            pixel_dy as f64 / window.height * extent.y,
        );
        self.center = self.center.add(&offset);
    }

    /// Apply one wheel step: positive amounts zoom out, anything else zooms in.
    pub fn scroll(&mut self, amount: f64) {
        let factor = if amount > 0.0 {
            config::ZOOM_OUT_FACTOR
        } else {
            config::ZOOM_IN_FACTOR
        };
        self.set_zoom(self.zoom * factor);
    }

    /// Back to the startup center and zoom; base extents are kept.
    pub fn reset(&mut self) {
        self.center = Point::new(config::CENTER.0, config::CENTER.1);
        self.zoom = config::INITIAL_ZOOM;
    }

    /// Plane bounds for a window, widened along whichever axis the window is
    /// relatively longer in so the image is never stretched.
    pub fn plane_bounds(&self, window: WindowSize) -> Bounds<f64> {
        let extent = self.extent();
        let mut bounds = Bounds::from_box(self.center.x, self.center.y, extent.x, extent.y);
        if window.is_degenerate() {
            return bounds;
        }

        let window_aspect = window.aspect_ratio();
        let drift = window_aspect / self.base_aspect;
        if drift > 1.0 {
            let new_x_range = extent.x * window_aspect / self.base_aspect;
            bounds.x.grow(extent.x, new_x_range);
        } else if drift < 1.0 {
            let new_y_range = extent.y * self.base_aspect / window_aspect;
            bounds.y.grow(extent.y, new_y_range);
        }
        bounds
    }

    /// Snapshot of the pixel-to-plane transform, or `None` for a window
    /// with no area.
    pub fn mapping(&self, window: WindowSize) -> Option<PlaneMapping> {
        if window.is_degenerate() {
            None
        } else {
            Some(PlaneMapping::new(self.plane_bounds(window), window))
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        config::initial_viewport()
    }
}

/// Immutable pixel-to-plane transform. Render workers only ever see this,
/// never the `Viewport` it came from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneMapping {
    pub bounds: Bounds<f64>,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl PlaneMapping {
    pub fn new(bounds: Bounds<f64>, window: WindowSize) -> Self {
        Self {
            bounds,
            scale_x: window.width / bounds.x.length(),
            scale_y: window.height / bounds.y.length(),
        }
    }

    pub fn to_plane(&self, px: f64, py: f64) -> C<f64> {
        c(
            px / self.scale_x + self.bounds.x.min,
            py / self.scale_y + self.bounds.y.min,
        )
    }

    pub fn to_pixel(&self, z: C<f64>) -> (f64, f64) {
        (
            (z.re - self.bounds.x.min) * self.scale_x,
            (z.im - self.bounds.y.min) * self.scale_y,
        )
    }

    /// Plane width covered by one pixel column.
    pub fn pixel_width(&self) -> f64 {
        1.0 / self.scale_x
    }
}
