//! Keeping projected bands aligned with a host map.
//!
//! A host integration implements [`ViewportAdapter`] once and forwards its
//! settle and zoom-animation events as [`MapEvent`]s. The [`PolygonOverlay`]
//! does the rest: culling, pixel conversion and handing [`Frame`]s to a
//! [`Renderer`].

pub mod frame;
mod pipeline;
pub mod viewport;

pub use frame::{Frame, PixelShape, PixelTransform, Transform};
pub use pipeline::PolygonOverlay;
pub use viewport::MercatorViewport;

use crate::config::RenderOptions;
use crate::geometry::{Bounds, Point};

/// What the pipeline needs to know about the host map
///
/// Every call must answer from the host's current state; the pipeline reads
/// these afresh on each pass and never caches them.
pub trait ViewportAdapter {
    fn zoom(&self) -> f64;

    /// The visible rectangle in the world plane
    fn viewport(&self) -> Bounds;

    /// Convert a world rectangle to host pixels, corner by corner
    ///
    /// The corners keep their labels; whether pixel y grows up or down is up
    /// to the host.
    fn element_pixels(&self, bounds: &Bounds) -> Bounds;
}

impl<T: ViewportAdapter + ?Sized> ViewportAdapter for &T {
    fn zoom(&self) -> f64 {
        (**self).zoom()
    }

    fn viewport(&self) -> Bounds {
        (**self).viewport()
    }

    fn element_pixels(&self, bounds: &Bounds) -> Bounds {
        (**self).element_pixels(bounds)
    }
}

/// The drawing side: turns frames into something visible
pub trait Renderer {
    /// Replace whatever was drawn before with `frame`
    fn render(&mut self, frame: &Frame, options: &RenderOptions);

    /// Move/scale the current drawing without re-rendering it
    fn set_transform(&mut self, transform: Transform);

    fn set_opacity(&mut self, opacity: f64);

    /// Drop the render surface
    fn release(&mut self);
}

/// Host events the overlay reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// A pan gesture settled
    MoveEnd,
    /// The map element changed size
    Resize,
    /// A zoom gesture or animation settled
    ZoomEnd,
    /// A zoom animation towards `zoom`, centred on `center`, is running
    ZoomAnim { zoom: f64, center: Point },
}
