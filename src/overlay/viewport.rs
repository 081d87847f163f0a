use super::ViewportAdapter;
use crate::geometry::projection::{lat_lng_to_world, pixel_to_world, world_to_pixel, zoom_scale};
use crate::geometry::{Bounds, Point};

/// Smallest and largest zoom a [`MercatorViewport`] accepts
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;

/// A host-free pan/zoom map state
///
/// Keeps a center in the world plane, a zoom level and the size of the map
/// element in pixels. Pixel coordinates are relative to the element's top
/// left corner. Useful for headless rendering and for driving an overlay
/// without a real map host.
#[derive(Debug, Clone, PartialEq)]
pub struct MercatorViewport {
    center: Point,
    zoom: f64,
    /// Element size in pixels
    size: Point,
}

impl MercatorViewport {
    pub fn new(center: Point, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            size,
        }
    }

    /// Center given as WGS84 degrees
    pub fn from_lat_lng(lat: f64, lng: f64, zoom: f64, size: Point) -> Self {
        Self::new(lat_lng_to_world(lat, lng), zoom, size)
    }

    /// View centred on `bounds` at the largest whole zoom showing all of it
    ///
    /// `None` for empty bounds. A single point gets the maximum zoom.
    pub fn fit(bounds: &Bounds, size: Point) -> Option<Self> {
        if bounds.is_empty() {
            return None;
        }
        let axis_zoom = |extent: f64, pixels: f64| {
            if extent > 0.0 {
                (pixels / extent).log2()
            } else {
                f64::INFINITY
            }
        };
        let zoom = axis_zoom(bounds.width(), size.x).min(axis_zoom(bounds.height(), size.y));
        let zoom = if zoom == f64::INFINITY {
            MAX_ZOOM
        } else {
            zoom.floor()
        };
        Some(Self::new(bounds.center(), zoom, size))
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> Point {
        self.size
    }

    pub fn pan_to(&mut self, center: Point) {
        self.center = center;
    }

    /// Move the view by a pixel offset, as a drag would
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let scale = zoom_scale(self.zoom);
        self.center = Point::new(self.center.x + dx / scale, self.center.y + dy / scale);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn resize(&mut self, size: Point) {
        self.size = size;
    }

    /// Absolute pixel position of the element's top left corner
    pub fn pixel_origin(&self) -> Point {
        let center = world_to_pixel(self.center, self.zoom);
        Point::new(center.x - self.size.x / 2.0, center.y - self.size.y / 2.0)
    }

    /// World point to element pixels
    pub fn world_to_element(&self, point: Point) -> Point {
        let pixel = world_to_pixel(point, self.zoom);
        let origin = self.pixel_origin();
        Point::new(pixel.x - origin.x, pixel.y - origin.y)
    }

    /// Element pixels to world point
    pub fn element_to_world(&self, point: Point) -> Point {
        let origin = self.pixel_origin();
        pixel_to_world(Point::new(point.x + origin.x, point.y + origin.y), self.zoom)
    }
}

impl ViewportAdapter for MercatorViewport {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn viewport(&self) -> Bounds {
        Bounds::new(
            self.element_to_world(Point::new(0.0, 0.0)),
            self.element_to_world(self.size),
        )
    }

    fn element_pixels(&self, bounds: &Bounds) -> Bounds {
        bounds.reproject(|p| self.world_to_element(p))
    }
}
