//! What a redraw hands to the renderer.

use crate::geometry::projection::zoom_scale;
use crate::geometry::{Bounds, Point, Polygon};

/// One visible band converted to host pixels
#[derive(Debug, Clone, PartialEq)]
pub struct PixelShape {
    /// Travel time of the band, also the colour lookup key
    pub travel_time: f64,
    /// Outer ring first, then the holes
    pub rings: Vec<Vec<Point>>,
    /// Pixel bounds of all rings, min/max normalized
    pub bounds: Bounds,
}

impl PixelShape {
    pub(crate) fn project(polygon: &Polygon, to_pixels: &PixelTransform) -> Self {
        let rings: Vec<Vec<Point>> = polygon
            .line_strings()
            .iter()
            .map(|line| line.points().iter().map(|&p| to_pixels.apply(p)).collect())
            .collect();
        let bounds = polygon.bounds().reproject(|p| to_pixels.apply(p)).normalized();

        Self {
            travel_time: polygon.travel_time().seconds(),
            rings,
            bounds,
        }
    }

    /// Empty for a shape without rings
    pub fn outer(&self) -> &[Point] {
        self.rings.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn holes(&self) -> &[Vec<Point>] {
        self.rings.get(1..).unwrap_or(&[])
    }
}

/// The result of one render pass
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub zoom: f64,
    /// Viewport in the world plane, as reported by the adapter
    pub viewport: Bounds,
    /// The same viewport in host pixels, min/max normalized
    pub pixel_viewport: Bounds,
    /// The host asked for a fresh anchor: attach, resize or a settled zoom
    pub recenter: bool,
    /// Visible bands in drawing order: descending travel time
    pub shapes: Vec<PixelShape>,
}

impl Frame {
    pub(crate) fn new(zoom: f64, viewport: Bounds, pixel_viewport: Bounds, recenter: bool) -> Self {
        Self {
            zoom,
            viewport,
            pixel_viewport: pixel_viewport.normalized(),
            recenter,
            shapes: Vec::new(),
        }
    }

    /// Nothing visible
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Pixel center of the viewport
    pub fn center(&self) -> Point {
        self.pixel_viewport.center()
    }
}

/// Per-axis affine map from world coordinates to host pixels
///
/// Derived from one rectangle known in both spaces, so the host only has to
/// convert two corners per redraw. Axis flips come out as negative scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelTransform {
    scale_x: f64,
    scale_y: f64,
    offset_x: f64,
    offset_y: f64,
}

impl PixelTransform {
    /// `None` when either rectangle is degenerate or not finite
    pub fn between(world: &Bounds, pixels: &Bounds) -> Option<Self> {
        let dx = world.north_east.x - world.south_west.x;
        let dy = world.north_east.y - world.south_west.y;
        if !(dx > 0.0 && dy > 0.0 && dx.is_finite() && dy.is_finite()) {
            return None;
        }

        let scale_x = (pixels.north_east.x - pixels.south_west.x) / dx;
        let scale_y = (pixels.north_east.y - pixels.south_west.y) / dy;
        let offset_x = pixels.south_west.x - world.south_west.x * scale_x;
        let offset_y = pixels.south_west.y - world.south_west.y * scale_y;

        let usable = [scale_x, scale_y, offset_x, offset_y]
            .iter()
            .all(|v| v.is_finite())
            && scale_x != 0.0
            && scale_y != 0.0;
        usable.then_some(Self {
            scale_x,
            scale_y,
            offset_x,
            offset_y,
        })
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale_x + self.offset_x,
            point.y * self.scale_y + self.offset_y,
        )
    }
}

/// Scale about `origin`, then translate; applied to already rendered pixels
///
/// Used while a zoom animation runs, instead of re-projecting every point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Point,
    pub scale: f64,
    /// Pixel position the scale is applied around
    pub origin: Point,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const fn identity() -> Self {
        Self {
            translate: Point::new(0.0, 0.0),
            scale: 1.0,
            origin: Point::new(0.0, 0.0),
        }
    }

    /// True when applying it moves nothing, whatever the origin
    pub fn is_identity(&self) -> bool {
        self.translate == Point::new(0.0, 0.0) && self.scale == 1.0
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.translate.x + self.origin.x + self.scale * (point.x - self.origin.x),
            self.translate.y + self.origin.y + self.scale * (point.y - self.origin.y),
        )
    }

    /// Where drawn geometry goes while the map zooms towards a new view
    ///
    /// `to_pixels` is the mapping the drawn frame was rendered with and
    /// `center` the world center it was rendered at. The map keeps its
    /// center pixel fixed while zooming, so that pixel is the origin and
    /// `target_center` has to end up on it.
    pub fn for_zoom_animation(
        to_pixels: &PixelTransform,
        center: Point,
        zoom: f64,
        target_center: Point,
        target_zoom: f64,
    ) -> Self {
        let scale = zoom_scale(target_zoom - zoom);
        let origin = to_pixels.apply(center);
        let target = to_pixels.apply(target_center);

        Self {
            translate: Point::new(scale * (origin.x - target.x), scale * (origin.y - target.y)),
            scale,
            origin,
        }
    }
}
