use std::collections::VecDeque;
use std::mem;
use std::rc::Rc;

use super::frame::{Frame, PixelShape, PixelTransform, Transform};
use super::{MapEvent, Renderer, ViewportAdapter};
use crate::config::{ColorStop, RenderOptions};
use crate::domain::MultipolygonData;
use crate::error::Result;
use crate::geometry::{Bounds, MultiPolygon, Point};

/// Work that has to wait until an adapter is attached
#[derive(Debug)]
enum Deferred {
    SetData(Rc<MultiPolygon>),
}

#[derive(Debug)]
enum Lifecycle<A> {
    /// No adapter yet; data is queued in arrival order
    Unready { pending: VecDeque<Deferred> },
    Ready { adapter: A },
    Removed,
}

/// A travel-time layer kept in sync with a host map
///
/// Starts out unready. Data may be set at any time, but nothing is drawn
/// before [`PolygonOverlay::attach`] hands over a [`ViewportAdapter`]; the
/// data set up to then is applied in order and drawn once. After
/// [`PolygonOverlay::remove`] every call is a no-op.
#[derive(Debug)]
pub struct PolygonOverlay<A, R> {
    lifecycle: Lifecycle<A>,
    renderer: R,
    options: RenderOptions,
    data: Option<Rc<MultiPolygon>>,
}

impl<A: ViewportAdapter, R: Renderer> PolygonOverlay<A, R> {
    pub fn new(renderer: R, options: RenderOptions) -> Self {
        Self {
            lifecycle: Lifecycle::Unready {
                pending: VecDeque::new(),
            },
            renderer,
            options,
            data: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ready { .. })
    }

    pub fn is_removed(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Removed)
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The data currently drawn; queued data does not count until attached
    pub fn data(&self) -> Option<&Rc<MultiPolygon>> {
        self.data.as_ref()
    }

    /// The render surface
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn adapter(&self) -> Option<&A> {
        match &self.lifecycle {
            Lifecycle::Ready { adapter } => Some(adapter),
            _ => None,
        }
    }

    /// Mutable access for hosts that keep their map state in the adapter
    pub fn adapter_mut(&mut self) -> Option<&mut A> {
        match &mut self.lifecycle {
            Lifecycle::Ready { adapter } => Some(adapter),
            _ => None,
        }
    }

    /// Bind the overlay to a live map
    ///
    /// Applies everything queued while unready, then draws exactly once.
    /// Only the first call has an effect.
    pub fn attach(&mut self, adapter: A) {
        let pending = match self.lifecycle {
            Lifecycle::Unready { ref mut pending } => mem::take(pending),
            Lifecycle::Ready { .. } => {
                warn!("Overlay is already attached, ignoring new adapter");
                return;
            }
            Lifecycle::Removed => {
                warn!("Overlay was removed, ignoring adapter");
                return;
            }
        };

        self.lifecycle = Lifecycle::Ready { adapter };
        debug!(
            "Overlay attached, applying {} deferred operation(s)",
            pending.len()
        );

        self.renderer.set_opacity(self.options.opacity);
        for operation in pending {
            match operation {
                Deferred::SetData(data) => self.replace_data(data),
            }
        }
        self.redraw(true);
    }

    /// Project and show a new dataset
    ///
    /// Projection happens right away, so malformed input is reported here
    /// and leaves the current data untouched.
    pub fn set_data(&mut self, data: &[MultipolygonData]) -> Result<()> {
        let multipolygon = MultiPolygon::from_data(data)?;
        self.set_multipolygon(Rc::new(multipolygon));
        Ok(())
    }

    /// Show an already projected dataset
    pub fn set_multipolygon(&mut self, data: Rc<MultiPolygon>) {
        match self.lifecycle {
            Lifecycle::Unready { ref mut pending } => {
                debug!("Overlay not attached yet, deferring data");
                pending.push_back(Deferred::SetData(data));
            }
            Lifecycle::Ready { .. } => {
                self.replace_data(data);
                self.redraw(false);
            }
            Lifecycle::Removed => {
                debug!("Overlay was removed, dropping data");
            }
        }
    }

    fn replace_data(&mut self, data: Rc<MultiPolygon>) {
        info!(
            "Overlay data replaced: {} polygons in {} bands",
            data.len(),
            data.travel_times().len()
        );
        self.data = Some(data);
    }

    /// Re-project the visible bands for the current viewport
    ///
    /// Returns whether a frame reached the renderer. Before attaching, after
    /// removal, or when the adapter reports unusable pixel bounds, nothing is
    /// drawn; the next settle event tries again.
    pub fn redraw(&mut self, force_recenter: bool) -> bool {
        let Lifecycle::Ready { adapter } = &self.lifecycle else {
            debug!("Redraw requested while the overlay is not attached");
            return false;
        };

        let Some(frame) = build_frame(adapter, self.data.as_deref(), force_recenter) else {
            return false;
        };

        self.renderer.set_transform(Transform::identity());
        self.renderer.render(&frame, &self.options);
        true
    }

    /// Host-facing name of [`PolygonOverlay::redraw`]
    pub fn draw(&mut self, force_recenter: bool) -> bool {
        self.redraw(force_recenter)
    }

    /// React to a host map event
    ///
    /// Settle events redraw; `Resize` and `ZoomEnd` also re-anchor the
    /// transform origin. A running zoom animation only transforms what is
    /// already drawn.
    pub fn handle_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::MoveEnd => {
                self.redraw(false);
            }
            MapEvent::Resize | MapEvent::ZoomEnd => {
                self.redraw(true);
            }
            MapEvent::ZoomAnim { zoom, center } => self.animate_zoom(zoom, center),
        }
    }

    fn animate_zoom(&mut self, target_zoom: f64, target_center: Point) {
        let (Lifecycle::Ready { adapter }, Some(data)) = (&self.lifecycle, &self.data) else {
            return;
        };
        if data.is_empty() {
            return;
        }
        let Some((viewport, _, to_pixels)) = pixel_mapping(adapter) else {
            return;
        };

        let transform = Transform::for_zoom_animation(
            &to_pixels,
            viewport.center(),
            adapter.zoom(),
            target_center,
            target_zoom,
        );
        self.renderer.set_transform(transform);
    }

    pub fn set_inverse(&mut self, inverse: bool) {
        self.options.inverse = inverse;
        self.redraw(false);
    }

    pub fn set_colors(&mut self, colors: Vec<ColorStop>) {
        self.options.colors = colors;
        self.redraw(false);
    }

    /// Applied to the render surface directly, no redraw needed
    pub fn set_opacity(&mut self, opacity: f64) {
        self.options.opacity = opacity.clamp(0.0, 1.0);
        if !self.is_removed() {
            self.renderer.set_opacity(self.options.opacity);
        }
    }

    pub fn set_stroke_width(&mut self, stroke_width: f64) {
        self.options.stroke_width = stroke_width.max(0.0);
        self.redraw(false);
    }

    /// Replace all styling at once
    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
        if !self.is_removed() {
            self.renderer.set_opacity(self.options.opacity);
        }
        self.redraw(false);
    }

    /// Release the render surface and detach from the host
    ///
    /// Drops queued work and data. Returns the adapter if one was attached.
    pub fn remove(&mut self) -> Option<A> {
        let previous = mem::replace(&mut self.lifecycle, Lifecycle::Removed);
        self.data = None;

        match previous {
            Lifecycle::Unready { pending } => {
                debug!(
                    "Overlay removed before attaching, dropping {} deferred operation(s)",
                    pending.len()
                );
                self.renderer.release();
                None
            }
            Lifecycle::Ready { adapter } => {
                debug!("Overlay removed");
                self.renderer.release();
                Some(adapter)
            }
            Lifecycle::Removed => None,
        }
    }
}

/// Current viewport, its pixel corners and the map between them
///
/// Hosts may label the corners geographically, which inverts y in the world
/// plane, so the viewport is normalized before anything else.
fn pixel_mapping<A: ViewportAdapter>(adapter: &A) -> Option<(Bounds, Bounds, PixelTransform)> {
    let viewport = adapter.viewport().normalized();
    let pixel_viewport = adapter.element_pixels(&viewport);

    match PixelTransform::between(&viewport, &pixel_viewport) {
        Some(to_pixels) => Some((viewport, pixel_viewport, to_pixels)),
        None => {
            warn!(
                "Unusable pixel bounds {:?} for viewport {:?}",
                pixel_viewport, viewport
            );
            None
        }
    }
}

/// One render pass against a fresh viewport snapshot
fn build_frame<A: ViewportAdapter>(
    adapter: &A,
    data: Option<&MultiPolygon>,
    recenter: bool,
) -> Option<Frame> {
    let zoom = adapter.zoom();
    let (viewport, pixel_viewport, to_pixels) = pixel_mapping(adapter)?;

    let mut frame = Frame::new(zoom, viewport, pixel_viewport, recenter);
    let Some(data) = data else {
        return Some(frame);
    };

    if data.bounds().intersection(&viewport).is_empty() {
        debug!("No data inside the viewport at zoom {}", zoom);
        return Some(frame);
    }

    let mut culled = 0;
    for (_, polygons) in data.iter() {
        for polygon in polygons {
            if polygon.bounds().intersects(&viewport) {
                frame.shapes.push(PixelShape::project(polygon, &to_pixels));
            } else {
                culled += 1;
            }
        }
    }

    debug!(
        "Drawing {} shapes at zoom {}, {} culled",
        frame.shapes.len(),
        zoom,
        culled
    );
    Some(frame)
}
