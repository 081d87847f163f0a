//! isoverlay - Draw travel-time bands over a pan/zoom map and keep them aligned

#[macro_use]
extern crate log;

pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod render;

pub use config::{ColorStop, RenderOptions};
pub use domain::{MultipolygonData, PolygonData};
pub use error::{MalformedPolygon, OverlayError, Result};
pub use geometry::{Bounds, MultiPolygon, Point};
pub use overlay::{MapEvent, MercatorViewport, PolygonOverlay, Renderer, ViewportAdapter};
pub use render::SvgRenderer;
