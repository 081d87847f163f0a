pub mod bounds;
pub mod polygon;
pub mod projection;

pub use bounds::{Bounds, Point};
pub use polygon::{LineString, MultiPolygon, Polygon, TravelTime};
pub use projection::{lat_lng_to_web_mercator, lat_lng_to_world, web_mercator_to_world};
