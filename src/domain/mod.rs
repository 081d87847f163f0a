pub mod isochrone;

pub use isochrone::{MultipolygonData, PolygonData};
