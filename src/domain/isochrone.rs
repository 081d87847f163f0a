use geo::Area;
use serde::Deserialize;

use crate::error::MalformedPolygon;

/// One travel-time band as delivered by the routing service
///
/// Coordinates are `[x, y]` pairs in web mercator metres. Rings are closed
/// implicitly, the first point does not need repeating.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonData {
    /// Travel time threshold of this band, in seconds
    pub travel_time: f64,
    /// Area in square metres; computed from the rings when missing
    #[serde(default)]
    pub area: Option<f64>,
    pub outer_boundary: Vec<[f64; 2]>,
    #[serde(default)]
    pub inner_boundary: Vec<Vec<[f64; 2]>>,
}

impl PolygonData {
    pub fn new(travel_time: f64, outer_boundary: Vec<[f64; 2]>) -> Self {
        Self {
            travel_time,
            area: None,
            outer_boundary,
            inner_boundary: Vec::new(),
        }
    }

    pub fn with_holes(
        travel_time: f64,
        outer_boundary: Vec<[f64; 2]>,
        inner_boundary: Vec<Vec<[f64; 2]>>,
    ) -> Self {
        Self {
            travel_time,
            area: None,
            outer_boundary,
            inner_boundary,
        }
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    /// Outer ring followed by the holes
    pub fn rings(&self) -> impl Iterator<Item = &[[f64; 2]]> {
        std::iter::once(self.outer_boundary.as_slice())
            .chain(self.inner_boundary.iter().map(Vec::as_slice))
    }

    /// Reject input that would project into degenerate geometry
    pub fn validate(&self) -> Result<(), MalformedPolygon> {
        if !self.travel_time.is_finite() {
            return Err(MalformedPolygon::NonFiniteTravelTime(self.travel_time));
        }
        self.validate_rings()
    }

    /// The ring checks of [`PolygonData::validate`] alone
    pub fn validate_rings(&self) -> Result<(), MalformedPolygon> {
        for (ring, coordinates) in self.rings().enumerate() {
            if coordinates.len() < 3 {
                return Err(MalformedPolygon::RingTooShort {
                    ring,
                    len: coordinates.len(),
                });
            }
            if coordinates
                .iter()
                .any(|[x, y]| !x.is_finite() || !y.is_finite())
            {
                return Err(MalformedPolygon::NonFiniteCoordinate { ring });
            }
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// The supplied area, or the planar area of the rings in square metres
    pub fn area_or_computed(&self) -> f64 {
        if let Some(area) = self.area {
            return area;
        }

        let to_line = |ring: &[[f64; 2]]| -> geo::LineString<f64> {
            ring.iter()
                .map(|&[x, y]| geo::coord! { x: x, y: y })
                .collect()
        };

        let polygon = geo::Polygon::new(
            to_line(&self.outer_boundary),
            self.inner_boundary.iter().map(|h| to_line(h.as_slice())).collect(),
        );
        polygon.unsigned_area()
    }
}

/// A group of bands, typically all bands computed for one source location
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MultipolygonData {
    pub polygons: Vec<PolygonData>,
}

impl MultipolygonData {
    pub fn new(polygons: Vec<PolygonData>) -> Self {
        Self { polygons }
    }
}
