//! Projected travel-time geometry.
//!
//! Raw rings are projected into the world plane exactly once, when a
//! [`MultiPolygon`] is built. Every level caches its own [`Bounds`] so the
//! render pipeline can cull without touching individual points.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::projection::web_mercator_to_world;
use super::{Bounds, Point};
use crate::domain::{MultipolygonData, PolygonData};
use crate::error::{MalformedPolygon, OverlayError};

/// A finite travel time, totally ordered so it can key a map
#[derive(Debug, Clone, Copy)]
pub struct TravelTime(f64);

impl TravelTime {
    /// `None` for NaN and infinities
    pub fn new(seconds: f64) -> Option<Self> {
        // Adding +0.0 folds -0.0 into +0.0, they must share a bucket
        seconds.is_finite().then_some(Self(seconds + 0.0))
    }

    pub fn seconds(self) -> f64 {
        self.0
    }
}

impl PartialEq for TravelTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TravelTime {}

impl PartialOrd for TravelTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TravelTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// One projected ring
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    points: Vec<Point>,
    bounds: Bounds,
}

impl LineString {
    /// Project a ring of web mercator `[x, y]` pairs
    pub fn from_coordinates(coordinates: &[[f64; 2]]) -> Self {
        let mut bounds = Bounds::empty();
        let points = coordinates
            .iter()
            .map(|&[x, y]| {
                let point = web_mercator_to_world(x, y);
                bounds.expand_point(point.x, point.y);
                point
            })
            .collect();

        Self { points, bounds }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One travel-time band: an outer ring with optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    travel_time: TravelTime,
    area: f64,
    /// Outer ring first, holes after it in input order
    line_strings: Vec<LineString>,
    bounds: Bounds,
}

impl Polygon {
    /// Validate and project one band
    pub fn from_data(data: &PolygonData) -> Result<Self, MalformedPolygon> {
        let travel_time = TravelTime::new(data.travel_time)
            .ok_or(MalformedPolygon::NonFiniteTravelTime(data.travel_time))?;
        data.validate_rings()?;

        let mut bounds = Bounds::empty();
        let line_strings: Vec<LineString> = data
            .rings()
            .map(|ring| {
                let line_string = LineString::from_coordinates(ring);
                bounds.expand(line_string.bounds());
                line_string
            })
            .collect();

        Ok(Self {
            travel_time,
            area: data.area_or_computed(),
            line_strings,
            bounds,
        })
    }

    pub fn travel_time(&self) -> TravelTime {
        self.travel_time
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn outer(&self) -> &LineString {
        &self.line_strings[0]
    }

    pub fn holes(&self) -> &[LineString] {
        &self.line_strings[1..]
    }

    pub fn line_strings(&self) -> &[LineString] {
        &self.line_strings
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }
}

/// The full dataset, bucketed by travel time
///
/// Built wholesale from raw data and never mutated afterwards. Buckets are
/// traversed in descending travel time so that outer bands are painted first
/// and the nested, shorter bands end up on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiPolygon {
    buckets: BTreeMap<TravelTime, Vec<Polygon>>,
    bounds: Bounds,
}

impl MultiPolygon {
    /// Project all groups, failing on the first malformed polygon
    pub fn from_data(groups: &[MultipolygonData]) -> Result<Self, OverlayError> {
        let mut multipolygon = Self::default();

        for (group, data) in groups.iter().enumerate() {
            for (index, polygon) in data.polygons.iter().enumerate() {
                let polygon =
                    Polygon::from_data(polygon).map_err(|reason| OverlayError::MalformedInput {
                        group,
                        polygon: index,
                        reason,
                    })?;
                multipolygon.push(polygon);
            }
        }

        Ok(multipolygon)
    }

    /// Collect already projected polygons, keeping their order per bucket
    pub fn from_polygons(polygons: impl IntoIterator<Item = Polygon>) -> Self {
        let mut multipolygon = Self::default();
        for polygon in polygons {
            multipolygon.push(polygon);
        }
        multipolygon
    }

    fn push(&mut self, polygon: Polygon) {
        self.bounds.expand(polygon.bounds());
        self.buckets
            .entry(polygon.travel_time())
            .or_default()
            .push(polygon);
    }

    /// Union of all polygon bounds; empty when there is no polygon
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Buckets in descending travel time
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (TravelTime, &[Polygon])> {
        self.buckets
            .iter()
            .rev()
            .map(|(travel_time, polygons)| (*travel_time, polygons.as_slice()))
    }

    /// Visit buckets in descending travel time
    pub fn for_each(&self, mut f: impl FnMut(f64, &[Polygon])) {
        for (travel_time, polygons) in self.iter() {
            f(travel_time.seconds(), polygons);
        }
    }

    pub fn get(&self, travel_time: f64) -> Option<&[Polygon]> {
        let key = TravelTime::new(travel_time)?;
        self.buckets.get(&key).map(Vec::as_slice)
    }

    /// Distinct travel times, descending
    pub fn travel_times(&self) -> Vec<f64> {
        self.iter().map(|(t, _)| t.seconds()).collect()
    }

    /// Number of polygons over all buckets
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
