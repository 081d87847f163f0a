use thiserror::Error;

/// Why a single polygon was rejected
///
/// Ring `0` is the outer boundary, rings `1..` are the holes in input order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedPolygon {
    #[error("travel time {0} is not finite")]
    NonFiniteTravelTime(f64),
    #[error("ring {ring} has {len} coordinate pairs, at least 3 are required")]
    RingTooShort { ring: usize, len: usize },
    #[error("ring {ring} contains a non-finite coordinate")]
    NonFiniteCoordinate { ring: usize },
}

#[derive(Debug, Error)]
pub enum OverlayError {
    /// Polygon `polygon` of group `group` could not be projected
    #[error("malformed polygon {polygon} in group {group}")]
    MalformedInput {
        group: usize,
        polygon: usize,
        #[source]
        reason: MalformedPolygon,
    },
    #[error("invalid render options: {0}")]
    InvalidOptions(String),
}

pub type Result<T, E = OverlayError> = std::result::Result<T, E>;
