/// A coordinate in the world plane, or in host pixels after conversion
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Axis-aligned rectangle over [`Point`]s
///
/// The corner names follow the geographic convention: `south_west` holds the
/// minimum coordinates and `north_east` the maximum ones. In the world plane,
/// where y grows southwards, the "south_west" corner is therefore visually the
/// top-left one. Only the min/max meaning matters to the arithmetic below.
///
/// A fresh bounds is empty: `(+inf, +inf)` to `(-inf, -inf)`, so that the
/// first expansion always replaces both corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Point,
    pub north_east: Point,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    pub const fn empty() -> Self {
        Self {
            south_west: Point::new(f64::INFINITY, f64::INFINITY),
            north_east: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub const fn new(south_west: Point, north_east: Point) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Create bounds covering a set of points (empty for an empty slice)
    pub fn from_points(points: &[Point]) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.expand_point(point.x, point.y);
        }
        bounds
    }

    /// True when no point lies inside, including inverted bounds left behind
    /// by [`Bounds::intersect`] on disjoint rectangles.
    pub fn is_empty(&self) -> bool {
        !(self.south_west.x <= self.north_east.x && self.south_west.y <= self.north_east.y)
    }

    /// Widen to include `(x, y)`
    pub fn expand_point(&mut self, x: f64, y: f64) {
        self.south_west.x = self.south_west.x.min(x);
        self.north_east.x = self.north_east.x.max(x);
        self.south_west.y = self.south_west.y.min(y);
        self.north_east.y = self.north_east.y.max(y);
    }

    /// Widen to include both corners of `other`
    ///
    /// Expanding by an empty bounds is a no-op; folding its infinite corners
    /// in would otherwise turn `self` into the whole plane.
    pub fn expand(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.expand_point(other.north_east.x, other.north_east.y);
        self.expand_point(other.south_west.x, other.south_west.y);
    }

    /// Narrow in place to the overlap with `other`
    ///
    /// Disjoint inputs leave an inverted rectangle; check [`Bounds::is_empty`].
    pub fn intersect(&mut self, other: &Bounds) {
        self.south_west.x = self.south_west.x.max(other.south_west.x);
        self.north_east.x = self.north_east.x.min(other.north_east.x);
        self.south_west.y = self.south_west.y.max(other.south_west.y);
        self.north_east.y = self.north_east.y.min(other.north_east.y);
    }

    /// Copying variant of [`Bounds::intersect`]
    pub fn intersection(&self, other: &Bounds) -> Bounds {
        let mut bounds = *self;
        bounds.intersect(other);
        bounds
    }

    /// Boundary-inclusive containment of `other`
    pub fn contains(&self, other: &Bounds) -> bool {
        self.north_east.x >= other.north_east.x
            && self.north_east.y >= other.north_east.y
            && self.south_west.x <= other.south_west.x
            && self.south_west.y <= other.south_west.y
    }

    /// Overlap on both axes; touching edges count
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(self.north_east.x < other.south_west.x
            || self.north_east.y < other.south_west.y
            || self.south_west.x > other.north_east.x
            || self.south_west.y > other.north_east.y)
    }

    /// The four corners as a closed ring: northwest, northeast, southeast,
    /// southwest.
    pub fn to_ring(&self) -> [Point; 4] {
        [
            Point::new(self.south_west.x, self.north_east.y),
            Point::new(self.north_east.x, self.north_east.y),
            Point::new(self.north_east.x, self.south_west.y),
            Point::new(self.south_west.x, self.south_west.y),
        ]
    }

    /// Pass both corners through `project`
    ///
    /// The result keeps the corner labels, not the axis direction: a
    /// projection that flips an axis yields `south_west > north_east` on that
    /// axis. Call [`Bounds::normalized`] when min/max matters.
    pub fn reproject(&self, mut project: impl FnMut(Point) -> Point) -> Bounds {
        let north_east = project(self.north_east);
        let south_west = project(self.south_west);
        Bounds::new(south_west, north_east)
    }

    /// Re-derive min/max corners
    pub fn normalized(&self) -> Bounds {
        Bounds::new(
            Point::new(
                self.south_west.x.min(self.north_east.x),
                self.south_west.y.min(self.north_east.y),
            ),
            Point::new(
                self.south_west.x.max(self.north_east.x),
                self.south_west.y.max(self.north_east.y),
            ),
        )
    }

    pub fn center(&self) -> Point {
        self.south_west.midpoint(self.north_east)
    }

    pub fn width(&self) -> f64 {
        self.north_east.x - self.south_west.x
    }

    pub fn height(&self) -> f64 {
        self.north_east.y - self.south_west.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Bounds {
        Bounds::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    fn samples() -> Vec<Bounds> {
        vec![
            rect(0.0, 0.0, 10.0, 10.0),
            rect(5.0, 5.0, 15.0, 15.0),
            rect(10.0, 10.0, 20.0, 20.0),
            rect(-5.0, -5.0, -1.0, -1.0),
            rect(2.0, 2.0, 3.0, 3.0),
            rect(-100.0, 4.0, 100.0, 6.0),
            rect(7.5, 7.5, 7.5, 7.5),
            Bounds::empty(),
        ]
    }

    #[test]
    fn test_empty_bounds() {
        let bounds = Bounds::empty();
        assert!(bounds.is_empty());
        assert_eq!(Bounds::default(), bounds);
        assert_eq!(Bounds::from_points(&[]), bounds);
    }

    #[test]
    fn test_from_points() {
        let bounds = Bounds::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(1000.0, 2000.0),
            Point::new(500.0, 1000.0),
        ]);

        assert_eq!(bounds.south_west, Point::new(0.0, 0.0));
        assert_eq!(bounds.north_east, Point::new(1000.0, 2000.0));
        assert_eq!(bounds.width(), 1000.0);
        assert_eq!(bounds.height(), 2000.0);
    }

    #[test]
    fn test_expand_point_first_replaces_corners() {
        let mut bounds = Bounds::empty();
        bounds.expand_point(3.0, 4.0);
        assert!(!bounds.is_empty());
        assert_eq!(bounds, rect(3.0, 4.0, 3.0, 4.0));

        // Already inside, no change
        bounds.expand_point(3.0, 4.0);
        assert_eq!(bounds, rect(3.0, 4.0, 3.0, 4.0));
    }

    #[test]
    fn test_expand_then_contains() {
        for a in samples() {
            for b in samples() {
                let mut expanded = a;
                expanded.expand(&b);
                assert!(expanded.contains(&b), "{:?} expanded by {:?}", a, b);
                assert!(expanded.contains(&a) || a.is_empty());
            }
        }
    }

    #[test]
    fn test_expand_by_empty_is_noop() {
        let mut bounds = rect(0.0, 0.0, 1.0, 1.0);
        bounds.expand(&Bounds::empty());
        assert_eq!(bounds, rect(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_intersects_is_symmetric() {
        for a in samples() {
            for b in samples() {
                assert_eq!(a.intersects(&b), b.intersects(&a), "{:?} / {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_touching_edges_intersect() {
        assert!(rect(0.0, 0.0, 10.0, 10.0).intersects(&rect(10.0, 10.0, 20.0, 20.0)));
        assert!(!rect(0.0, 0.0, 10.0, 10.0).intersects(&rect(10.1, 0.0, 20.0, 10.0)));
        assert!(!Bounds::empty().intersects(&rect(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_self_intersection_is_identity() {
        for a in samples() {
            let mut b = a;
            b.intersect(&a);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_disjoint_intersection_is_empty() {
        let mut a = rect(0.0, 0.0, 10.0, 10.0);
        a.intersect(&rect(100.0, 100.0, 200.0, 200.0));
        assert!(a.is_empty());

        let overlap = rect(0.0, 0.0, 10.0, 10.0).intersection(&rect(5.0, -5.0, 15.0, 5.0));
        assert_eq!(overlap, rect(5.0, 0.0, 10.0, 5.0));
    }

    #[test]
    fn test_contains_is_boundary_inclusive() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains(&outer));
        assert!(outer.contains(&rect(0.0, 0.0, 5.0, 10.0)));
        assert!(!outer.contains(&rect(-0.1, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_ring_winding() {
        let ring = rect(0.0, 1.0, 2.0, 3.0).to_ring();
        assert_eq!(
            ring,
            [
                Point::new(0.0, 3.0),
                Point::new(2.0, 3.0),
                Point::new(2.0, 1.0),
                Point::new(0.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_reproject_agrees_with_ring_corners() {
        let project = |p: Point| Point::new(p.x * 4.0 + 3.0, 100.0 - p.y * 2.0);

        for bounds in samples().into_iter().filter(|b| !b.is_empty()) {
            let reprojected = bounds.reproject(project);
            let ring = bounds.to_ring();

            // ring[1] is the north-east corner, ring[3] the south-west one
            assert_eq!(reprojected.north_east, project(ring[1]));
            assert_eq!(reprojected.south_west, project(ring[3]));
        }
    }

    #[test]
    fn test_reproject_flip_needs_normalizing() {
        let flipped = rect(0.0, 0.0, 10.0, 10.0).reproject(|p| Point::new(p.x, -p.y));
        assert!(flipped.is_empty());

        let normalized = flipped.normalized();
        assert_eq!(normalized, rect(0.0, -10.0, 10.0, 0.0));
    }
}
