use geo::BoundingRect;
use thiserror::Error;

use crate::domain::Coordinate;

/// Minimum number of vertices for a closed ring
pub const MIN_VERTICES: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolygonError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
}

/// A closed ring of coordinates
///
/// The last vertex is implicitly connected back to the first. Construction
/// rejects rings with fewer than three vertices, so membership tests never
/// need to re-check the vertex count.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Coordinate>,
}

impl Polygon {
    pub fn new(vertices: Vec<Coordinate>) -> Result<Self, PolygonError> {
        if vertices.len() < MIN_VERTICES {
            return Err(PolygonError::TooFewVertices(vertices.len()));
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Convert to a `geo` polygon with no interior rings
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let exterior: geo::LineString<f64> =
            self.vertices.iter().map(|c| c.to_geo()).collect();
        geo::Polygon::new(exterior, Vec::new())
    }

    /// Axis-aligned bounding box of the ring
    pub fn bounds(&self) -> Bounds {
        // never None for a ring with >= 3 vertices
        self.to_geo()
            .bounding_rect()
            .map(Bounds::from)
            .unwrap_or_default()
    }
}

/// Bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from a set of points
    pub fn from_points(points: &[Coordinate]) -> Option<Self> {
        let line: geo::LineString<f64> = points.iter().map(|c| c.to_geo()).collect();
        line.bounding_rect().map(Bounds::from)
    }

    /// Grow to cover another box
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lng: self.min_lng.min(other.min_lng),
            max_lng: self.max_lng.max(other.max_lng),
        }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

impl From<geo::Rect<f64>> for Bounds {
    fn from(rect: geo::Rect<f64>) -> Self {
        Self {
            min_lat: rect.min().y,
            max_lat: rect.max().y,
            min_lng: rect.min().x,
            max_lng: rect.max().x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Vec<Coordinate> {
        points.iter().copied().map(Coordinate::from).collect()
    }

    #[test]
    fn test_polygon_rejects_degenerate() {
        assert_eq!(Polygon::new(Vec::new()), Err(PolygonError::TooFewVertices(0)));
        assert_eq!(
            Polygon::new(ring(&[(0.0, 0.0), (1.0, 1.0)])),
            Err(PolygonError::TooFewVertices(2))
        );
        assert!(Polygon::new(ring(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0)])).is_ok());
    }

    #[test]
    fn test_polygon_bounds() {
        let poly = Polygon::new(ring(&[(0.0, 0.0), (0.0, 10.0), (4.0, 10.0), (4.0, 0.0)])).unwrap();
        let bounds = poly.bounds();

        assert_eq!(bounds.min_lat, 0.0);
        assert_eq!(bounds.max_lat, 4.0);
        assert_eq!(bounds.min_lng, 0.0);
        assert_eq!(bounds.max_lng, 10.0);
        assert_eq!(bounds.center(), Coordinate::new(2.0, 5.0));
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::from_points(&ring(&[(0.0, 0.0), (1.0, 1.0)])).unwrap();
        let b = Bounds::from_points(&ring(&[(-2.0, 3.0), (0.5, 5.0)])).unwrap();
        let u = a.union(&b);

        assert_eq!(u.min_lat, -2.0);
        assert_eq!(u.max_lat, 1.0);
        assert_eq!(u.min_lng, 0.0);
        assert_eq!(u.max_lng, 5.0);
    }

    #[test]
    fn test_bounds_from_empty() {
        assert!(Bounds::from_points(&[]).is_none());
    }
}
