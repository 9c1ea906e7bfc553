//! Point-in-polygon membership for geofence checks
//!
//! Ray casting with boundary inclusion:
//! - A point equal to a vertex is on the boundary
//! - A point on an axis-aligned edge is on the boundary
//! - Otherwise a ray towards increasing longitude is cast and crossings are counted
//!
//! All comparisons are exact. Points on diagonal edges are not detected as
//! boundary hits; they fall through to the parity test.

use super::Polygon;
use crate::domain::Coordinate;

/// Where a point lies relative to a polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Inside,
    OnBoundary,
    Outside,
}

impl Membership {
    /// Boundary points count as contained
    pub fn is_contained(self) -> bool {
        !matches!(self, Membership::Outside)
    }
}

/// Classify `point` against a validated polygon
pub fn membership(point: Coordinate, polygon: &Polygon) -> Membership {
    ring_membership(point, polygon.vertices())
}

/// Whether `point` is inside or on the boundary of `polygon`
pub fn contains(point: Coordinate, polygon: &Polygon) -> bool {
    membership(point, polygon).is_contained()
}

/// Classify `point` against a raw ring of vertices
///
/// Rings with fewer than three vertices enclose nothing and yield `Outside`.
pub fn ring_membership(point: Coordinate, ring: &[Coordinate]) -> Membership {
    let n = ring.len();
    if n < 3 {
        return Membership::Outside;
    }

    let Coordinate { lat, lng } = point;
    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let vi = ring[i];
        let vj = ring[j];

        if vi == point || vj == point {
            return Membership::OnBoundary;
        }

        if on_axis_aligned_edge(point, vi, vj) {
            return Membership::OnBoundary;
        }

        // Edges with vi.lat == vj.lat never pass the straddle check, so the
        // division below is never by zero.
        if (vi.lat > lat) != (vj.lat > lat) {
            let crossing_lng = (vj.lng - vi.lng) * (lat - vi.lat) / (vj.lat - vi.lat) + vi.lng;
            if lng < crossing_lng {
                inside = !inside;
            }
        }

        j = i;
    }

    if inside {
        Membership::Inside
    } else {
        Membership::Outside
    }
}

fn on_axis_aligned_edge(p: Coordinate, a: Coordinate, b: Coordinate) -> bool {
    let along_lat = a.lng == b.lng
        && a.lng == p.lng
        && p.lat > a.lat.min(b.lat)
        && p.lat < a.lat.max(b.lat);
    let along_lng = a.lat == b.lat
        && a.lat == p.lat
        && p.lng > a.lng.min(b.lng)
        && p.lng < a.lng.max(b.lng);
    along_lat || along_lng
}
