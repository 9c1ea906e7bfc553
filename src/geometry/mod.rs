pub mod membership;
pub mod polygon;
pub mod resolver;

pub use membership::{Membership, contains, membership, ring_membership};
pub use polygon::{Bounds, Polygon, PolygonError};
pub use resolver::find_containing_area;
