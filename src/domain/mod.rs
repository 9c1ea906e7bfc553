pub mod area;
pub mod coordinate;
pub mod team;

pub use area::{AreaState, ClaimStatus};
pub use coordinate::Coordinate;
pub use team::{Position, Team};
