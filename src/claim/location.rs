use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::Coordinate;

/// Source of the most recent location fix
pub trait LocationProvider {
    /// Latest fix, or `None` until the first one arrives
    fn latest(&self) -> Option<Coordinate>;
}

impl<T: LocationProvider + ?Sized> LocationProvider for &T {
    fn latest(&self) -> Option<Coordinate> {
        (**self).latest()
    }
}

impl<T: LocationProvider + ?Sized> LocationProvider for Arc<T> {
    fn latest(&self) -> Option<Coordinate> {
        (**self).latest()
    }
}

/// A location that never changes
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coordinate>);

impl LocationProvider for FixedLocation {
    fn latest(&self) -> Option<Coordinate> {
        self.0
    }
}

/// Shared slot overwritten by a periodic location producer
///
/// Each update replaces the previous fix; no history is kept.
#[derive(Debug, Default)]
pub struct LatestFix {
    fix: RwLock<Option<Coordinate>>,
}

impl LatestFix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, fix: Coordinate) {
        *self.fix.write().unwrap_or_else(PoisonError::into_inner) = Some(fix);
    }

    pub fn clear(&self) {
        *self.fix.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl LocationProvider for LatestFix {
    fn latest(&self) -> Option<Coordinate> {
        *self.fix.read().unwrap_or_else(PoisonError::into_inner)
    }
}
