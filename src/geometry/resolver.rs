use super::{Polygon, contains};
use crate::domain::Coordinate;

/// Find the first area whose polygon contains `point`
///
/// Areas are tried in the order given; overlapping polygons resolve to the
/// earliest one. Callers choose precedence (and any filtering, e.g. only
/// unclaimed areas) through the sequence they pass in.
pub fn find_containing_area<'a, I, S>(point: Coordinate, areas: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a S, &'a Polygon)>,
    S: AsRef<str> + ?Sized + 'a,
{
    areas
        .into_iter()
        .find(|(_, polygon)| contains(point, polygon))
        .map(|(name, _)| name.as_ref())
}
