//! Static area dataset: area name -> polygon ring
//!
//! Loaded once at startup from a JSON array of
//! `{ "name": "...", "coordinates": [[lat, lng], ...] }` records and kept
//! read-only for the life of the process. Every structural problem is
//! reported at load time as a [`DatasetError`].

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::Coordinate;
use crate::geometry::{Bounds, Polygon, PolygonError, find_containing_area};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read area dataset {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse area dataset")]
    Parse(#[from] serde_json::Error),
    #[error("area {name:?} has {count} vertices, at least 3 are required")]
    TooFewVertices { name: String, count: usize },
    #[error("area {name:?} has a non-finite coordinate")]
    NonFiniteCoordinate { name: String },
    #[error("area {0:?} is defined more than once")]
    DuplicateName(String),
}

/// One record of the dataset file
#[derive(Debug, Deserialize)]
struct AreaRecord {
    name: String,
    coordinates: Vec<Coordinate>,
}

/// Ordered, name-indexed collection of area polygons
#[derive(Debug, Clone, Default)]
pub struct AreaDataset {
    areas: Vec<(String, Polygon)>,
    index: HashMap<String, usize>,
}

impl AreaDataset {
    /// Build a dataset from (name, ring) pairs, keeping their order
    pub fn from_rings<I, S>(rings: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = (S, Vec<Coordinate>)>,
        S: Into<String>,
    {
        let mut dataset = Self::default();

        for (name, ring) in rings {
            let name = name.into();

            if ring.iter().any(|c| !c.is_finite()) {
                return Err(DatasetError::NonFiniteCoordinate { name });
            }

            let polygon = Polygon::new(ring).map_err(|PolygonError::TooFewVertices(count)| {
                DatasetError::TooFewVertices {
                    name: name.clone(),
                    count,
                }
            })?;

            if dataset.index.contains_key(&name) {
                return Err(DatasetError::DuplicateName(name));
            }

            dataset.index.insert(name.clone(), dataset.areas.len());
            dataset.areas.push((name, polygon));
        }

        Ok(dataset)
    }

    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let records: Vec<AreaRecord> = serde_json::from_str(json)?;
        Self::from_rings(records.into_iter().map(|r| (r.name, r.coordinates)))
    }

    /// Load and validate a dataset file
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json_str(&contents)?;

        tracing::debug!(
            path = %path.display(),
            areas = dataset.len(),
            "loaded area dataset"
        );

        Ok(dataset)
    }

    /// Polygon for an exact area name
    pub fn polygon(&self, name: &str) -> Option<&Polygon> {
        self.index.get(name).map(|&i| &self.areas[i].1)
    }

    pub fn contains_area(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Areas in dataset order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Polygon)> {
        self.areas.iter().map(|(name, polygon)| (name.as_str(), polygon))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.areas.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// First area, in dataset order, containing `point`
    pub fn find_containing(&self, point: Coordinate) -> Option<&str> {
        find_containing_area(point, self.iter())
    }

    /// Bounding box over every area
    pub fn bounds(&self) -> Option<Bounds> {
        self.areas
            .iter()
            .map(|(_, polygon)| polygon.bounds())
            .reduce(|acc, b| acc.union(&b))
    }
}
