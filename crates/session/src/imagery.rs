use foundation::GeoBounds;
use serde::{Deserialize, Serialize};

/// Persisted record of an imagery overlay added by URL.
///
/// Closed set, like [`layers::LayerKind`]: the loader accepts RGB
/// orthomosaic COGs today, and a new source kind is a new variant here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ImageryRecord {
    RgbCog {
        id: String,
        source_url: String,
        bounds: GeoBounds,
    },
}

impl ImageryRecord {
    /// An RGB COG record. The source URL doubles as the record id.
    pub fn rgb_cog(url: impl Into<String>, bounds: GeoBounds) -> Self {
        let url = url.into();
        Self::RgbCog { id: url.clone(), source_url: url, bounds }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::RgbCog { id, .. } => id,
        }
    }

    pub fn source_url(&self) -> &str {
        match self {
            Self::RgbCog { source_url, .. } => source_url,
        }
    }

    pub fn bounds(&self) -> GeoBounds {
        match self {
            Self::RgbCog { bounds, .. } => *bounds,
        }
    }
}

/// The imagery records of one session, persisted as a bare array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagerySet {
    records: Vec<ImageryRecord>,
}

impl ImagerySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `record` unless its id is already present; an existing record
    /// is kept as-is. Returns `true` if the set changed.
    pub fn add(&mut self, record: ImageryRecord) -> bool {
        if self.contains(record.id()) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Returns `true` if the set changed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id() != id);
        self.records.len() != before
    }

    /// Returns `true` if the set changed.
    pub fn clear(&mut self) -> bool {
        let was_empty = self.records.is_empty();
        self.records.clear();
        !was_empty
    }

    pub fn get(&self, id: &str) -> Option<&ImageryRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn records(&self) -> &[ImageryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
