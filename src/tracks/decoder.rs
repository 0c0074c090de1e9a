//! # Decode adapters for the worker pool
//!
//! Object-safe wrappers over the [`TrackFile`] ingestion seam. The pipeline
//! selects the adapter by the [`InstrumentKind`] tag a catalog entry carries;
//! decode tasks run on worker threads, so adapters are plain shared data.

use camino::Utf8Path;

use crate::constants::{FastHashSet, TrackTable};
use crate::overpass_errors::OverpassError;
use crate::tracks::imager_reader::default_excluded_fields;
use crate::tracks::{InstrumentKind, TrackFile};

/// One instrument's file decoder, dispatched by kind tag.
pub trait TrackDecoder: Send + Sync {
    /// Instrument family this adapter decodes.
    fn kind(&self) -> InstrumentKind;

    /// Decode one file into a fresh table, every record stamped with `source`.
    fn decode(&self, path: &Utf8Path, source: u16) -> Result<TrackTable, OverpassError>;
}

/// Adapter for profile files.
#[derive(Debug, Default, Clone)]
pub struct ProfileDecoder;

impl TrackDecoder for ProfileDecoder {
    fn kind(&self) -> InstrumentKind {
        InstrumentKind::Profile
    }

    fn decode(&self, path: &Utf8Path, source: u16) -> Result<TrackTable, OverpassError> {
        TrackTable::new_from_profile(path, source)
    }
}

/// Adapter for imager files, configured with its column exclusion set.
#[derive(Debug, Clone)]
pub struct ImagerDecoder {
    excluded: FastHashSet<String>,
}

impl ImagerDecoder {
    pub fn new(excluded: FastHashSet<String>) -> Self {
        Self { excluded }
    }

    /// The exclusion set this adapter projects headers through.
    pub fn excluded_fields(&self) -> &FastHashSet<String> {
        &self.excluded
    }
}

impl Default for ImagerDecoder {
    fn default() -> Self {
        Self::new(default_excluded_fields())
    }
}

impl TrackDecoder for ImagerDecoder {
    fn kind(&self) -> InstrumentKind {
        InstrumentKind::Imager
    }

    fn decode(&self, path: &Utf8Path, source: u16) -> Result<TrackTable, OverpassError> {
        TrackTable::new_from_imager(path, &self.excluded, source)
    }
}
