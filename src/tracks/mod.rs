//! # Normalized track records and loader adapters
//!
//! One record type covers both instruments once their native encodings have
//! been normalized: a position in planar degree space plus an absolute epoch
//! (see [`crate::time`]) and a compact id of the originating archive file.
//!
//! ## Overview
//! -----------------
//! - [`TrackRecord`] — one normalized sample (longitude, latitude, epoch, source).
//! - [`InstrumentKind`] — tag attached to every catalog entry at enumeration
//!   time; all decode dispatch goes through it.
//! - [`TrackFile`](track_file::TrackFile) — ingestion seam implemented for
//!   [`TrackTable`](crate::constants::TrackTable) with `new_from_*` / `add_from_*`
//!   pairs per source format.
//! - [`TrackDecoder`](decoder::TrackDecoder) — object-safe adapter interface
//!   the pipeline selects by [`InstrumentKind`].
//!
//! ## Error semantics
//! -----------------
//! Readers fail a whole file on the first bad row ([`ParseTrackError`] carries
//! the row context); the pipeline logs the failure and drops that file's
//! contribution without aborting the run.

use hifitime::Epoch;
use nalgebra::Vector2;
use thiserror::Error;

use crate::constants::Degree;

pub mod decoder;
pub mod imager_reader;
pub mod profile_reader;
pub mod track_file;

pub use decoder::{ImagerDecoder, ProfileDecoder, TrackDecoder};
pub use track_file::TrackFile;

/// Instrument family of an archive file, fixed at catalog enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentKind {
    /// High-rate profiling instrument (elapsed-seconds timestamps).
    Profile,
    /// Coarser imaging instrument (composite day-count timestamps).
    Imager,
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstrumentKind::Profile => write!(f, "profile"),
            InstrumentKind::Imager => write!(f, "imager"),
        }
    }
}

/// One normalized sample from either instrument.
///
/// Positions stay in raw instrument degrees; distances between records are
/// planar Euclidean distances in that space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackRecord {
    /// Longitude in degrees, as read from the instrument file
    pub longitude: Degree,
    /// Latitude in degrees, as read from the instrument file
    pub latitude: Degree,
    /// Absolute epoch of the sample
    pub epoch: Epoch,
    /// Compact id of the originating archive file, resolved through
    /// [`Overpass::source_from_uint16`](crate::overpass::Overpass::source_from_uint16)
    pub source: u16,
}

impl TrackRecord {
    pub fn new(longitude: Degree, latitude: Degree, epoch: Epoch, source: u16) -> Self {
        Self {
            longitude,
            latitude,
            epoch,
            source,
        }
    }

    /// Position of the record as a `(longitude, latitude)` vector.
    pub fn point(&self) -> Vector2<f64> {
        Vector2::new(self.longitude, self.latitude)
    }
}

/// Row-level failure while decoding a track file.
///
/// Wrapped into [`OverpassError::DecodeFailure`](crate::overpass_errors::OverpassError::DecodeFailure)
/// together with the file path by the [`TrackFile`] methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTrackError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("row {row}: invalid numeric value in column {column}")]
    InvalidNumber { column: String, row: usize },

    #[error("row {row}: malformed composite timestamp: {text:?}")]
    MalformedTimestamp { text: String, row: usize },

    #[error("row {row}: expected {expected} fields, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unable to read file: {0}")]
    Read(String),
}
