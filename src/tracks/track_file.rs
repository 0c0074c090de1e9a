//! # Track ingestion seam
//!
//! High-level utilities to **build and extend** a
//! [`TrackTable`](crate::constants::TrackTable) from either instrument format.
//!
//! ## Overview
//! -----------------
//! This module exposes the [`TrackFile`] trait implemented for `TrackTable`.
//! It provides:
//! - Constructors that **create** a new table from a given source (`new_from_*`),
//! - Appenders that **extend** an existing table (`add_from_*`).
//!
//! Internally, ingestion delegates to the crate-private readers
//! [`extract_profile`](crate::tracks::profile_reader::extract_profile) and
//! [`extract_imager`](crate::tracks::imager_reader::extract_imager).
//!
//! ## Duplicates & ordering
//! -----------------
//! - **No deduplication** is performed by any `add_*` method; re-ingesting the
//!   same file duplicates its records.
//! - Records are stored in file order; ordering by time is not enforced here.
//!
//! ## Error semantics
//! -----------------
//! All methods fail with
//! [`OverpassError::DecodeFailure`](crate::overpass_errors::OverpassError::DecodeFailure)
//! carrying the file path and the row-level
//! [`ParseTrackError`](crate::tracks::ParseTrackError). On failure the table is
//! left untouched (the partially decoded prefix is discarded).

use camino::Utf8Path;

use super::imager_reader::extract_imager;
use super::profile_reader::extract_profile;
use crate::constants::{FastHashSet, TrackTable};
use crate::overpass_errors::OverpassError;
use crate::tracks::ParseTrackError;

/// Ingestion surface of [`TrackTable`], one `new_from_*` / `add_from_*` pair
/// per instrument format.
pub trait TrackFile {
    /// Create a table from one profile file.
    ///
    /// Arguments
    /// ---------
    /// * `path`: path to a delimited profile file (`latitude`, `longitude`,
    ///   `delta_time` columns)
    /// * `source`: compact id stamped on every decoded record
    ///
    /// Return
    /// ------
    /// * a new table holding the file's records in file order
    fn new_from_profile(path: &Utf8Path, source: u16) -> Result<Self, OverpassError>
    where
        Self: Sized;

    /// Append one profile file to an existing table.
    ///
    /// On failure the table keeps exactly its previous content.
    fn add_from_profile(&mut self, path: &Utf8Path, source: u16) -> Result<(), OverpassError>;

    /// Create a table from one imager file.
    ///
    /// Arguments
    /// ---------
    /// * `path`: path to a delimited imager file (`Latitude`, `Longitude`,
    ///   `Profile_Time` among arbitrary science columns)
    /// * `excluded`: column names dropped from the header projection, see
    ///   [`default_excluded_fields`](crate::tracks::imager_reader::default_excluded_fields)
    /// * `source`: compact id stamped on every decoded record
    fn new_from_imager(
        path: &Utf8Path,
        excluded: &FastHashSet<String>,
        source: u16,
    ) -> Result<Self, OverpassError>
    where
        Self: Sized;

    /// Append one imager file to an existing table.
    ///
    /// On failure the table keeps exactly its previous content.
    fn add_from_imager(
        &mut self,
        path: &Utf8Path,
        excluded: &FastHashSet<String>,
        source: u16,
    ) -> Result<(), OverpassError>;
}

fn decode_failure(path: &Utf8Path, detail: ParseTrackError) -> OverpassError {
    OverpassError::DecodeFailure {
        path: path.to_string(),
        detail,
    }
}

impl TrackFile for TrackTable {
    fn new_from_profile(path: &Utf8Path, source: u16) -> Result<Self, OverpassError> {
        let mut table = TrackTable::new();
        extract_profile(path, source, &mut table).map_err(|e| decode_failure(path, e))?;
        Ok(table)
    }

    fn add_from_profile(&mut self, path: &Utf8Path, source: u16) -> Result<(), OverpassError> {
        let before = self.len();
        if let Err(e) = extract_profile(path, source, self) {
            self.truncate(before);
            return Err(decode_failure(path, e));
        }
        Ok(())
    }

    fn new_from_imager(
        path: &Utf8Path,
        excluded: &FastHashSet<String>,
        source: u16,
    ) -> Result<Self, OverpassError> {
        let mut table = TrackTable::new();
        extract_imager(path, excluded, source, &mut table).map_err(|e| decode_failure(path, e))?;
        Ok(table)
    }

    fn add_from_imager(
        &mut self,
        path: &Utf8Path,
        excluded: &FastHashSet<String>,
        source: u16,
    ) -> Result<(), OverpassError> {
        let before = self.len();
        if let Err(e) = extract_imager(path, excluded, source, self) {
            self.truncate(before);
            return Err(decode_failure(path, e));
        }
        Ok(())
    }
}
