//! # Colocation pair
//!
//! One emitted match between a profile record and its nearest imager record,
//! with the derived planar distance and temporal offset. Artifact rows carry
//! every attribute of both records; the interned source ids resolve back to
//! file paths through the shared [`Overpass`] state.

use crate::constants::{Degree, Hours};
use crate::overpass::Overpass;
use crate::time::epoch_to_iso;
use crate::tracks::TrackRecord;

/// Column order of one artifact row.
pub const ARTIFACT_HEADER: [&str; 10] = [
    "profile_lat",
    "profile_lon",
    "profile_time",
    "profile_source",
    "imager_lat",
    "imager_lon",
    "imager_time",
    "imager_source",
    "distance_deg",
    "time_offset_hours",
];

/// A matched (profile, imager) record pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColocationPair {
    pub profile: TrackRecord,
    pub imager: TrackRecord,
    /// Planar Euclidean distance between the two records, degrees.
    pub distance_deg: Degree,
    /// Absolute temporal separation of the two records, fractional hours.
    pub time_offset_hours: Hours,
}

impl ColocationPair {
    pub fn new(
        profile: TrackRecord,
        imager: TrackRecord,
        distance_deg: Degree,
        time_offset_hours: Hours,
    ) -> Self {
        Self {
            profile,
            imager,
            distance_deg,
            time_offset_hours,
        }
    }

    /// Render the pair as one artifact row, columns per [`ARTIFACT_HEADER`].
    pub fn artifact_row(&self, state: &Overpass) -> [String; 10] {
        [
            self.profile.latitude.to_string(),
            self.profile.longitude.to_string(),
            epoch_to_iso(self.profile.epoch),
            state.source_from_uint16(self.profile.source).to_string(),
            self.imager.latitude.to_string(),
            self.imager.longitude.to_string(),
            epoch_to_iso(self.imager.epoch),
            state.source_from_uint16(self.imager.source).to_string(),
            self.distance_deg.to_string(),
            self.time_offset_hours.to_string(),
        ]
    }
}
