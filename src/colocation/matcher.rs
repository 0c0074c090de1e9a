//! # Nearest-neighbor colocation
//!
//! The matching routine behind every flushed window: each profile record
//! queries a kd-tree over the window's imager records, the nearest neighbor
//! passes the spatial threshold, then the optional temporal filter, and
//! survivors come out as [`ColocationPair`]s in profile order.
//!
//! ## Contract
//! -----------------
//! - Distances are planar Euclidean distances in degree space.
//! - Nearest-neighbor ties resolve to the lowest imager index, so the output
//!   does not depend on how the imager table happened to be ordered on disk
//!   beyond that index order.
//! - With a temporal bound configured, a pair survives only when the two
//!   epochs are **identical** and their separation is within the bound.
//! - Empty inputs yield an empty result, never an error.

use tracing::debug;

use super::colocation_result::ColocationPair;
use super::kdtree::KdTree2;
use super::ColocParams;
use crate::overpass_errors::OverpassError;
use crate::time::hours_between;
use crate::tracks::TrackRecord;

/// Match every profile record against its nearest imager record.
///
/// Arguments
/// ---------
/// * `profile`: the window's profile records
/// * `imager`: the window's imager records
/// * `params`: thresholds, re-validated here
///
/// Return
/// ------
/// * the surviving pairs in profile order, or
///   [`OverpassError::InvalidThreshold`] when `params` fails validation
///
/// Note
/// ----
/// * One pair at most is emitted per profile record; an imager record may
///   appear in several pairs.
pub fn colocate_tracks(
    profile: &[TrackRecord],
    imager: &[TrackRecord],
    params: &ColocParams,
) -> Result<Vec<ColocationPair>, OverpassError> {
    params.validate()?;

    if profile.is_empty() || imager.is_empty() {
        debug!(
            profile = profile.len(),
            imager = imager.len(),
            "empty input, nothing to match"
        );
        return Ok(Vec::new());
    }

    let points: Vec<_> = imager.iter().map(|r| r.point()).collect();
    let tree = KdTree2::build(&points);

    let mut pairs = Vec::new();
    for record in profile {
        let Some((index, distance)) = tree.nearest(&record.point()) else {
            continue;
        };
        // NaN coordinates produce a NaN distance, rejected here.
        if !(distance <= params.max_distance_deg) {
            continue;
        }
        let candidate = &imager[index as usize];

        let offset = hours_between(record.epoch, candidate.epoch);
        if let Some(bound) = params.max_time_offset_hours {
            // Both conditions hold for a surviving pair: identical epochs
            // and an offset within the bound.
            if record.epoch != candidate.epoch || offset > bound {
                continue;
            }
        }

        pairs.push(ColocationPair::new(*record, *candidate, distance, offset));
    }
    Ok(pairs)
}
