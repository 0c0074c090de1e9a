//! # Colocation matching
//!
//! Nearest-neighbor matching of profile records against imager records in
//! planar degree space, under a spatial threshold and an optional temporal
//! threshold.
//!
//! ## Overview
//! -----------------
//! - [`ColocParams`] — matcher thresholds, validated through
//!   [`ColocParamsBuilder`].
//! - [`colocate_tracks`](matcher::colocate_tracks) — the matching routine.
//! - [`ColocationPair`](colocation_result::ColocationPair) — one emitted match.
//! - [`KdTree2`](kdtree::KdTree2) — the 2-d index behind the nearest queries.
//!
//! ## Example
//! -----------------
//! ```rust
//! use overpass::colocation::ColocParams;
//!
//! let params = ColocParams::builder()
//!     .max_distance_deg(0.04)
//!     .max_time_offset_hours(3.0)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.max_distance_deg, 0.04);
//! ```

use std::cmp::Ordering::Greater;

use crate::constants::{Degree, Hours, DEFAULT_MAX_DISTANCE_DEG, DEFAULT_MAX_TIME_OFFSET_HOURS};
use crate::overpass_errors::OverpassError;

pub mod colocation_result;
pub mod kdtree;
pub mod matcher;

pub use colocation_result::{ColocationPair, ARTIFACT_HEADER};
pub use matcher::colocate_tracks;

/// Matcher thresholds.
///
/// Fields are public for read access; construct through
/// [`ColocParams::builder`] so the validation rules run. The matching routine
/// re-validates before use, so a hand-built value cannot smuggle in a bad
/// threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ColocParams {
    /// Maximum planar distance between the two records of a pair, degrees.
    pub max_distance_deg: Degree,
    /// Maximum temporal separation of a pair, fractional hours. `None`
    /// disables the temporal filter entirely.
    pub max_time_offset_hours: Option<Hours>,
}

impl Default for ColocParams {
    fn default() -> Self {
        ColocParams {
            max_distance_deg: DEFAULT_MAX_DISTANCE_DEG,
            max_time_offset_hours: Some(DEFAULT_MAX_TIME_OFFSET_HOURS),
        }
    }
}

impl ColocParams {
    pub fn builder() -> ColocParamsBuilder {
        ColocParamsBuilder::new()
    }

    /// Check the thresholds, rejecting non-finite or non-positive distances
    /// and negative or NaN temporal bounds.
    pub fn validate(&self) -> Result<(), OverpassError> {
        if !Self::gt0(self.max_distance_deg) || !self.max_distance_deg.is_finite() {
            return Err(OverpassError::InvalidThreshold(format!(
                "max_distance_deg must be strictly positive and finite, got {}",
                self.max_distance_deg
            )));
        }
        if let Some(bound) = self.max_time_offset_hours {
            if !Self::ge0(bound) {
                return Err(OverpassError::InvalidThreshold(format!(
                    "max_time_offset_hours must be non-negative, got {bound}"
                )));
            }
        }
        Ok(())
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(
            x.partial_cmp(&0.0),
            Some(Greater) | Some(std::cmp::Ordering::Equal)
        )
    }
}

/// Builder for [`ColocParams`], starting from the run defaults.
#[derive(Debug, Clone)]
pub struct ColocParamsBuilder {
    params: ColocParams,
}

impl Default for ColocParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ColocParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: ColocParams::default(),
        }
    }

    pub fn max_distance_deg(mut self, v: Degree) -> Self {
        self.params.max_distance_deg = v;
        self
    }

    pub fn max_time_offset_hours(mut self, v: Hours) -> Self {
        self.params.max_time_offset_hours = Some(v);
        self
    }

    /// Disable the temporal filter.
    pub fn no_time_filter(mut self) -> Self {
        self.params.max_time_offset_hours = None;
        self
    }

    /// Finalize the builder.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(ColocParams)` when all thresholds pass [`ColocParams::validate`].
    /// * `Err(OverpassError::InvalidThreshold)` otherwise.
    pub fn build(self) -> Result<ColocParams, OverpassError> {
        self.params.validate()?;
        Ok(self.params)
    }
}
