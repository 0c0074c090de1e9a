//! # Constants and type definitions for Overpass
//!
//! This module centralizes the **thresholds**, **conversion factors**, and **common type
//! definitions** used throughout the `Overpass` library. It also defines the container
//! aliases for normalized track records and per-day catalog entries.
//!
//! ## Overview
//!
//! - Run-configuration defaults (spatial/temporal thresholds, window length, years)
//! - Unit conversions (days ↔ seconds, hours ↔ seconds)
//! - Core type aliases used across the crate
//! - Fast hash containers keyed with `ahash`
//!
//! These definitions are used by all main modules, including the loader adapters,
//! the colocation matcher, and the windowed pipeline.

use std::collections::{HashMap, HashSet};

use ahash::RandomState;
use smallvec::SmallVec;

use crate::catalog::CatalogEntry;
use crate::tracks::TrackRecord;

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a calendar day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of seconds in an hour
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Number of seconds in a minute
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Number of nanoseconds in a second
pub const NANOSECONDS_PER_SECOND: i128 = 1_000_000_000;

// -------------------------------------------------------------------------------------------------
// Run-configuration defaults
// -------------------------------------------------------------------------------------------------

/// Default spatial threshold for a colocation pair, planar degrees
pub const DEFAULT_MAX_DISTANCE_DEG: f64 = 0.04;

/// Default temporal threshold for a colocation pair, fractional hours
pub const DEFAULT_MAX_TIME_OFFSET_HOURS: f64 = 3.0;

/// Default number of days accumulated before a window is matched and flushed
pub const DEFAULT_WINDOW_SIZE_DAYS: usize = 2;

/// Default archive years processed when none are requested
pub const DEFAULT_YEARS: [u16; 2] = [2019, 2020];

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Duration in fractional hours
pub type Hours = f64;
/// Duration in fractional seconds
pub type Seconds = f64;

/// Hash map keyed with the `ahash` fast hasher
pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

/// Hash set keyed with the `ahash` fast hasher
pub type FastHashSet<V> = HashSet<V, RandomState>;

// -------------------------------------------------------------------------------------------------
// Data containers
// -------------------------------------------------------------------------------------------------

/// Ordered collection of normalized records for one instrument.
///
/// Appending preserves insertion order; a window's tables are the day-ordered
/// concatenation of its per-file tables.
pub type TrackTable = Vec<TrackRecord>;

/// A small, inline-optimized container for one day's catalog entries.
pub type DayEntries = SmallVec<[CatalogEntry; 4]>;
