//! # Time normalization for the two instrument encodings
//!
//! Both archives timestamp their records relative to an instrument-specific
//! origin. This module converts either encoding into a single [`Epoch`] so
//! that records from both tracks live on one comparable timeline.
//!
//! All arithmetic is plain calendar arithmetic in a uniform scale
//! ([`TimeScale::TAI`], no leap-second table): an instant expressed in either
//! encoding normalizes to the same `Epoch` bit for bit, which the matcher's
//! temporal filter relies on.

use hifitime::{Duration, Epoch, TimeScale, Unit};

use crate::constants::{
    Hours, Seconds, NANOSECONDS_PER_SECOND, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};
use crate::overpass_errors::OverpassError;

/// Delimiter of the composite imager timestamp, `"<days> days <HH:MM:SS>"`.
const COMPOSITE_DELIMITER: &str = "days";

/// Origin of the profiling instrument's elapsed-seconds encoding.
pub fn profile_time_origin() -> Epoch {
    Epoch::from_gregorian(2018, 1, 1, 0, 0, 0, 0, TimeScale::TAI)
}

/// Origin of the imaging instrument's composite day-count encoding.
pub fn imager_time_origin() -> Epoch {
    Epoch::from_gregorian(1993, 1, 1, 0, 0, 0, 0, TimeScale::TAI)
}

/// Normalize a profile timestamp, fractional seconds since the 2018-01-01 origin.
///
/// Argument
/// --------
/// * `elapsed`: seconds elapsed since [`profile_time_origin`], may be fractional
///
/// Return
/// ------
/// * the absolute epoch of the record
pub fn profile_epoch_from_elapsed(elapsed: Seconds) -> Epoch {
    profile_time_origin() + duration_from_seconds_exact(elapsed)
}

/// Normalize a composite imager timestamp, `"<days> days <HH:MM:SS>"` since 1993-01-01.
///
/// The day count may be fractional; the clock fields are read as floats.
///
/// Argument
/// --------
/// * `text`: the composite string, e.g. `"100 days 12:30:00"`
///
/// Return
/// ------
/// * the absolute epoch of the record, or
///   [`OverpassError::MalformedTimestamp`] when the string does not split into
///   exactly two non-empty parts around the `days` delimiter or its clock part
///   does not hold exactly three numeric fields
pub fn imager_epoch_from_composite(text: &str) -> Result<Epoch, OverpassError> {
    let malformed = || OverpassError::MalformedTimestamp(text.to_string());

    let (day_part, clock_part) = text
        .split_once(COMPOSITE_DELIMITER)
        .ok_or_else(malformed)?;
    let day_part = day_part.trim();
    let clock_part = clock_part.trim();
    if day_part.is_empty() || clock_part.is_empty() || clock_part.contains(COMPOSITE_DELIMITER) {
        return Err(malformed());
    }

    let days: f64 = day_part.parse().map_err(|_| malformed())?;

    let mut clock = clock_part.splitn(4, ':');
    let mut next_field = || -> Result<f64, OverpassError> {
        clock
            .next()
            .ok_or_else(malformed)?
            .trim()
            .parse()
            .map_err(|_| malformed())
    };
    let hours: f64 = next_field()?;
    let minutes: f64 = next_field()?;
    let seconds: f64 = next_field()?;
    if clock.next().is_some() {
        return Err(malformed());
    }

    let offset = duration_from_seconds_exact(days * SECONDS_PER_DAY)
        + duration_from_seconds_exact(hours * SECONDS_PER_HOUR)
        + duration_from_seconds_exact(minutes * SECONDS_PER_MINUTE)
        + duration_from_seconds_exact(seconds);
    Ok(imager_time_origin() + offset)
}

/// Absolute separation between two epochs in fractional hours.
pub fn hours_between(a: Epoch, b: Epoch) -> Hours {
    (a - b).abs().to_unit(Unit::Hour)
}

/// Number of calendar days in `year` (365 or 366).
pub fn days_in_year(year: u16) -> u16 {
    let jan_first = Epoch::from_gregorian(year as i32, 1, 1, 0, 0, 0, 0, TimeScale::TAI);
    let next_jan = Epoch::from_gregorian(year as i32 + 1, 1, 1, 0, 0, 0, 0, TimeScale::TAI);
    (next_jan - jan_first).to_unit(Unit::Day).round() as u16
}

/// Render an epoch as a plain ISO calendar string for artifact rows.
pub fn epoch_to_iso(epoch: Epoch) -> String {
    let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_tai();
    if nanos == 0 {
        format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}")
    } else {
        let millis = nanos / 1_000_000;
        format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.{millis:03}")
    }
}

/// Exact duration from fractional seconds.
///
/// The whole-second part goes through integer nanoseconds so integral inputs
/// never pick up floating-point slack; the fractional part is rounded to the
/// nearest nanosecond.
fn duration_from_seconds_exact(seconds: f64) -> Duration {
    let whole = seconds.trunc();
    let frac = seconds - whole;
    let nanos =
        (whole as i128) * NANOSECONDS_PER_SECOND + (frac * 1.0e9).round() as i128;
    Duration::from_total_nanoseconds(nanos)
}
