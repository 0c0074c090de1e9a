//! # Archive file catalog
//!
//! Before any decoding starts, both archive roots are walked recursively and
//! every instrument file is tagged with its [`InstrumentKind`], its calendar
//! position derived from **fixed basename character offsets**, and a compact
//! source id interned into the shared [`Overpass`] state. The pipeline then
//! resolves one day at a time against the `(year, day_of_year)` key.
//!
//! ## Naming conventions
//! -----------------
//! - Profile: `ATL04_YYYYMMDDHHMMSS_...` — date at bytes `6..14` of the
//!   basename.
//! - Imager: `CAL_LID_L2_05kmAPro-Standard-V4-20.YYYY-MM-DDT...` — date at
//!   bytes `35..45` of the basename.
//!
//! Zero-padded and bare day-of-year spellings collapse to the same numeric
//! key here, so a day's file set is the union of both. Files that do not
//! match their root's naming convention are skipped and counted, never fatal.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use hifitime::{Epoch, TimeScale, Unit};
use tracing::{debug, info, warn};

use crate::constants::{DayEntries, FastHashMap};
use crate::overpass::Overpass;
use crate::overpass_errors::OverpassError;
use crate::tracks::InstrumentKind;

/// Basename prefix of profile files.
pub(crate) const PROFILE_PREFIX: &str = "ATL";
/// Basename prefix of imager files.
pub(crate) const IMAGER_PREFIX: &str = "CAL_LID";

/// One archive file with its enumeration-time metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub path: Utf8PathBuf,
    pub kind: InstrumentKind,
    pub year: u16,
    /// 1-based day of year derived from the basename date
    pub day_of_year: u16,
    /// Compact id of the file in the shared source registry
    pub source: u16,
}

/// All recognized archive files keyed by `(year, day_of_year)`.
#[derive(Debug, Default)]
pub struct FileCatalog {
    by_day: FastHashMap<(u16, u16), DayEntries>,
    recognized: usize,
    unrecognized: usize,
    malformed: usize,
    outside_years: usize,
}

impl FileCatalog {
    /// Walk both archive roots and build the catalog for the requested years.
    ///
    /// Arguments
    /// ---------
    /// * `state`: shared state receiving the interned source ids
    /// * `profile_root`: root directory of the profiling instrument's archive
    /// * `imager_root`: root directory of the imaging instrument's archive
    /// * `years`: calendar years retained in the catalog
    ///
    /// Return
    /// ------
    /// * the catalog, or an I/O error when a root cannot be walked
    pub fn enumerate(
        state: &mut Overpass,
        profile_root: &Utf8Path,
        imager_root: &Utf8Path,
        years: &[u16],
    ) -> Result<Self, OverpassError> {
        let mut catalog = FileCatalog::default();
        catalog.walk_root(state, profile_root, InstrumentKind::Profile, years)?;
        catalog.walk_root(state, imager_root, InstrumentKind::Imager, years)?;

        for entries in catalog.by_day.values_mut() {
            entries.sort_by(|a, b| a.path.cmp(&b.path));
        }

        info!(
            recognized = catalog.recognized,
            unrecognized = catalog.unrecognized,
            malformed = catalog.malformed,
            outside_years = catalog.outside_years,
            "archive catalog built"
        );
        Ok(catalog)
    }

    /// The day's files, in a stable path order. Empty when the day has none.
    pub fn entries_for(&self, year: u16, day_of_year: u16) -> &[CatalogEntry] {
        self.by_day
            .get(&(year, day_of_year))
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
    }

    /// Number of files retained in the catalog.
    pub fn len(&self) -> usize {
        self.recognized
    }

    pub fn is_empty(&self) -> bool {
        self.recognized == 0
    }

    /// Files whose basename matched no naming convention.
    pub fn unrecognized(&self) -> usize {
        self.unrecognized
    }

    /// Files whose basename matched a convention but carried no valid date.
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Files dated outside the requested years.
    pub fn outside_years(&self) -> usize {
        self.outside_years
    }

    fn walk_root(
        &mut self,
        state: &mut Overpass,
        root: &Utf8Path,
        kind: InstrumentKind,
        years: &[u16],
    ) -> Result<(), OverpassError> {
        let mut files = Vec::new();
        collect_files(root.as_std_path(), &mut files)?;

        for path in files {
            let Some(path) = Utf8PathBuf::from_path_buf(path).ok() else {
                self.unrecognized += 1;
                continue;
            };
            let name = path.file_name().unwrap_or_default();

            let expected_prefix = match kind {
                InstrumentKind::Profile => PROFILE_PREFIX,
                InstrumentKind::Imager => IMAGER_PREFIX,
            };
            if !name.starts_with(expected_prefix) {
                debug!(%path, %kind, "file skipped, not an instrument file");
                self.unrecognized += 1;
                continue;
            }

            let parsed = match kind {
                InstrumentKind::Profile => parse_profile_name(name),
                InstrumentKind::Imager => parse_imager_name(name),
            };
            let (year, day_of_year) = match parsed {
                Ok(date) => date,
                Err(e) => {
                    warn!(%path, error = %e, "file skipped, malformed name");
                    self.malformed += 1;
                    continue;
                }
            };

            if !years.contains(&year) {
                self.outside_years += 1;
                continue;
            }

            let source = state.uint16_from_source(&path);
            self.recognized += 1;
            self.by_day
                .entry((year, day_of_year))
                .or_default()
                .push(CatalogEntry {
                    path,
                    kind,
                    year,
                    day_of_year,
                    source,
                });
        }
        Ok(())
    }
}

/// Depth-first walk collecting every plain file under `dir`.
fn collect_files(dir: &std::path::Path, files: &mut Vec<std::path::PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

/// Date of a profile basename, `ATL04_YYYYMMDDHHMMSS_...`.
fn parse_profile_name(name: &str) -> Result<(u16, u16), OverpassError> {
    let year = slice_number::<u16>(name, 6, 10)?;
    let month = slice_number::<u8>(name, 10, 12)?;
    let day = slice_number::<u8>(name, 12, 14)?;
    Ok((year, day_of_year(name, year, month, day)?))
}

/// Date of an imager basename, `CAL_LID_...-V4-20.YYYY-MM-DDT...`.
fn parse_imager_name(name: &str) -> Result<(u16, u16), OverpassError> {
    let year = slice_number::<u16>(name, 35, 39)?;
    let month = slice_number::<u8>(name, 40, 42)?;
    let day = slice_number::<u8>(name, 43, 45)?;
    Ok((year, day_of_year(name, year, month, day)?))
}

fn slice_number<T: std::str::FromStr>(
    name: &str,
    start: usize,
    end: usize,
) -> Result<T, OverpassError> {
    name.get(start..end)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| OverpassError::MalformedFilename(name.to_string()))
}

/// 1-based day of year, rejecting calendar-invalid dates.
fn day_of_year(name: &str, year: u16, month: u8, day: u8) -> Result<u16, OverpassError> {
    let date = Epoch::maybe_from_gregorian(
        year as i32,
        month,
        day,
        0,
        0,
        0,
        0,
        TimeScale::TAI,
    )
    .map_err(|_| OverpassError::MalformedFilename(name.to_string()))?;
    let jan_first = Epoch::from_gregorian(year as i32, 1, 1, 0, 0, 0, 0, TimeScale::TAI);
    Ok((date - jan_first).to_unit(Unit::Day).round() as u16 + 1)
}

#[cfg(test)]
mod catalog_test {
    use super::*;

    #[test]
    fn test_parse_profile_name() {
        let (year, doy) = parse_profile_name("ATL04_20190107133519_01550205_006_01.csv").unwrap();
        assert_eq!(year, 2019);
        assert_eq!(doy, 7);

        // 2020 is a leap year, Mar 1 is day 61.
        let (year, doy) = parse_profile_name("ATL04_20200301000000_01550205_006_01.csv").unwrap();
        assert_eq!(year, 2020);
        assert_eq!(doy, 61);
    }

    #[test]
    fn test_parse_imager_name() {
        let (year, doy) =
            parse_imager_name("CAL_LID_L2_05kmAPro-Standard-V4-20.2019-01-07T22-10-15ZN.csv")
                .unwrap();
        assert_eq!(year, 2019);
        assert_eq!(doy, 7);
    }

    #[test]
    fn test_malformed_names() {
        assert!(parse_profile_name("ATL04_2019xx07133519_x.csv").is_err());
        assert!(parse_profile_name("ATL04_2019").is_err());
        // Calendar-invalid date.
        assert!(parse_profile_name("ATL04_20190231000000_x.csv").is_err());
        assert!(
            parse_imager_name("CAL_LID_L2_05kmAPro-Standard-V4-20.zz19-01-07T22-10-15ZN.csv")
                .is_err()
        );
    }

    #[test]
    fn test_day_of_year_boundaries() {
        let (_, doy) = parse_profile_name("ATL04_20190101000000_x.csv").unwrap();
        assert_eq!(doy, 1);
        let (_, doy) = parse_profile_name("ATL04_20191231000000_x.csv").unwrap();
        assert_eq!(doy, 365);
        let (_, doy) = parse_profile_name("ATL04_20201231000000_x.csv").unwrap();
        assert_eq!(doy, 366);
    }
}
