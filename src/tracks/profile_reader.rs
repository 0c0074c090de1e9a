//! # Profile track reader
//!
//! Decodes one delimited profile file (`latitude`, `longitude`, `delta_time`
//! columns, header row required) into normalized records. The `delta_time`
//! column holds fractional seconds elapsed since the profiling instrument's
//! origin, normalized through
//! [`profile_epoch_from_elapsed`](crate::time::profile_epoch_from_elapsed).

use camino::Utf8Path;
use csv::StringRecord;
use serde::Deserialize;

use crate::constants::{Seconds, TrackTable};
use crate::time::profile_epoch_from_elapsed;
use crate::tracks::{ParseTrackError, TrackRecord};

/// Columns a profile file must carry.
pub(crate) const PROFILE_COLUMNS: [&str; 3] = ["latitude", "longitude", "delta_time"];

/// One raw row of a profile file.
#[derive(Debug, Deserialize)]
struct ProfileRow {
    latitude: f64,
    longitude: f64,
    delta_time: Seconds,
}

/// Decode a profile file and append its records to `out`.
///
/// Arguments
/// ---------
/// * `path`: the profile file
/// * `source`: compact id of the file, stamped on every record
/// * `out`: table receiving the decoded records, in file order
///
/// Return
/// ------
/// * `Err(ParseTrackError)` on the first unreadable or unparsable row;
///   `out` may then hold a prefix of the file, the caller discards it
pub(crate) fn extract_profile(
    path: &Utf8Path,
    source: u16,
    out: &mut TrackTable,
) -> Result<(), ParseTrackError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| ParseTrackError::Read(e.to_string()))?;
    let headers = reader
        .headers()
        .map_err(|e| ParseTrackError::Read(e.to_string()))?
        .clone();
    for required in PROFILE_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(ParseTrackError::MissingColumn(required.to_string()));
        }
    }

    for (idx, row) in reader.deserialize::<ProfileRow>().enumerate() {
        let row = row.map_err(|e| row_error(idx + 1, &headers, &e))?;
        out.push(TrackRecord::new(
            row.longitude,
            row.latitude,
            profile_epoch_from_elapsed(row.delta_time),
            source,
        ));
    }
    Ok(())
}

/// Map a csv row failure to its parse error, 1-based data row.
fn row_error(row: usize, headers: &StringRecord, err: &csv::Error) -> ParseTrackError {
    match err.kind() {
        csv::ErrorKind::Deserialize { err: de, .. } => ParseTrackError::InvalidNumber {
            column: de
                .field()
                .and_then(|i| headers.get(i as usize))
                .unwrap_or("?")
                .to_string(),
            row,
        },
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => ParseTrackError::RaggedRow {
            row,
            expected: *expected_len as usize,
            found: *len as usize,
        },
        _ => ParseTrackError::Read(err.to_string()),
    }
}

#[cfg(test)]
mod profile_reader_test {
    use super::*;
    use crate::time::profile_time_origin;
    use std::fs;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> camino::Utf8PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        camino::Utf8PathBuf::from_path_buf(path).unwrap()
    }

    #[test]
    fn test_extract_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "profile.csv",
            "latitude,longitude,delta_time\n-45.25,120.5,0.0\n-45.30,120.6,86400.0\n",
        );

        let mut table = TrackTable::new();
        extract_profile(&path, 7, &mut table).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table[0].latitude, -45.25);
        assert_eq!(table[0].longitude, 120.5);
        assert_eq!(table[0].epoch, profile_time_origin());
        assert_eq!(table[0].source, 7);
        assert_eq!(
            table[1].epoch.to_gregorian_tai(),
            (2018, 1, 2, 0, 0, 0, 0)
        );
    }

    #[test]
    fn test_extract_profile_extra_columns_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "profile.csv",
            "delta_time,quality,latitude,longitude\n10.5,3,1.0,2.0\n",
        );

        let mut table = TrackTable::new();
        extract_profile(&path, 0, &mut table).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].latitude, 1.0);
        assert_eq!(table[0].longitude, 2.0);
    }

    #[test]
    fn test_extract_profile_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "profile.csv", "latitude,longitude\n1.0,2.0\n");

        let mut table = TrackTable::new();
        let err = extract_profile(&path, 0, &mut table).unwrap_err();
        assert_eq!(err, ParseTrackError::MissingColumn("delta_time".to_string()));
    }

    #[test]
    fn test_extract_profile_bad_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "profile.csv",
            "latitude,longitude,delta_time\n1.0,2.0,0.0\n1.0,not_a_number,3.0\n",
        );

        let mut table = TrackTable::new();
        let err = extract_profile(&path, 0, &mut table).unwrap_err();
        assert_eq!(
            err,
            ParseTrackError::InvalidNumber {
                column: "longitude".to_string(),
                row: 2,
            }
        );
    }

    #[test]
    fn test_extract_profile_unreadable_file() {
        let err = extract_profile(
            camino::Utf8Path::new("/nonexistent/profile.csv"),
            0,
            &mut TrackTable::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ParseTrackError::Read(_)));
    }
}
