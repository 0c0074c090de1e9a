//! # Window artifact sinks
//!
//! A [`ArtifactSink`] receives every flushed window and persists its pairs.
//! The stock implementation, [`CsvSink`], writes one CSV file per window into
//! a target directory. The header row is always written, so an empty window
//! still leaves a well-formed artifact behind.

use camino::Utf8PathBuf;

use crate::colocation::{ColocationPair, ARTIFACT_HEADER};
use crate::overpass::Overpass;
use crate::overpass_errors::OverpassError;

/// Destination for flushed colocation windows.
///
/// `label` is the artifact stem chosen by the pipeline (no extension); the
/// sink decides how the stem maps onto storage.
pub trait ArtifactSink {
    fn write_window(
        &mut self,
        state: &Overpass,
        label: &str,
        pairs: &[ColocationPair],
    ) -> Result<(), OverpassError>;
}

/// Writes each window as `<out_dir>/<label>.csv`.
pub struct CsvSink {
    out_dir: Utf8PathBuf,
}

impl CsvSink {
    pub fn new(out_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Utf8PathBuf {
        &self.out_dir
    }
}

impl ArtifactSink for CsvSink {
    fn write_window(
        &mut self,
        state: &Overpass,
        label: &str,
        pairs: &[ColocationPair],
    ) -> Result<(), OverpassError> {
        let path = self.out_dir.join(format!("{label}.csv"));
        let wrap = |source: csv::Error| OverpassError::ArtifactWriteFailure {
            path: path.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.out_dir).map_err(|err| wrap(csv::Error::from(err)))?;

        let mut writer = csv::Writer::from_path(&path).map_err(wrap)?;
        writer.write_record(ARTIFACT_HEADER).map_err(wrap)?;
        for pair in pairs {
            writer.write_record(pair.artifact_row(state)).map_err(wrap)?;
        }
        writer.flush().map_err(|err| wrap(csv::Error::from(err)))?;
        Ok(())
    }
}

#[cfg(test)]
mod sink_test {
    use super::*;
    use crate::colocation::ColocationPair;
    use crate::overpass::Overpass;
    use crate::time::profile_epoch_from_elapsed;
    use crate::tracks::TrackRecord;
    use camino::Utf8Path;

    fn sample_pair(state: &mut Overpass) -> ColocationPair {
        let source_a = state.uint16_from_source(Utf8Path::new("archive/ATL09_20190101.csv"));
        let source_b = state.uint16_from_source(Utf8Path::new("archive/CAL_LID_20190101.csv"));
        let epoch = profile_epoch_from_elapsed(0.0);
        ColocationPair::new(
            TrackRecord::new(10.0, 45.0, epoch, source_a),
            TrackRecord::new(10.01, 45.0, epoch, source_b),
            0.01,
            0.0,
        )
    }

    #[test]
    fn test_csv_sink_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let mut state = Overpass::default();
        let pair = sample_pair(&mut state);

        let mut sink = CsvSink::new(out_dir.clone());
        sink.write_window(&state, "colocations_2019_day_002", &[pair])
            .unwrap();

        let written =
            std::fs::read_to_string(out_dir.join("colocations_2019_day_002.csv")).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next().unwrap(), ARTIFACT_HEADER.join(","));
        let row = lines.next().unwrap();
        assert!(row.contains("archive/ATL09_20190101.csv"));
        assert!(row.contains("archive/CAL_LID_20190101.csv"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_sink_empty_window_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let state = Overpass::default();

        let mut sink = CsvSink::new(out_dir.clone());
        sink.write_window(&state, "colocations_2020_day_004", &[])
            .unwrap();

        let written =
            std::fs::read_to_string(out_dir.join("colocations_2020_day_004.csv")).unwrap();
        assert_eq!(written.trim_end(), ARTIFACT_HEADER.join(","));
    }

    #[test]
    fn test_csv_sink_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = Utf8PathBuf::from_path_buf(dir.path().join("a").join("b")).unwrap();

        let mut sink = CsvSink::new(out_dir.clone());
        sink.write_window(&Overpass::default(), "colocations_2019_day_365", &[])
            .unwrap();

        assert!(out_dir.join("colocations_2019_day_365.csv").exists());
    }

    #[test]
    fn test_csv_sink_reports_unwritable_target() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("out");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let out_dir = Utf8PathBuf::from_path_buf(blocker).unwrap();

        let mut sink = CsvSink::new(out_dir);
        let err = sink
            .write_window(&Overpass::default(), "colocations_2019_day_002", &[])
            .unwrap_err();
        assert!(matches!(err, OverpassError::ArtifactWriteFailure { .. }));
    }
}
