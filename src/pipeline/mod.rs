//! # Windowed colocation pipeline
//!
//! Drives a full archive run: for each requested year the pipeline walks the
//! calendar one day at a time, resolves the day's files in the
//! [`FileCatalog`], decodes them in parallel on a dedicated worker pool, and
//! accumulates the records into the current [`ProcessingWindow`]. Every
//! `window_size_days` days the window is matched with
//! [`colocate_tracks`] and flushed to the [`ArtifactSink`] as one artifact,
//! then a fresh window opens.
//!
//! ## Failure policy
//! -----------------
//! Per-file and per-day problems are never fatal: a file that fails to decode
//! is logged and dropped, a day without usable records is logged and skipped,
//! and the run carries on. Only invalid thresholds and artifact write
//! failures abort the run.
//!
//! ## Window boundaries
//! -----------------
//! Boundaries fall on fixed day-of-year multiples of the window size, so a
//! skipped day never stretches a window into the next one. The artifact is
//! written even when the window matched nothing; a year whose length is not a
//! multiple of the window size ends with one shorter trailing window.

use std::fmt;

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info, warn};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use std::time::Duration;

use crate::catalog::{CatalogEntry, FileCatalog};
use crate::colocation::{colocate_tracks, ColocParams};
use crate::constants::TrackTable;
use crate::overpass::Overpass;
use crate::overpass_errors::OverpassError;
use crate::time::days_in_year;
use crate::tracks::{ImagerDecoder, InstrumentKind, ProfileDecoder, TrackDecoder};

pub mod sink;

pub use sink::{ArtifactSink, CsvSink};

/// Records accumulated between two window boundaries.
struct ProcessingWindow {
    year: u16,
    /// 1-based window counter within the year
    index: u32,
    first_day: u16,
    last_day: u16,
    profile: TrackTable,
    imager: TrackTable,
}

impl ProcessingWindow {
    fn open(year: u16, index: u32, first_day: u16) -> Self {
        Self {
            year,
            index,
            first_day,
            last_day: first_day,
            profile: TrackTable::new(),
            imager: TrackTable::new(),
        }
    }

    fn absorb_day(&mut self, day: u16, mut profile: TrackTable, mut imager: TrackTable) {
        self.last_day = day;
        self.profile.append(&mut profile);
        self.imager.append(&mut imager);
    }
}

/// Counters accumulated over a whole archive run.
///
/// Compact `Display` by default; pretty multi-line when using the alternate
/// flag (`{:#}`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Catalog entries resolved over all iterated days
    pub files_seen: usize,
    /// Files dropped because decoding failed
    pub files_failed: usize,
    /// Days that contributed at least one record
    pub days_processed: usize,
    /// Days without files or whose files all failed
    pub days_skipped: usize,
    /// Windows flushed, trailing partial windows included
    pub windows_flushed: usize,
    /// Flushed windows that had accumulated no records at all
    pub windows_empty: usize,
    /// Pairs written across all artifacts
    pub pairs_written: usize,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Colocation run summary")?;
            writeln!(f, "----------------------")?;
            writeln!(f, "files seen     : {}", self.files_seen)?;
            writeln!(f, "files failed   : {}", self.files_failed)?;
            writeln!(f, "days processed : {}", self.days_processed)?;
            writeln!(f, "days skipped   : {}", self.days_skipped)?;
            writeln!(f, "windows flushed: {}", self.windows_flushed)?;
            writeln!(f, "windows empty  : {}", self.windows_empty)?;
            write!(f, "pairs written  : {}", self.pairs_written)
        } else {
            write!(
                f,
                "files_seen={}, files_failed={}, days_processed={}, days_skipped={}, \
                 windows_flushed={}, windows_empty={}, pairs_written={}",
                self.files_seen,
                self.files_failed,
                self.days_processed,
                self.days_skipped,
                self.windows_flushed,
                self.windows_empty,
                self.pairs_written
            )
        }
    }
}

/// Artifact stem for the window closing at `boundary_day`.
fn artifact_label(year: u16, boundary_day: u16) -> String {
    format!("colocations_{year}_day_{boundary_day:03}")
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Archive-scale colocation driver.
///
/// Owns the thresholds, the per-instrument decoders, the rayon pool the
/// decoders run on, and the sink receiving each flushed window.
pub struct ColocationPipeline<S> {
    params: ColocParams,
    window_size_days: usize,
    pool: rayon::ThreadPool,
    profile_decoder: ProfileDecoder,
    imager_decoder: ImagerDecoder,
    sink: S,
}

impl<S: ArtifactSink> ColocationPipeline<S> {
    /// Build a pipeline around validated thresholds and a worker pool.
    ///
    /// Arguments
    /// ---------
    /// * `params`: matching thresholds, validated here
    /// * `window_size_days`: days accumulated per flushed window, at least 1
    /// * `workers`: decoder pool size, all available cores when `None`
    /// * `imager_decoder`: imager adapter, carries the excluded field set
    /// * `sink`: destination for flushed windows
    pub fn new(
        params: ColocParams,
        window_size_days: usize,
        workers: Option<usize>,
        imager_decoder: ImagerDecoder,
        sink: S,
    ) -> Result<Self, OverpassError> {
        params.validate()?;
        if window_size_days == 0 {
            return Err(OverpassError::InvalidThreshold(
                "window_size_days must be at least 1".to_string(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.unwrap_or_else(default_workers))
            .build()?;
        Ok(Self {
            params,
            window_size_days,
            pool,
            profile_decoder: ProfileDecoder,
            imager_decoder,
            sink,
        })
    }

    pub fn window_size_days(&self) -> usize {
        self.window_size_days
    }

    /// Worker threads in the decoder pool.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run the pipeline over every requested year.
    ///
    /// Years are deduplicated and processed in ascending order; an empty
    /// year set is rejected. The returned report accumulates over the whole
    /// run.
    ///
    /// Return
    /// ------
    /// * the run counters, or the first fatal error
    ///   ([`OverpassError::InvalidThreshold`] or
    ///   [`OverpassError::ArtifactWriteFailure`])
    pub fn run(
        &mut self,
        state: &Overpass,
        catalog: &FileCatalog,
        years: &[u16],
    ) -> Result<RunReport, OverpassError> {
        if years.is_empty() {
            return Err(OverpassError::InvalidThreshold(
                "at least one year must be requested".to_string(),
            ));
        }
        let mut report = RunReport::default();
        for year in years.iter().copied().sorted().dedup() {
            self.run_year(state, catalog, year, &mut report)?;
        }
        info!(%report, "archive run complete");
        Ok(report)
    }

    fn run_year(
        &mut self,
        state: &Overpass,
        catalog: &FileCatalog,
        year: u16,
        report: &mut RunReport,
    ) -> Result<(), OverpassError> {
        let days = days_in_year(year);
        let mut window = ProcessingWindow::open(year, 1, 1);
        info!(year, days, window_size = self.window_size_days, "year started");

        #[cfg(feature = "progress")]
        let pb = {
            let pb = ProgressBar::new(days as u64);
            pb.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}",
                )
                .expect("indicatif template"),
            );
            pb.enable_steady_tick(Duration::from_millis(200));
            pb.set_message(format!("year {year}"));
            pb
        };

        for day in 1..=days {
            let entries = catalog.entries_for(year, day);
            report.files_seen += entries.len();

            if entries.is_empty() {
                debug!(year, day, "no archive files for this day");
                report.days_skipped += 1;
            } else {
                let outcomes = self.decode_day(entries);
                let mut day_profile = TrackTable::new();
                let mut day_imager = TrackTable::new();
                let mut failed = 0usize;
                for (entry, outcome) in entries.iter().zip(outcomes) {
                    match outcome {
                        Ok(mut records) => match entry.kind {
                            InstrumentKind::Profile => day_profile.append(&mut records),
                            InstrumentKind::Imager => day_imager.append(&mut records),
                        },
                        Err(error) => {
                            warn!(path = %entry.path, %error, "file dropped, decode failed");
                            failed += 1;
                        }
                    }
                }
                report.files_failed += failed;

                if day_profile.is_empty() && day_imager.is_empty() {
                    warn!(year, day, failed, "day contributed no records");
                    report.days_skipped += 1;
                } else {
                    debug!(
                        year,
                        day,
                        profile = day_profile.len(),
                        imager = day_imager.len(),
                        "day accumulated"
                    );
                    window.absorb_day(day, day_profile, day_imager);
                    report.days_processed += 1;
                }
            }

            // The boundary applies even when every day in the window was
            // skipped, so windows stay aligned on day-of-year multiples.
            if day as usize % self.window_size_days == 0 {
                let next_index = window.index + 1;
                self.flush_window(state, window, day, report)?;
                window = ProcessingWindow::open(year, next_index, day + 1);
            }

            #[cfg(feature = "progress")]
            pb.inc(1);
        }

        if days as usize % self.window_size_days != 0 {
            info!(year, "flushing trailing partial window");
            self.flush_window(state, window, days, report)?;
        }

        #[cfg(feature = "progress")]
        pb.finish_and_clear();

        Ok(())
    }

    /// Decode one day's files on the worker pool, preserving entry order.
    fn decode_day(&self, entries: &[CatalogEntry]) -> Vec<Result<TrackTable, OverpassError>> {
        let profile_decoder = &self.profile_decoder;
        let imager_decoder = &self.imager_decoder;
        self.pool.install(|| {
            entries
                .par_iter()
                .map(|entry| {
                    let decoder: &dyn TrackDecoder = match entry.kind {
                        InstrumentKind::Profile => profile_decoder,
                        InstrumentKind::Imager => imager_decoder,
                    };
                    decoder.decode(&entry.path, entry.source)
                })
                .collect()
        })
    }

    fn flush_window(
        &mut self,
        state: &Overpass,
        window: ProcessingWindow,
        boundary_day: u16,
        report: &mut RunReport,
    ) -> Result<(), OverpassError> {
        let ProcessingWindow {
            year,
            index,
            first_day,
            last_day,
            profile,
            imager,
        } = window;

        let pairs = colocate_tracks(&profile, &imager, &self.params)?;
        let label = artifact_label(year, boundary_day);
        self.sink.write_window(state, &label, &pairs)?;

        if pairs.len() < 2 {
            warn!(year, window = index, pairs = pairs.len(), "colocation failure");
        }
        if profile.is_empty() && imager.is_empty() {
            report.windows_empty += 1;
        }
        report.windows_flushed += 1;
        report.pairs_written += pairs.len();
        info!(
            year,
            window = index,
            first_day,
            last_day,
            profile = profile.len(),
            imager = imager.len(),
            pairs = pairs.len(),
            %label,
            "window flushed"
        );
        Ok(())
    }
}
