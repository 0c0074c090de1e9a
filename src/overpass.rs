//! # Shared run state
//!
//! [`Overpass`] is the state container threaded through a colocation run. Its
//! main job is the **source registry**: every archive file is interned once
//! at catalog time and carried through decoding and matching as a compact
//! `u16` id, so each [`TrackRecord`](crate::tracks::TrackRecord) stays small
//! while artifact rows can still name the exact file a record came from.
//!
//! Interning happens on the orchestrating thread only; workers just read the
//! ids, so the registry needs no synchronization.

use camino::{Utf8Path, Utf8PathBuf};

use crate::constants::FastHashMap;

/// State container for one colocation run.
#[derive(Debug, Default, Clone)]
pub struct Overpass {
    /// Interned source paths, indexed by their compact id
    sources: Vec<Utf8PathBuf>,
    source_index: FastHashMap<Utf8PathBuf, u16>,
}

impl Overpass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the compact id of a source file.
    /// If the file is not already in the registry, it is added.
    ///
    /// Arguments
    /// ---------
    /// * `path`: the archive file path
    ///
    /// Return
    /// ------
    /// * The source id
    pub fn uint16_from_source(&mut self, path: &Utf8Path) -> u16 {
        if let Some(&idx) = self.source_index.get(path) {
            return idx;
        }
        let idx = self.sources.len() as u16;
        self.sources.push(path.to_owned());
        self.source_index.insert(path.to_owned(), idx);
        idx
    }

    /// Recover the path behind a compact source id.
    ///
    /// Panics when the id was never interned; ids only come from
    /// [`uint16_from_source`](Self::uint16_from_source), so an unknown id is
    /// a programming error.
    pub fn source_from_uint16(&self, source_idx: u16) -> &Utf8Path {
        match self.sources.get(source_idx as usize) {
            Some(path) => path,
            None => panic!("source index not found: {source_idx}"),
        }
    }

    /// Number of interned source files.
    pub fn sources_len(&self) -> usize {
        self.sources.len()
    }

    pub fn sources_is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Interned paths in id order.
    pub fn iter_sources(&self) -> impl Iterator<Item = &Utf8Path> {
        self.sources.iter().map(Utf8PathBuf::as_path)
    }
}
