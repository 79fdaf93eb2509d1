//! # Album Ingest
//!
//! An incremental batch pipeline that turns a growing pile of downloaded
//! album archives into normalized images and a catalog keyed by album name.
//! Every run can be repeated or resumed after an interruption: each unit of
//! work is skipped when its result already exists.
//!
//! # Architecture: Three Stages and a Merge
//!
//! ```text
//! 1. Extract    downloads/*.zip   →  extracted/<album>/        (flat raw images)
//! 2. Normalize  extracted/<album> →  processed/<album>/*.avif  (resized, re-encoded)
//! 3. Merge      new outputs       →  index.json                (album → paths)
//! ```
//!
//! The [`pipeline`] module sequences the stages and collects their counts.
//! Each stage is driven through a backend trait ([`archive::ArchiveBackend`],
//! [`imaging::ImageBackend`]), so the pipeline logic is testable without real
//! archives or pixel work.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`extract`] | Stage 1: archives to per-album directories, staged and renamed into place |
//! | [`normalize`] | Stage 2: one resized AVIF per source image, skipping existing outputs |
//! | [`catalog`] | Stage 3: load, merge without duplicates, atomic save, audit |
//! | [`pipeline`] | One full run (`run`) and the catalog audit (`check`) |
//! | [`archive`] | Archive backend trait and the `zip` implementation |
//! | [`imaging`] | Resize policy, image backend trait, and the pure-Rust backend |
//! | [`config`] | `album-ingest.toml` loading, merging over stock defaults, validation |
//! | [`naming`] | Album names, sanitizing, output names, collision-safe names |
//! | [`fsutil`] | Sorted directory listing and atomic writes |
//! | [`output`] | CLI output formatting for run summaries and check reports |
//!
//! # Design Decisions
//!
//! ## Existence Means Done
//!
//! An album directory marks an extracted archive; an output file marks a
//! normalized image. No checksums, no marker files. This only holds because
//! nothing is ever visible half-written: files go through a temp file and a
//! rename ([`fsutil::write_atomic`]), and a whole album is staged in a hidden
//! directory before it is renamed into place.
//!
//! ## Merge, Never Rebuild
//!
//! The catalog accumulates across runs. A run only appends paths an album does
//! not list yet, so entries for albums whose archives are long gone survive.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, Lanczos3 resampling, and AVIF encoding all come from the `image`
//! crate and `rav1e`. No ImageMagick, no system libraries.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod extract;
pub mod fsutil;
pub mod imaging;
pub mod naming;
pub mod normalize;
pub mod output;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_helpers;
