//! # fetchkit
//!
//! Blocking primitives for bootstrap installers.
//!
//! This crate provides functionality for:
//! - Classifying the machine architecture to pick the right package
//! - Streaming a download to disk with progress reporting
//! - Installing a zip archive into a directory, once
//! - Patching a single field of a JSON manifest in place
//!
//! ## Example
//!
//! ```no_run
//! use fetchkit::{archive, manifest, platform, DownloadTask, Fetcher, HttpFetcher};
//! use std::path::Path;
//!
//! let platform = platform::detect();
//! println!("Running on {} ({})", platform.machine, platform.arch);
//!
//! let fetcher = HttpFetcher::quiet();
//! let mut task = DownloadTask::unique_in(
//!     Path::new("/tmp"),
//!     "napcat",
//!     "zip",
//!     "https://example.com/NapCat.Shell.zip",
//! );
//! fetcher.fetch(&mut task).expect("download failed");
//!
//! archive::install_archive(&task.dest, Path::new("/opt/QQ/resources/app/napcat")).unwrap();
//! manifest::patch_json_field(
//!     Path::new("/opt/QQ/resources/app/package.json"),
//!     "main",
//!     serde_json::json!("./loadNapCat.cjs"),
//! )
//! .unwrap();
//! task.discard().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod platform;

pub use archive::{ArchiveReport, install_archive};
pub use error::{Error, ErrorCategory, Result};
pub use fetch::{
    DownloadTask, Fetcher, HttpFetcher, MockFetcher, NoProgress, ProgressHandle, ProgressSink,
};
pub use manifest::{patch_json_field, read_json_field};
pub use platform::{Architecture, Platform, classify};
