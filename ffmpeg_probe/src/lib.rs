#![deny(missing_docs)]

//! Runtime introspection of an FFmpeg shared library.
//!
//! The library is opened from a caller-supplied path instead of being linked at build
//! time; its codec and bitstream filter descriptors are walked and turned into plain records.

/// Host-facing enumeration operations.
pub mod api;

/// Denylist checks over enumerated codecs.
pub mod audit;

/// FFmpeg library locations inside Electron distributions.
pub mod dist;

/// Error types used by the probe.
pub mod error;

/// Native opaque-cursor iteration.
pub mod iter;

/// Loaded FFmpeg library handle.
pub mod library;

/// FFI declarations for the consumed part of FFmpeg.
pub mod native;

/// Library path validation.
pub mod path;

/// Platform dynamic loading.
pub mod platform;

/// Host-facing descriptor records.
pub mod record;

pub use api::{list_codecs, list_filters};
pub use error::ProbeError;
pub use path::LibraryPath;
pub use record::{CodecRecord, FilterRecord};
