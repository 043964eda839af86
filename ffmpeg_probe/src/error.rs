use thiserror::Error;

/// Errors produced while loading the FFmpeg library and enumerating its descriptors.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The host passed the wrong number of arguments.
    #[error("invalid arguments: expected {expected} argument, got {actual}")]
    InvalidArguments {
        /// Number of arguments the operation takes.
        expected: usize,
        /// Number of arguments actually received.
        actual: usize,
    },

    /// The library path is not a string, contains a NUL byte or is too long.
    #[error("invalid string argument: {0}")]
    InvalidPathArgument(String),

    /// The OS loader could not open the shared library.
    #[error("shared library not found: {path} ({reason})")]
    LibraryNotFound {
        /// Path handed to the OS loader.
        path: String,
        /// Loader diagnostic.
        reason: String,
    },

    /// A required entry point is missing from the library.
    #[error("function not found in shared library: {symbol} ({reason})")]
    SymbolNotFound {
        /// Name of the missing entry point.
        symbol: String,
        /// Loader diagnostic.
        reason: String,
    },

    /// The OS refused to release the library handle.
    #[error("cannot free shared library: {0}")]
    UnloadFailed(String),

    /// A native descriptor held data that cannot be decoded.
    #[error("cannot convert native {field}: {reason}")]
    ConversionFailed {
        /// Descriptor field being read.
        field: &'static str,
        /// What went wrong.
        reason: String,
    },

    /// The library handle was used after it was unloaded.
    #[error("shared library is not loaded")]
    NotLoaded,

    /// Records could not be turned into a host value.
    #[error("cannot build host value: {0}")]
    HostValue(#[from] serde_json::Error),
}

/// Application-level errors produced by the `ffmpeg_probe` binary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Enumerating the library failed.
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// I/O error occurred while reading the denylist file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The denylist file is not valid TOML.
    #[error("Denylist error: {0}")]
    Denylist(#[from] toml::de::Error),

    /// Output could not be rendered as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The library ships codecs that are on the denylist.
    #[error("{found} bad / {total} found\n{details}")]
    ProprietaryCodecs {
        /// Number of denylisted codecs present.
        found: usize,
        /// Number of codecs enumerated.
        total: usize,
        /// One line per offending codec.
        details: String,
    },
}
