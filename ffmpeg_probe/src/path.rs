use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::ProbeError;

/// Size of the buffer a library path must fit into, NUL terminator included.
pub const MAX_PATH_BYTES: usize = 2048;

/// Caller-supplied location of the FFmpeg shared library.
///
/// Only the shape of the string is checked; whether the file exists is left to the OS loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPath(String);

impl LibraryPath {
    /// Validates `path` without touching the filesystem.
    pub fn new(path: impl Into<String>) -> Result<Self, ProbeError> {
        let path = path.into();
        if path.is_empty() {
            return Err(ProbeError::InvalidPathArgument("path is empty".into()));
        }
        if path.as_bytes().contains(&0) {
            return Err(ProbeError::InvalidPathArgument(
                "path contains a NUL byte".into(),
            ));
        }
        if path.len() + 1 > MAX_PATH_BYTES {
            return Err(ProbeError::InvalidPathArgument(format!(
                "path is {} bytes long, at most {} are allowed",
                path.len(),
                MAX_PATH_BYTES - 1
            )));
        }
        Ok(Self(path))
    }

    /// Extracts the path from a host call taking exactly one string argument.
    pub fn from_args(args: &[Value]) -> Result<Self, ProbeError> {
        let [arg] = args else {
            return Err(ProbeError::InvalidArguments {
                expected: 1,
                actual: args.len(),
            });
        };
        let Value::String(path) = arg else {
            return Err(ProbeError::InvalidPathArgument(format!(
                "expected a string, got {}",
                value_kind(arg)
            )));
        };
        Self::new(path.as_str())
    }

    /// Converts a filesystem path, which must be valid UTF-8.
    pub fn from_path(path: &Path) -> Result<Self, ProbeError> {
        let path = path.to_str().ok_or_else(|| {
            ProbeError::InvalidPathArgument(format!("{} is not valid UTF-8", path.display()))
        })?;
        Self::new(path)
    }

    /// The path as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path as handed to the OS loader.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for LibraryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
