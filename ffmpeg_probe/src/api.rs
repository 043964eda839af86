use serde::Serialize;
use serde_json::Value;

use crate::error::ProbeError;
use crate::library::FfmpegLibrary;
use crate::path::LibraryPath;
use crate::platform::{PlatformLoader, SystemLoader};
use crate::record::{CodecRecord, FilterRecord};

/// Lists the codecs known to the FFmpeg library whose path is the single host argument.
pub fn list_codecs(args: &[Value]) -> Result<Vec<CodecRecord>, ProbeError> {
    list_codecs_with(&SystemLoader, args)
}

/// Lists the bitstream filters known to the FFmpeg library whose path is the single host argument.
pub fn list_filters(args: &[Value]) -> Result<Vec<FilterRecord>, ProbeError> {
    list_filters_with(&SystemLoader, args)
}

/// [`list_codecs`] with an explicit loader.
pub fn list_codecs_with<L: PlatformLoader>(
    loader: &L,
    args: &[Value],
) -> Result<Vec<CodecRecord>, ProbeError> {
    let path = LibraryPath::from_args(args)?;
    enumerate_codecs(loader, &path)
}

/// [`list_filters`] with an explicit loader.
pub fn list_filters_with<L: PlatformLoader>(
    loader: &L,
    args: &[Value],
) -> Result<Vec<FilterRecord>, ProbeError> {
    let path = LibraryPath::from_args(args)?;
    enumerate_filters(loader, &path)
}

/// Loads the library, converts every codec descriptor and unloads it again.
pub fn enumerate_codecs<L: PlatformLoader>(
    loader: &L,
    path: &LibraryPath,
) -> Result<Vec<CodecRecord>, ProbeError> {
    with_library(loader, path, |library| {
        library.codecs()?.map(CodecRecord::try_from).collect()
    })
}

/// Loads the library, converts every bitstream filter descriptor and unloads it again.
pub fn enumerate_filters<L: PlatformLoader>(
    loader: &L,
    path: &LibraryPath,
) -> Result<Vec<FilterRecord>, ProbeError> {
    with_library(loader, path, |library| {
        library.filters()?.map(FilterRecord::try_from).collect()
    })
}

/// Turns an enumeration result into the array handed back to the host.
pub fn to_host_value<T: Serialize>(records: &[T]) -> Result<Value, ProbeError> {
    Ok(serde_json::to_value(records)?)
}

// The library is closed before returning on every path: explicitly on success so a
// failed close becomes the result, through `Drop` when the walk fails.
fn with_library<'l, L, T, F>(
    loader: &'l L,
    path: &LibraryPath,
    walk: F,
) -> Result<Vec<T>, ProbeError>
where
    L: PlatformLoader,
    F: FnOnce(&FfmpegLibrary<'l, L>) -> Result<Vec<T>, ProbeError>,
{
    // SAFETY: the library at `path` is trusted to be an FFmpeg build matching the
    // descriptor layouts in `native`. Nothing verifies its version.
    let mut library = unsafe { FfmpegLibrary::load(loader, path)? };
    let records = walk(&library)?;
    library.unload()?;

    tracing::debug!(path = %path, count = records.len(), "descriptors enumerated");
    Ok(records)
}
