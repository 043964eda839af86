use std::error::Error as _;
use std::ffi::{CStr, c_void};
use std::ptr::NonNull;

use crate::error::ProbeError;
use crate::path::LibraryPath;

/// Opens shared libraries, resolves their symbols and closes them again.
///
/// Implementations mutate process-wide dynamic linker state and make no attempt
/// to coordinate with unrelated code loading the same library.
pub trait PlatformLoader {
    /// OS handle of an opened library.
    type Module;

    /// Loads the shared library at `path`.
    ///
    /// # Safety
    /// Loading runs the library's initialisers; the caller must trust the library.
    unsafe fn open(&self, path: &LibraryPath) -> Result<Self::Module, ProbeError>;

    /// Looks up the address of `symbol` in an opened library.
    ///
    /// # Safety
    /// The returned address is only meaningful while `module` stays open, and the
    /// caller is responsible for using it with the correct type.
    unsafe fn resolve(
        &self,
        module: &Self::Module,
        symbol: &CStr,
    ) -> Result<NonNull<c_void>, ProbeError>;

    /// Releases the OS handle. The handle is consumed even when the OS reports a failure.
    fn close(&self, module: Self::Module) -> Result<(), ProbeError>;
}

/// Loader backed by the platform's native dynamic linker, chosen at build time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLoader;

#[cfg(unix)]
mod os {
    use libloading::os::unix::{Library, RTLD_LOCAL, RTLD_NOW};
    use std::path::Path;

    pub(super) type Module = Library;

    pub(super) unsafe fn open(path: &Path) -> Result<Library, libloading::Error> {
        // SAFETY: forwarded to `PlatformLoader::open`.
        unsafe { Library::open(Some(path), RTLD_NOW | RTLD_LOCAL) }
    }
}

#[cfg(windows)]
mod os {
    use libloading::os::windows::Library;
    use std::path::Path;

    pub(super) type Module = Library;

    pub(super) unsafe fn open(path: &Path) -> Result<Library, libloading::Error> {
        // SAFETY: forwarded to `PlatformLoader::open`.
        unsafe { Library::new(path) }
    }
}

impl PlatformLoader for SystemLoader {
    type Module = os::Module;

    unsafe fn open(&self, path: &LibraryPath) -> Result<Self::Module, ProbeError> {
        // SAFETY: forwarded caller contract.
        let module = unsafe { os::open(path.as_path()) }.map_err(|err| {
            ProbeError::LibraryNotFound {
                path: path.to_string(),
                reason: describe(&err),
            }
        })?;
        tracing::debug!(path = %path, "shared library opened");
        Ok(module)
    }

    unsafe fn resolve(
        &self,
        module: &Self::Module,
        symbol: &CStr,
    ) -> Result<NonNull<c_void>, ProbeError> {
        let not_found = |reason: String| ProbeError::SymbolNotFound {
            symbol: symbol.to_string_lossy().into_owned(),
            reason,
        };

        // SAFETY: the symbol is read as an untyped address; giving it a type is up to the caller.
        let address = unsafe { module.get::<*mut c_void>(symbol.to_bytes_with_nul()) }
            .map(|sym| *sym)
            .map_err(|err| not_found(describe(&err)))?;
        let address =
            NonNull::new(address).ok_or_else(|| not_found("symbol resolves to NULL".into()))?;

        tracing::debug!(symbol = %symbol.to_string_lossy(), "symbol resolved");
        Ok(address)
    }

    fn close(&self, module: Self::Module) -> Result<(), ProbeError> {
        module
            .close()
            .map_err(|err| ProbeError::UnloadFailed(describe(&err)))?;
        tracing::debug!("shared library closed");
        Ok(())
    }
}

// libloading only says which call failed; the OS diagnostic is its source.
fn describe(err: &libloading::Error) -> String {
    match err.source() {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}
