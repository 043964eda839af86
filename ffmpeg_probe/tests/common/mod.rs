#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::ffi::{CStr, c_void};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use ffmpeg_probe::path::LibraryPath;
use ffmpeg_probe::platform::PlatformLoader;
use ffmpeg_probe::ProbeError;

/// Handle of a library "opened" by [`CountingLoader`].
pub struct FakeModule;

/// In-process loader that resolves symbols from a table and counts opens and closes.
pub struct CountingLoader {
    symbols: HashMap<&'static str, NonNull<c_void>>,
    fail_open: bool,
    fail_close: bool,
    opened: Cell<usize>,
    closed: Cell<usize>,
}

pub fn address(function: *const ()) -> NonNull<c_void> {
    NonNull::new(function as *mut c_void).expect("function address is never NULL")
}

impl CountingLoader {
    /// Resolves both entry points to the functions exported by `stub_avcodec`.
    pub fn stub() -> Self {
        Self {
            symbols: HashMap::from([
                ("av_codec_iterate", address(stub_avcodec::av_codec_iterate as *const ())),
                ("av_bsf_iterate", address(stub_avcodec::av_bsf_iterate as *const ())),
            ]),
            fail_open: false,
            fail_close: false,
            opened: Cell::new(0),
            closed: Cell::new(0),
        }
    }

    pub fn with_symbol(mut self, name: &'static str, function: *const ()) -> Self {
        self.symbols.insert(name, address(function));
        self
    }

    pub fn without_symbol(mut self, name: &str) -> Self {
        self.symbols.remove(name);
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    pub fn closed(&self) -> usize {
        self.closed.get()
    }

    #[track_caller]
    pub fn assert_balanced(&self) {
        assert_eq!(self.opened(), self.closed(), "every opened library must be closed");
    }
}

impl PlatformLoader for CountingLoader {
    type Module = FakeModule;

    unsafe fn open(&self, path: &LibraryPath) -> Result<FakeModule, ProbeError> {
        if self.fail_open {
            return Err(ProbeError::LibraryNotFound {
                path: path.to_string(),
                reason: "no such file".into(),
            });
        }
        self.opened.set(self.opened.get() + 1);
        Ok(FakeModule)
    }

    unsafe fn resolve(
        &self,
        _module: &FakeModule,
        symbol: &CStr,
    ) -> Result<NonNull<c_void>, ProbeError> {
        let name = symbol.to_str().expect("symbol names are ASCII");
        self.symbols
            .get(name)
            .copied()
            .ok_or_else(|| ProbeError::SymbolNotFound {
                symbol: name.to_owned(),
                reason: "undefined symbol".into(),
            })
    }

    fn close(&self, _module: FakeModule) -> Result<(), ProbeError> {
        self.closed.set(self.closed.get() + 1);
        if self.fail_close {
            return Err(ProbeError::UnloadFailed("module is still referenced".into()));
        }
        Ok(())
    }
}

/// Locates the `stub_avcodec` shared library cargo built alongside this test.
///
/// Test binaries live in `target/<profile>/deps`; the library is either uplifted
/// to `target/<profile>` or left in `deps` with a hashed name.
pub fn stub_library() -> PathBuf {
    let exe = std::env::current_exe().expect("test executable path");
    let deps = exe.parent().expect("test executable has a parent directory");
    let file_name = format!("{DLL_PREFIX}stub_avcodec{DLL_SUFFIX}");

    let exact = [
        deps.parent().map(|profile| profile.join(&file_name)),
        Some(deps.join(&file_name)),
    ];
    if let Some(path) = exact.into_iter().flatten().find(|path| path.is_file()) {
        return path;
    }

    hashed_stub_library(deps)
        .unwrap_or_else(|| panic!("{file_name} not found near {}", deps.display()))
}

fn hashed_stub_library(deps: &Path) -> Option<PathBuf> {
    let prefix = format!("{DLL_PREFIX}stub_avcodec-");
    std::fs::read_dir(deps)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(DLL_SUFFIX))
        })
}
