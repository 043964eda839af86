use std::ffi::c_void;
use std::mem;

use crate::error::ProbeError;
use crate::iter::DescriptorIter;
use crate::native::{
    AVBitStreamFilter, AVCodec, BSF_ITERATE, BsfIterateFn, CODEC_ITERATE, CodecIterateFn,
};
use crate::path::LibraryPath;
use crate::platform::PlatformLoader;

/// A loaded FFmpeg library together with its resolved iterate functions.
///
/// The handle is either fully loaded or empty. Dropping a loaded handle closes it;
/// call [`FfmpegLibrary::unload`] to observe the outcome of the close.
pub struct FfmpegLibrary<'l, L: PlatformLoader> {
    loader: &'l L,
    path: LibraryPath,
    loaded: Option<Loaded<L::Module>>,
}

struct Loaded<M> {
    module: M,
    codec_iterate: CodecIterateFn,
    bsf_iterate: BsfIterateFn,
}

impl<'l, L: PlatformLoader> FfmpegLibrary<'l, L> {
    /// Opens the library at `path` and resolves `av_codec_iterate` and `av_bsf_iterate`.
    ///
    /// If a symbol is missing the library is closed again before the error is returned.
    ///
    /// # SAFETY
    /// The caller must ensure that the library at `path`:
    /// - exports both symbols with the [`IterateFn`](crate::native::IterateFn) ABI,
    /// - hands out descriptors whose leading fields match [`AVCodec`] and [`AVBitStreamFilter`],
    /// - keeps those descriptors alive and unmodified while it stays loaded.
    pub unsafe fn load(loader: &'l L, path: &LibraryPath) -> Result<Self, ProbeError> {
        // SAFETY: forwarded caller contract.
        let module = unsafe { loader.open(path)? };

        // SAFETY: forwarded caller contract; `module` is open.
        let (codec_iterate, bsf_iterate) = match unsafe { resolve_entry_points(loader, &module) } {
            Ok(entry_points) => entry_points,
            Err(err) => {
                if let Err(close_err) = loader.close(module) {
                    tracing::warn!(
                        path = %path,
                        error = %close_err,
                        "failed to release shared library"
                    );
                }
                return Err(err);
            }
        };

        Ok(Self {
            loader,
            path: path.clone(),
            loaded: Some(Loaded {
                module,
                codec_iterate,
                bsf_iterate,
            }),
        })
    }

    /// Whether the OS handle is still held.
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &LibraryPath {
        &self.path
    }

    /// Iterates over every codec descriptor known to the library.
    pub fn codecs(&self) -> Result<DescriptorIter<'_, AVCodec>, ProbeError> {
        let loaded = self.loaded.as_ref().ok_or(ProbeError::NotLoaded)?;
        // SAFETY: guaranteed by the `load` contract; the iterator borrows `self`,
        // so the library cannot be unloaded while records are alive.
        Ok(unsafe { DescriptorIter::new(loaded.codec_iterate) })
    }

    /// Iterates over every bitstream filter descriptor known to the library.
    pub fn filters(&self) -> Result<DescriptorIter<'_, AVBitStreamFilter>, ProbeError> {
        let loaded = self.loaded.as_ref().ok_or(ProbeError::NotLoaded)?;
        // SAFETY: see `codecs`.
        Ok(unsafe { DescriptorIter::new(loaded.bsf_iterate) })
    }

    /// Closes the library. The handle is empty afterwards whatever the outcome,
    /// so unloading twice is a no-op.
    pub fn unload(&mut self) -> Result<(), ProbeError> {
        let Some(loaded) = self.loaded.take() else {
            return Ok(());
        };
        self.loader.close(loaded.module)
    }
}

impl<L: PlatformLoader> Drop for FfmpegLibrary<'_, L> {
    fn drop(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            if let Err(err) = self.loader.close(loaded.module) {
                tracing::warn!(path = %self.path, error = %err, "failed to release shared library");
            }
        }
    }
}

unsafe fn resolve_entry_points<L: PlatformLoader>(
    loader: &L,
    module: &L::Module,
) -> Result<(CodecIterateFn, BsfIterateFn), ProbeError> {
    // SAFETY: `module` is open; the addresses are typed below.
    let codec_iterate = unsafe { loader.resolve(module, CODEC_ITERATE)? };
    let bsf_iterate = unsafe { loader.resolve(module, BSF_ITERATE)? };

    // SAFETY:
    // - Function and data pointers have the same size on every platform we load on.
    // - The `load` contract guarantees both symbols are functions with these signatures.
    unsafe {
        Ok((
            mem::transmute::<*mut c_void, CodecIterateFn>(codec_iterate.as_ptr()),
            mem::transmute::<*mut c_void, BsfIterateFn>(bsf_iterate.as_ptr()),
        ))
    }
}
