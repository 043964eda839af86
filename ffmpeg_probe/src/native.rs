use std::ffi::{CStr, c_char, c_int, c_void};

/// Entry point iterating over every codec FFmpeg knows about.
pub const CODEC_ITERATE: &CStr = c"av_codec_iterate";

/// Entry point iterating over every bitstream filter FFmpeg knows about.
pub const BSF_ITERATE: &CStr = c"av_bsf_iterate";

/// FFI signature shared by FFmpeg's `*_iterate` functions.
///
/// `*opaque` starts out NULL and is advanced by the library on every call.
/// A NULL return means the iteration is over.
pub type IterateFn<R> = unsafe extern "C" fn(opaque: *mut *mut c_void) -> *const R;

/// `av_codec_iterate`.
pub type CodecIterateFn = IterateFn<AVCodec>;

/// `av_bsf_iterate`.
pub type BsfIterateFn = IterateFn<AVBitStreamFilter>;

/// Leading fields of FFmpeg's `AVCodec`.
///
/// Only ever observed through a reference handed out by the library; the layout
/// is not checked against the loaded library version.
#[repr(C)]
#[derive(Debug)]
pub struct AVCodec {
    pub(crate) name: *const c_char,
    pub(crate) long_name: *const c_char,
    // Never read, keeps `id` at its native offset.
    #[allow(dead_code)]
    pub(crate) media_type: c_int,
    pub(crate) id: c_int,
}

/// Leading field of FFmpeg's `AVBitStreamFilter`.
#[repr(C)]
#[derive(Debug)]
pub struct AVBitStreamFilter {
    pub(crate) name: *const c_char,
}
