use std::ffi::{CStr, c_char, c_int, c_void};
use std::ptr;

/// Leading fields of FFmpeg's `AVCodec`, in declaration order.
#[repr(C)]
pub struct AVCodec {
    pub name: *const c_char,
    pub long_name: *const c_char,
    pub media_type: c_int,
    pub id: c_int,
}

/// Leading field of FFmpeg's `AVBitStreamFilter`.
#[repr(C)]
pub struct AVBitStreamFilter {
    pub name: *const c_char,
}

const AVMEDIA_TYPE_VIDEO: c_int = 0;
const AVMEDIA_TYPE_AUDIO: c_int = 1;

struct Registry<T, const N: usize>([T; N]);

// SAFETY: entries only point at static C string literals and are never mutated.
unsafe impl<T, const N: usize> Sync for Registry<T, N> {}

const fn codec(
    name: &'static CStr,
    long_name: &'static CStr,
    media_type: c_int,
    id: c_int,
) -> AVCodec {
    AVCodec {
        name: name.as_ptr(),
        long_name: long_name.as_ptr(),
        media_type,
        id,
    }
}

const fn bsf(name: &'static CStr) -> AVBitStreamFilter {
    AVBitStreamFilter { name: name.as_ptr() }
}

static CODECS: Registry<AVCodec, 9> = Registry([
    codec(c"h264", c"H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10", AVMEDIA_TYPE_VIDEO, 27),
    codec(c"theora", c"Theora", AVMEDIA_TYPE_VIDEO, 30),
    codec(c"vp8", c"On2 VP8", AVMEDIA_TYPE_VIDEO, 139),
    codec(c"vp9", c"Google VP9", AVMEDIA_TYPE_VIDEO, 167),
    codec(c"mp3", c"MP3 (MPEG audio layer 3)", AVMEDIA_TYPE_AUDIO, 86017),
    codec(c"aac", c"AAC (Advanced Audio Coding)", AVMEDIA_TYPE_AUDIO, 86018),
    codec(c"vorbis", c"Vorbis", AVMEDIA_TYPE_AUDIO, 86021),
    codec(c"flac", c"FLAC (Free Lossless Audio Codec)", AVMEDIA_TYPE_AUDIO, 86028),
    codec(c"opus", c"Opus", AVMEDIA_TYPE_AUDIO, 86076),
]);

static FILTERS: Registry<AVBitStreamFilter, 4> = Registry([
    bsf(c"aac_adtstoasc"),
    bsf(c"h264_mp4toannexb"),
    bsf(c"vp9_superframe"),
    bsf(c"null"),
]);

/// Number of codec descriptors reported by [`av_codec_iterate`].
pub fn codec_count() -> usize {
    CODECS.0.len()
}

/// Number of bitstream filter descriptors reported by [`av_bsf_iterate`].
pub fn filter_count() -> usize {
    FILTERS.0.len()
}

/// Iterates over the registered codecs.
///
/// `*opaque` must start out NULL; it encodes the index of the next entry.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn av_codec_iterate(opaque: *mut *mut c_void) -> *const AVCodec {
    // SAFETY: forwarded caller contract, see `advance`.
    unsafe { advance(&CODECS.0, opaque) }
}

/// Iterates over the registered bitstream filters.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn av_bsf_iterate(opaque: *mut *mut c_void) -> *const AVBitStreamFilter {
    // SAFETY: forwarded caller contract, see `advance`.
    unsafe { advance(&FILTERS.0, opaque) }
}

unsafe fn advance<T>(table: &'static [T], opaque: *mut *mut c_void) -> *const T {
    if opaque.is_null() {
        return ptr::null();
    }

    // SAFETY:
    // - We checked `opaque` is not NULL.
    // - FFI contract requires `opaque` to point to a writable cursor slot owned by
    //   the caller for the duration of this call.
    let index = unsafe { *opaque } as usize;
    match table.get(index) {
        Some(entry) => {
            // SAFETY: same slot as above.
            unsafe { *opaque = (index + 1) as *mut c_void };
            entry
        }
        None => ptr::null(),
    }
}
