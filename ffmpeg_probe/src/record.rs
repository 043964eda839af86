use std::ffi::{CStr, c_char};

use serde::Serialize;

use crate::error::ProbeError;
use crate::native::{AVBitStreamFilter, AVCodec};

/// A codec known to the library. It may not be compiled into this particular build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodecRecord {
    /// FFmpeg `AVCodecID`.
    pub id: i32,
    /// Short name, e.g. `h264`.
    pub name: String,
    /// Descriptive name. Empty when the library was built without long names.
    pub long_name: String,
}

/// A bitstream filter known to the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterRecord {
    /// Filter name, e.g. `h264_mp4toannexb`.
    pub name: String,
}

impl TryFrom<&AVCodec> for CodecRecord {
    type Error = ProbeError;

    fn try_from(codec: &AVCodec) -> Result<Self, ProbeError> {
        // SAFETY: descriptors are only reachable through `DescriptorIter`, whose
        // contract keeps their string pointers valid while the reference lives.
        let (name, long_name) = unsafe {
            (
                read_str(codec.name, "codec name")?,
                read_str(codec.long_name, "codec long name")?,
            )
        };

        Ok(Self {
            id: codec.id,
            name: name.ok_or_else(|| null_field("codec name"))?,
            long_name: long_name.unwrap_or_default(),
        })
    }
}

impl TryFrom<&AVBitStreamFilter> for FilterRecord {
    type Error = ProbeError;

    fn try_from(filter: &AVBitStreamFilter) -> Result<Self, ProbeError> {
        // SAFETY: see `CodecRecord::try_from`.
        let name = unsafe { read_str(filter.name, "filter name")? };

        Ok(Self {
            name: name.ok_or_else(|| null_field("filter name"))?,
        })
    }
}

/// Copies a NUL-terminated UTF-8 string out of native memory. NULL reads as `None`.
///
/// # Safety
/// A non-NULL `ptr` must point to a NUL-terminated string valid for reads.
unsafe fn read_str(ptr: *const c_char, field: &'static str) -> Result<Option<String>, ProbeError> {
    if ptr.is_null() {
        return Ok(None);
    }

    // SAFETY: upheld by the caller.
    let text = unsafe { CStr::from_ptr(ptr) };
    text.to_str()
        .map(|text| Some(text.to_owned()))
        .map_err(|err| ProbeError::ConversionFailed {
            field,
            reason: err.to_string(),
        })
}

fn null_field(field: &'static str) -> ProbeError {
    ProbeError::ConversionFailed {
        field,
        reason: "pointer is NULL".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn codec(name: *const c_char, long_name: *const c_char, id: i32) -> AVCodec {
        AVCodec {
            name,
            long_name,
            media_type: 0,
            id,
        }
    }

    #[test]
    fn converts_codec_fields() {
        let native = codec(c"vp9".as_ptr(), c"Google VP9".as_ptr(), 167);
        let record = CodecRecord::try_from(&native).unwrap();
        assert_eq!(
            record,
            CodecRecord {
                id: 167,
                name: "vp9".into(),
                long_name: "Google VP9".into(),
            }
        );
    }

    #[test]
    fn serializes_long_name_in_camel_case() {
        let record = CodecRecord {
            id: 86018,
            name: "aac".into(),
            long_name: "AAC (Advanced Audio Coding)".into(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 86018,
                "name": "aac",
                "longName": "AAC (Advanced Audio Coding)",
            })
        );
    }

    #[test]
    fn missing_long_name_reads_as_empty() {
        let native = codec(c"opus".as_ptr(), ptr::null(), 86076);
        let record = CodecRecord::try_from(&native).unwrap();
        assert_eq!(record.long_name, "");
    }

    #[test]
    fn missing_name_is_a_conversion_failure() {
        let native = AVBitStreamFilter { name: ptr::null() };
        assert!(matches!(
            FilterRecord::try_from(&native),
            Err(ProbeError::ConversionFailed { field: "filter name", .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_a_conversion_failure() {
        let bytes = b"h\xff264\0";
        let native = codec(bytes.as_ptr().cast(), c"broken".as_ptr(), 27);
        assert!(matches!(
            CodecRecord::try_from(&native),
            Err(ProbeError::ConversionFailed { field: "codec name", .. })
        ));
    }

    #[test]
    fn converts_filter_name() {
        let native = AVBitStreamFilter {
            name: c"h264_mp4toannexb".as_ptr(),
        };
        assert_eq!(
            FilterRecord::try_from(&native).unwrap().name,
            "h264_mp4toannexb"
        );
    }
}
