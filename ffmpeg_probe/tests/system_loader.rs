mod common;

use ffmpeg_probe::{ProbeError, list_codecs, list_filters};
use serde_json::{Value, json};

fn stub_args() -> [Value; 1] {
    let path = common::stub_library();
    [json!(path.to_str().expect("target directory is valid UTF-8"))]
}

#[test]
fn nonexistent_library_is_not_found() {
    let err = list_codecs(&[json!("/nonexistent/lib.so")]).unwrap_err();

    assert!(matches!(
        err,
        ProbeError::LibraryNotFound { ref path, .. } if path == "/nonexistent/lib.so"
    ));
    let message = err.to_string();
    assert!(message.starts_with("shared library not found: /nonexistent/lib.so"));
    #[cfg(unix)]
    assert!(
        message.to_lowercase().contains("no such file"),
        "OS diagnostic missing from: {message}"
    );
}

#[test]
fn missing_argument_is_rejected() {
    assert!(matches!(
        list_filters(&[]),
        Err(ProbeError::InvalidArguments { expected: 1, actual: 0 })
    ));
}

#[test]
fn oversized_path_is_rejected_before_loading() {
    let path = format!("/{}", "x".repeat(4096));

    assert!(matches!(
        list_codecs(&[json!(path)]),
        Err(ProbeError::InvalidPathArgument(_))
    ));
}

#[test]
fn stub_library_codecs_load_through_the_os() {
    let codecs = list_codecs(&stub_args()).unwrap();

    assert_eq!(codecs.len(), stub_avcodec::codec_count());
    let names: Vec<&str> = codecs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        ["h264", "theora", "vp8", "vp9", "mp3", "aac", "vorbis", "flac", "opus"]
    );
    assert_eq!(codecs[0].id, 27);
    assert_eq!(codecs[0].long_name, "H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10");
}

#[test]
fn stub_library_filters_load_through_the_os() {
    let filters = list_filters(&stub_args()).unwrap();

    assert_eq!(filters.len(), stub_avcodec::filter_count());
    let names: Vec<&str> = filters.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["aac_adtstoasc", "h264_mp4toannexb", "vp9_superframe", "null"]);
}

#[test]
fn stub_library_reloads_with_equal_results() {
    let first = list_codecs(&stub_args()).unwrap();
    let second = list_codecs(&stub_args()).unwrap();

    assert_eq!(first, second);
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[test]
fn library_without_entry_points_is_rejected() {
    let err = list_filters(&[json!("libc.so.6")]).unwrap_err();

    assert!(matches!(
        err,
        ProbeError::SymbolNotFound { ref symbol, .. } if symbol == "av_codec_iterate"
    ));
}
