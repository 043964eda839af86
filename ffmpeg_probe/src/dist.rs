use std::path::{Path, PathBuf};

use clap::ValueEnum;

/// Platform layout of an Electron distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ElectronPlatform {
    /// macOS application bundle.
    Darwin,
    /// Linux tree.
    Linux,
    /// Windows tree.
    Win32,
}

impl ElectronPlatform {
    /// Layout of the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::Darwin
        } else if cfg!(target_os = "windows") {
            Self::Win32
        } else {
            Self::Linux
        }
    }

    /// Location of the bundled FFmpeg library relative to the distribution root.
    pub fn libffmpeg_relative_path(self) -> &'static str {
        match self {
            Self::Darwin => {
                "Electron.app/Contents/Frameworks/Electron Framework.framework/Libraries/libffmpeg.dylib"
            }
            Self::Linux => "libffmpeg.so",
            Self::Win32 => "ffmpeg.dll",
        }
    }
}

/// Absolute location of the FFmpeg library inside the distribution at `electron_dist`.
pub fn libffmpeg_path(electron_dist: &Path, platform: ElectronPlatform) -> PathBuf {
    electron_dist.join(platform.libffmpeg_relative_path())
}
