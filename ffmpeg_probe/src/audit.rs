use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;
use crate::record::CodecRecord;

/// Codec names that must not ship in a redistributable FFmpeg build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    names: BTreeSet<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DenylistFile {
    names: Vec<String>,
}

impl Denylist {
    /// Builds a denylist; names match case-insensitively.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Parses a TOML document of the form `names = ["h264", "aac"]`.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let file: DenylistFile = toml::from_str(text)?;
        Ok(Self::new(file.names))
    }

    /// Reads a denylist TOML file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&text)?)
    }

    /// Whether `name` is denylisted.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(["h264", "aac"])
    }
}

/// Outcome of checking a codec list against a [`Denylist`].
#[derive(Debug)]
pub struct AuditReport<'a> {
    /// Number of codecs checked.
    pub total: usize,
    /// Denylisted codecs, in enumeration order.
    pub flagged: Vec<&'a CodecRecord>,
}

impl AuditReport<'_> {
    /// No denylisted codec was found.
    pub fn is_clean(&self) -> bool {
        self.flagged.is_empty()
    }

    /// Fails with one `> name detected (long name)` line per flagged codec.
    pub fn ensure_clean(&self) -> Result<(), AppError> {
        if self.is_clean() {
            return Ok(());
        }
        let details = self
            .flagged
            .iter()
            .map(|codec| format!("> {} detected ({})", codec.name, codec.long_name))
            .collect::<Vec<_>>()
            .join("\n");
        Err(AppError::ProprietaryCodecs {
            found: self.flagged.len(),
            total: self.total,
            details,
        })
    }
}

/// Flags every codec whose name is on `denylist`.
pub fn audit<'a>(codecs: &'a [CodecRecord], denylist: &Denylist) -> AuditReport<'a> {
    AuditReport {
        total: codecs.len(),
        flagged: codecs
            .iter()
            .filter(|codec| denylist.contains(&codec.name))
            .collect(),
    }
}
