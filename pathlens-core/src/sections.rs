use crate::BinaryLanguage;
use std::collections::BTreeSet;

/// How a section name is tested against a toolchain marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionMarker {
    Prefix(&'static str),
    Exact(&'static str),
}

impl SectionMarker {
    pub fn matches(&self, section: &str) -> bool {
        match self {
            SectionMarker::Prefix(p) => section.starts_with(p),
            SectionMarker::Exact(e) => section == *e,
        }
    }
}

/// Checked top to bottom; the first marker present in any section wins.
pub const LANGUAGE_MARKERS: &[(SectionMarker, BinaryLanguage)] = &[
    (SectionMarker::Prefix("__swift"), BinaryLanguage::Swift),
    (SectionMarker::Exact("__go_buildinfo"), BinaryLanguage::Go),
    (SectionMarker::Prefix("__rustc"), BinaryLanguage::Rust),
    (SectionMarker::Prefix("__objc"), BinaryLanguage::ObjectiveC),
];

/// Section names collected from one Mach-O slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionNames {
    pub names: BTreeSet<String>,
    /// False when the load-command walk stopped on a short read.
    pub complete: bool,
}

impl SectionNames {
    /// Language for this slice. A walk cut short only reports a marker it
    /// actually saw; the plain-C default needs every command to be read.
    pub fn language(&self) -> Option<BinaryLanguage> {
        if self.complete {
            Some(infer_language(&self.names))
        } else {
            marker_language(&self.names)
        }
    }
}

/// First entry of [`LANGUAGE_MARKERS`] matched by any of `names`.
pub fn marker_language(names: &BTreeSet<String>) -> Option<BinaryLanguage> {
    LANGUAGE_MARKERS
        .iter()
        .find(|(marker, _)| names.iter().any(|n| marker.matches(n)))
        .map(|(_, lang)| *lang)
}

/// Maps a set of section names to a language. A parsed image without any
/// runtime marker is taken to be C.
pub fn infer_language(names: &BTreeSet<String>) -> BinaryLanguage {
    marker_language(names).unwrap_or(BinaryLanguage::C)
}
