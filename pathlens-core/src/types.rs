use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Implementation language of a compiled Mach-O executable, inferred from
/// section names left behind by the toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryLanguage {
    Swift,
    Go,
    Rust,
    #[serde(rename = "objc")]
    ObjectiveC,
    /// No runtime metadata sections were found.
    C,
}

impl BinaryLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryLanguage::Swift => "swift",
            BinaryLanguage::Go => "go",
            BinaryLanguage::Rust => "rust",
            BinaryLanguage::ObjectiveC => "objc",
            BinaryLanguage::C => "c",
        }
    }
}

/// Interpreter named on a script's `#!` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLanguage {
    Python,
    Bash,
    Zsh,
    Ruby,
    Node,
    Perl,
    #[serde(rename = "sh")]
    Shell,
}

impl ScriptLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptLanguage::Python => "python",
            ScriptLanguage::Bash => "bash",
            ScriptLanguage::Zsh => "zsh",
            ScriptLanguage::Ruby => "ruby",
            ScriptLanguage::Node => "node",
            ScriptLanguage::Perl => "perl",
            ScriptLanguage::Shell => "sh",
        }
    }
}

/// Base image declared by a container wrapper's descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseImage {
    Kali,
    Debian,
    Alpine,
    Ubuntu,
    Python,
    Node,
    Go,
    Rust,
}

impl BaseImage {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseImage::Kali => "kali",
            BaseImage::Debian => "debian",
            BaseImage::Alpine => "alpine",
            BaseImage::Ubuntu => "ubuntu",
            BaseImage::Python => "python",
            BaseImage::Node => "node",
            BaseImage::Go => "go",
            BaseImage::Rust => "rust",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutableKind {
    Script,
    Binary,
    Container,
}

impl fmt::Display for ExecutableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutableKind::Script => "script",
            ExecutableKind::Binary => "binary",
            ExecutableKind::Container => "container",
        };
        write!(f, "{name}")
    }
}

/// What an executable on the search path turned out to be.
///
/// Serializes as `{"type": "binary", "language": "swift"}`; an unknown
/// language serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "language", rename_all = "lowercase")]
pub enum Classification {
    Script(Option<ScriptLanguage>),
    Binary(Option<BinaryLanguage>),
    Container(Option<BaseImage>),
}

impl Classification {
    pub fn kind(&self) -> ExecutableKind {
        match self {
            Classification::Script(_) => ExecutableKind::Script,
            Classification::Binary(_) => ExecutableKind::Binary,
            Classification::Container(_) => ExecutableKind::Container,
        }
    }

    pub fn language(&self) -> Option<&'static str> {
        match self {
            Classification::Script(lang) => lang.map(|l| l.as_str()),
            Classification::Binary(lang) => lang.map(|l| l.as_str()),
            Classification::Container(image) => image.map(|i| i.as_str()),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.language() {
            Some(lang) => write!(f, "{} ({lang})", self.kind()),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// One executable found while listing a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub directory: PathBuf,
    /// Target of a one-level symlink, or `original_path` otherwise.
    pub resolved_path: PathBuf,
    pub original_path: PathBuf,
}

/// A directory from the search list together with what was found in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryRecord {
    pub directory: PathBuf,
    pub exists: bool,
    pub writable: bool,
    pub source_label: String,
    /// An identical directory appeared earlier in the list.
    pub duplicate: bool,
    pub executable_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShadowEntry {
    pub name: String,
    pub directory: PathBuf,
    /// Directory that owns `name` at runtime.
    pub first_directory: PathBuf,
    pub classification: Classification,
    pub is_shadowed: bool,
    pub shadowing_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryScan {
    pub record: DirectoryRecord,
    pub entries: Vec<ShadowEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub directories: Vec<DirectoryScan>,
}

impl ScanReport {
    pub fn entries(&self) -> impl Iterator<Item = &ShadowEntry> {
        self.directories.iter().flat_map(|d| d.entries.iter())
    }

    pub fn shadowed(&self) -> impl Iterator<Item = &ShadowEntry> {
        self.entries().filter(|e| e.is_shadowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_display() {
        assert_eq!(
            Classification::Binary(Some(BinaryLanguage::Swift)).to_string(),
            "binary (swift)"
        );
        assert_eq!(Classification::Binary(None).to_string(), "binary");
        assert_eq!(
            Classification::Script(Some(ScriptLanguage::Shell)).to_string(),
            "script (sh)"
        );
    }

    #[test]
    fn classification_language_tags() {
        assert_eq!(
            Classification::Container(Some(BaseImage::Debian)).language(),
            Some("debian")
        );
        assert_eq!(Classification::Script(None).language(), None);
        assert_eq!(
            Classification::Binary(Some(BinaryLanguage::ObjectiveC)).kind(),
            ExecutableKind::Binary
        );
    }
}
