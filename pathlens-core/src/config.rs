use std::path::PathBuf;

/// File read from `<container_root>/<name>/` to find a wrapper's base image.
pub const DEFAULT_DESCRIPTOR_NAME: &str = "Dockerfile";

/// Knobs for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Root holding one build directory per generated container wrapper.
    pub container_root: PathBuf,
    pub descriptor_name: String,
    /// Classify the executables of a directory on the rayon pool.
    pub parallel: bool,
}

impl ScanConfig {
    pub fn new(container_root: impl Into<PathBuf>) -> Self {
        Self {
            container_root: container_root.into(),
            descriptor_name: DEFAULT_DESCRIPTOR_NAME.to_string(),
            parallel: true,
        }
    }

    /// Descriptor for the wrapper named `name`.
    pub fn descriptor_path(&self, name: &str) -> PathBuf {
        self.container_root.join(name).join(&self.descriptor_name)
    }
}

impl Default for ScanConfig {
    /// `$HOME/.local/share/pathlens/containers`, or the same path relative to
    /// the working directory when `HOME` is unset.
    fn default() -> Self {
        let base = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_default();
        Self::new(base.join(".local/share/pathlens/containers"))
    }
}
