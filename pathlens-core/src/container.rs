use crate::{BaseImage, ScanConfig};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How much of a wrapper is examined for the generated-wrapper pattern.
pub const WRAPPER_WINDOW: u64 = 512;

/// Written at the top of every wrapper we generate.
pub const WRAPPER_MARKER: &str = "# Auto-generated wrapper";

/// Any of these next to the container root marks a hand-written wrapper.
pub const RUN_INVOCATIONS: &[&str] = &["docker run", "podman run"];

/// Tried in order against the first `FROM` line of the descriptor.
pub const BASE_IMAGE_MARKERS: &[(&str, BaseImage)] = &[
    ("kali", BaseImage::Kali),
    ("debian", BaseImage::Debian),
    ("alpine", BaseImage::Alpine),
    ("ubuntu", BaseImage::Ubuntu),
    ("python", BaseImage::Python),
    ("node", BaseImage::Node),
    ("go", BaseImage::Go),
    ("rust", BaseImage::Rust),
];

/// True if `head` looks like a container launcher for images built under
/// `config.container_root`.
pub fn is_wrapper(head: &str, config: &ScanConfig) -> bool {
    if head.contains(WRAPPER_MARKER) {
        return true;
    }
    let root = config.container_root.to_string_lossy();
    !root.is_empty()
        && head.contains(&*root)
        && RUN_INVOCATIONS.iter().any(|r| head.contains(r))
}

/// Base image named on the first `FROM` line. Later `FROM` lines of a
/// multi-stage build are never consulted.
pub fn base_image_from_descriptor(descriptor: &str) -> Option<BaseImage> {
    let from = descriptor
        .lines()
        .find(|line| line.trim_start().starts_with("FROM"))?
        .to_lowercase();
    BASE_IMAGE_MARKERS
        .iter()
        .find(|(needle, _)| from.contains(needle))
        .map(|(_, image)| *image)
}

/// Reads the descriptor for wrapper `name`. A missing or unreadable
/// descriptor means no base image, not an error.
pub fn resolve_base_image(name: &str, config: &ScanConfig) -> Option<BaseImage> {
    let path = config.descriptor_path(name);
    match std::fs::read_to_string(&path) {
        Ok(text) => base_image_from_descriptor(&text),
        Err(e) => {
            log::debug!("{}: no container descriptor: {e}", path.display());
            None
        }
    }
}

/// Checks the file at `original_path` (before any symlink resolution by the
/// caller) for the wrapper pattern.
///
/// Outer `None`: not a wrapper. Inner `None`: a wrapper whose base image
/// could not be determined.
pub fn detect_container<P: AsRef<Path>>(
    original_path: P,
    config: &ScanConfig,
) -> Option<Option<BaseImage>> {
    let path = original_path.as_ref();
    let mut buf = Vec::with_capacity(WRAPPER_WINDOW as usize);
    if let Err(e) = File::open(path).and_then(|f| f.take(WRAPPER_WINDOW).read_to_end(&mut buf)) {
        log::trace!("{}: unreadable for wrapper check: {e}", path.display());
        return None;
    }

    let head = String::from_utf8_lossy(&buf);
    if !is_wrapper(&head, config) {
        return None;
    }

    let name = path.file_name()?.to_string_lossy();
    Some(resolve_base_image(&name, config))
}
