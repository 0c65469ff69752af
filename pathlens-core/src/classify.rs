use crate::binary::{detect_language, is_macho_magic};
use crate::container::detect_container;
use crate::script::detect_script;
use crate::{Candidate, Classification, ScanConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Follows `path` through at most one symlink. Relative targets are taken
/// relative to the link's own directory. Anything that is not a readable
/// symlink resolves to itself.
pub fn resolve_symlink(path: &Path) -> PathBuf {
    let is_link = fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return path.to_path_buf();
    }

    match fs::read_link(path) {
        Ok(target) if target.is_absolute() => target,
        Ok(target) => path
            .parent()
            .map(|dir| dir.join(&target))
            .unwrap_or(target),
        Err(e) => {
            log::debug!("{}: unreadable symlink: {e}", path.display());
            path.to_path_buf()
        }
    }
}

impl Candidate {
    pub fn new(directory: &Path, name: &str) -> Self {
        let original_path = directory.join(name);
        Self {
            name: name.to_string(),
            directory: directory.to_path_buf(),
            resolved_path: resolve_symlink(&original_path),
            original_path,
        }
    }

    pub fn classify(&self, config: &ScanConfig) -> Classification {
        classify_resolved(&self.original_path, &self.resolved_path, config)
    }
}

/// Classifies the executable at `original_path`, following one symlink.
pub fn classify(original_path: &Path, config: &ScanConfig) -> Classification {
    let resolved = resolve_symlink(original_path);
    classify_resolved(original_path, &resolved, config)
}

/// Runs the detectors in fixed precedence: container wrapper (on the
/// original path), Mach-O header, raw Mach-O magic, shebang, then the
/// unknown-binary fallback.
pub fn classify_resolved(original: &Path, resolved: &Path, config: &ScanConfig) -> Classification {
    let classification = if let Some(image) = detect_container(original, config) {
        Classification::Container(image)
    } else if let Some(lang) = detect_language(resolved) {
        Classification::Binary(Some(lang))
    } else if is_macho_magic(resolved) {
        Classification::Binary(None)
    } else if let Some(lang) = detect_script(resolved) {
        Classification::Script(lang)
    } else {
        Classification::Binary(None)
    };

    log::debug!("{} => {classification}", original.display());
    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::testing::{fat, thin, Command};
    use crate::{BaseImage, BinaryLanguage, ScriptLanguage};

    fn setup() -> (tempfile::TempDir, ScanConfig) {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ScanConfig::new(dir.path().join("containers"));
        (dir, cfg)
    }

    #[test]
    fn script_with_python_shebang() {
        let (dir, cfg) = setup();
        let path = dir.path().join("tool");
        fs::write(&path, "#!/usr/bin/env python3\nimport sys\n").unwrap();
        assert_eq!(
            classify(&path, &cfg),
            Classification::Script(Some(ScriptLanguage::Python))
        );
    }

    #[test]
    fn empty_file_is_unknown_binary() {
        let (dir, cfg) = setup();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();
        assert_eq!(classify(&path, &cfg), Classification::Binary(None));
    }

    #[test]
    fn missing_file_is_unknown_binary() {
        let (dir, cfg) = setup();
        assert_eq!(
            classify(&dir.path().join("ghost"), &cfg),
            Classification::Binary(None)
        );
    }

    #[test]
    fn fat_swift_binary() {
        let (dir, cfg) = setup();
        let path = dir.path().join("swifty");
        let slice = thin(&[Command::Segment(vec!["__swift5_proto"])], false);
        fs::write(&path, fat(&slice, 0x1000, 1)).unwrap();
        assert_eq!(
            classify(&path, &cfg),
            Classification::Binary(Some(BinaryLanguage::Swift))
        );
    }

    #[test]
    fn malformed_macho_is_unknown_binary() {
        let (dir, cfg) = setup();
        let path = dir.path().join("broken");
        fs::write(&path, [0xcf, 0xfa, 0xed, 0xfe, 0x07]).unwrap();
        assert_eq!(classify(&path, &cfg), Classification::Binary(None));
    }

    #[test]
    fn container_beats_script() {
        let (dir, cfg) = setup();
        let descriptor = cfg.descriptor_path("scan");
        fs::create_dir_all(descriptor.parent().unwrap()).unwrap();
        fs::write(&descriptor, "FROM kalilinux/kali-rolling\n").unwrap();
        let path = dir.path().join("scan");
        fs::write(&path, "#!/bin/bash\n# Auto-generated wrapper\n").unwrap();
        assert_eq!(
            classify(&path, &cfg),
            Classification::Container(Some(BaseImage::Kali))
        );
    }

    #[test]
    fn non_utf8_text_falls_back_to_binary() {
        let (dir, cfg) = setup();
        let path = dir.path().join("blob");
        fs::write(&path, [0x23, 0x21, 0xff, 0xfe, 0x0a]).unwrap();
        assert_eq!(classify(&path, &cfg), Classification::Binary(None));
    }

    #[test]
    fn shebang_over_binary_payload_is_a_binary() {
        let (dir, cfg) = setup();
        let path = dir.path().join("installer");
        let mut body = b"#!/bin/sh\n".to_vec();
        body.extend_from_slice(&[0x7f, 0xff, 0xfe, 0x00, 0x80]);
        fs::write(&path, body).unwrap();
        assert_eq!(classify(&path, &cfg), Classification::Binary(None));
    }

    #[test]
    fn classification_is_idempotent() {
        let (dir, cfg) = setup();
        let path = dir.path().join("again");
        fs::write(&path, thin(&[Command::Segment(vec!["__objc_data"])], true)).unwrap();
        let first = classify(&path, &cfg);
        assert_eq!(first, classify(&path, &cfg));
        assert_eq!(first, Classification::Binary(Some(BinaryLanguage::ObjectiveC)));
    }

    #[cfg(unix)]
    #[test]
    fn relative_symlink_resolves_against_link_dir() {
        let (dir, _) = setup();
        let real_dir = dir.path().join("libexec");
        let bin_dir = dir.path().join("bin");
        fs::create_dir_all(&real_dir).unwrap();
        fs::create_dir_all(&bin_dir).unwrap();
        fs::write(real_dir.join("real"), "#!/bin/zsh\n").unwrap();
        std::os::unix::fs::symlink("../libexec/real", bin_dir.join("link")).unwrap();

        let cand = Candidate::new(&bin_dir, "link");
        assert_eq!(cand.resolved_path, bin_dir.join("../libexec/real"));
        assert_eq!(cand.original_path, bin_dir.join("link"));
        assert_eq!(
            cand.classify(&ScanConfig::new(dir.path().join("containers"))),
            Classification::Script(Some(ScriptLanguage::Zsh))
        );
    }

    #[cfg(unix)]
    #[test]
    fn only_one_symlink_level_is_followed() {
        let (dir, _) = setup();
        let target = dir.path().join("target");
        fs::write(&target, "#!/bin/sh\n").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("hop1")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("hop1"), dir.path().join("hop2")).unwrap();

        assert_eq!(resolve_symlink(&dir.path().join("hop2")), dir.path().join("hop1"));
        assert_eq!(resolve_symlink(&target), target);
    }

    #[cfg(unix)]
    #[test]
    fn container_check_uses_link_name() {
        let (dir, cfg) = setup();
        let descriptor = cfg.descriptor_path("alias");
        fs::create_dir_all(descriptor.parent().unwrap()).unwrap();
        fs::write(&descriptor, "FROM alpine:3.20\n").unwrap();
        let real = dir.path().join("real-wrapper");
        fs::write(&real, "# Auto-generated wrapper\n").unwrap();
        let link = dir.path().join("alias");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        assert_eq!(
            classify(&link, &cfg),
            Classification::Container(Some(BaseImage::Alpine))
        );
    }
}
