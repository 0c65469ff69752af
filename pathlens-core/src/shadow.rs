use crate::{Classification, ShadowEntry};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Folds executables into a name → owning directory map.
///
/// Must be fed in search order: directories in PATH order, names within a
/// directory in canonical order. The first directory to present a name owns
/// it; every later copy is shadowed by that directory.
#[derive(Debug, Default)]
pub struct ShadowResolver {
    owners: HashMap<String, PathBuf>,
}

impl ShadowResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(
        &mut self,
        name: &str,
        directory: &Path,
        classification: Classification,
    ) -> ShadowEntry {
        let (owner, is_shadowed) = match self.owners.entry(name.to_string()) {
            Entry::Occupied(e) => (e.get().clone(), true),
            Entry::Vacant(e) => (e.insert(directory.to_path_buf()).clone(), false),
        };
        if is_shadowed {
            log::debug!(
                "{name} in {} is shadowed by {}",
                directory.display(),
                owner.display()
            );
        }

        ShadowEntry {
            name: name.to_string(),
            directory: directory.to_path_buf(),
            shadowing_directory: is_shadowed.then(|| owner.clone()),
            first_directory: owner,
            classification,
            is_shadowed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryLanguage;

    const BIN: Classification = Classification::Binary(Some(BinaryLanguage::C));

    #[test]
    fn first_directory_owns_the_name() {
        let mut resolver = ShadowResolver::new();
        let a = resolver.observe("tool", Path::new("/a"), BIN);
        let b = resolver.observe("tool", Path::new("/b"), Classification::Binary(None));

        assert!(!a.is_shadowed);
        assert_eq!(a.first_directory, Path::new("/a"));
        assert_eq!(a.shadowing_directory, None);

        assert!(b.is_shadowed);
        assert_eq!(b.directory, Path::new("/b"));
        assert_eq!(b.first_directory, Path::new("/a"));
        assert_eq!(b.shadowing_directory.as_deref(), Some(Path::new("/a")));
        // shadowed copies keep their own classification
        assert_eq!(b.classification, Classification::Binary(None));
    }

    #[test]
    fn names_compare_exactly() {
        let mut resolver = ShadowResolver::new();
        resolver.observe("Tool", Path::new("/a"), BIN);
        assert!(!resolver.observe("tool", Path::new("/b"), BIN).is_shadowed);
    }

    #[test]
    fn directory_spelling_is_not_normalized() {
        let mut resolver = ShadowResolver::new();
        resolver.observe("tool", Path::new("/usr/bin"), BIN);
        let again = resolver.observe("tool", Path::new("/usr/../usr/bin"), BIN);
        assert!(again.is_shadowed);
        assert_eq!(again.first_directory.as_os_str(), "/usr/bin");
    }

    #[test]
    fn owner_keeps_its_spelling() {
        let mut resolver = ShadowResolver::new();
        resolver.observe("tool", Path::new("/opt/bin/"), BIN);
        let again = resolver.observe("tool", Path::new("/opt/bin"), BIN);
        assert!(again.is_shadowed);
        assert_eq!(again.first_directory.as_os_str(), "/opt/bin/");
    }

    #[test]
    fn third_copy_points_at_the_first() {
        let mut resolver = ShadowResolver::new();
        resolver.observe("tool", Path::new("/a"), BIN);
        resolver.observe("tool", Path::new("/b"), BIN);
        let c = resolver.observe("tool", Path::new("/c"), BIN);
        assert_eq!(c.shadowing_directory.as_deref(), Some(Path::new("/a")));
    }
}
