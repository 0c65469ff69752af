//! The scan pipeline.
//!
//! Two stages per directory: classification of every executable, fanned out
//! on the rayon pool, then a sequential shadow fold. The stages meet at a
//! sort into canonical name order, so the fold sees the same sequence no
//! matter how the fan-out was scheduled. Directories themselves are always
//! visited one after another in PATH order.

use crate::path_dirs::{canonical_order, list_executables};
use crate::{
    Candidate, Classification, DirectoryRecord, DirectoryScan, ScanConfig, ScanReport,
    ShadowResolver,
};
use rayon::prelude::*;
use std::path::Path;

/// Classifies `names` in `dir` and returns them in canonical order.
pub fn classify_directory(
    dir: &Path,
    names: &[String],
    config: &ScanConfig,
) -> Vec<(String, Classification)> {
    let candidates: Vec<Candidate> = names.iter().map(|n| Candidate::new(dir, n)).collect();

    let mut classified: Vec<(String, Classification)> = if config.parallel {
        candidates
            .par_iter()
            .map(|c| (c.name.clone(), c.classify(config)))
            .collect()
    } else {
        candidates
            .iter()
            .map(|c| (c.name.clone(), c.classify(config)))
            .collect()
    };

    classified.sort_by(|(a, _), (b, _)| canonical_order(a, b));
    classified
}

/// Scans `records` in order. Duplicate and missing directories are reported
/// but contribute no executables.
pub fn scan(records: Vec<DirectoryRecord>, config: &ScanConfig) -> ScanReport {
    let mut resolver = ShadowResolver::new();
    let mut directories = Vec::with_capacity(records.len());

    for mut record in records {
        if record.duplicate || !record.exists {
            log::debug!(
                "{}: skipped (duplicate: {}, exists: {})",
                record.directory.display(),
                record.duplicate,
                record.exists
            );
            directories.push(DirectoryScan {
                record,
                entries: Vec::new(),
            });
            continue;
        }

        record.executable_names = list_executables(&record.directory);
        let classified = classify_directory(&record.directory, &record.executable_names, config);
        let entries: Vec<_> = classified
            .into_iter()
            .map(|(name, c)| resolver.observe(&name, &record.directory, c))
            .collect();

        log::info!(
            "{}: {} executables, {} shadowed",
            record.directory.display(),
            entries.len(),
            entries.iter().filter(|e| e.is_shadowed).count()
        );
        directories.push(DirectoryScan { record, entries });
    }

    ScanReport { directories }
}
