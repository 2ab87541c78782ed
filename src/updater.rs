//! Manifest-wide dependency update pass.
//!
//! Walks every manifest entry in on-disk order, resolves the latest
//! upstream hash for entries pinned to a full commit, and patches the
//! changed ones back into the file. Entries skipped by the eligibility
//! filter are a deliberate no-op; a resolution or rewrite failure aborts
//! the whole pass so the manifest is never left with some entries
//! silently un-updated because of an error.

use std::path::Path;

use log::*;
use regex::Regex;

use crate::error::NightjarError;
use crate::manifest::{self, DependencyEntry};
use crate::resolver::RefResolver;

/// Update every eligible entry of the manifest at `manifest_path` in
/// place.
///
/// Returns true when at least one entry's pinned ref actually changed.
pub fn update_dependencies(
    manifest_path: &Path,
    resolver: &dyn RefResolver,
) -> Result<bool, NightjarError> {
    let dependencies = manifest::load(manifest_path)?;
    let hash_re = Regex::new(r"^\s*[0-9a-f]{40}\s*$").unwrap();

    let mut changed = false;
    for (dependency, entry) in dependencies.iter() {
        let Some((source, current)) = eligible(entry, &hash_re) else {
            debug!("skipping {dependency}: not pinned to an upstream commit");
            continue;
        };

        let new_ref = resolver.latest_hash(dependency, source)?;
        if new_ref != current {
            manifest::write_new_ref(manifest_path, dependency, &new_ref)?;
            changed = true;
        }
    }

    Ok(changed)
}

/// An entry qualifies for hash resolution only when its source is a
/// non-empty git URL and its ref is already a full commit hash. Branch
/// names, tags, and empty values are curated by hand and never clobbered.
fn eligible<'e>(
    entry: &'e DependencyEntry,
    hash_re: &Regex,
) -> Option<(&'e str, &'e str)> {
    let source = entry.source.as_deref().filter(|s| !s.is_empty())?;
    let current = entry.reference.as_deref().filter(|r| !r.is_empty())?;

    if !source.contains(".git") || !hash_re.is_match(current) {
        return None;
    }

    Some((source, current))
}
