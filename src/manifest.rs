//! Dependency manifest parsing and format-preserving rewrites.
//!
//! The manifest (`dependencies.yaml`) maps dependency names to a source
//! URL and a pinned ref. Reads go through a structured deserializer;
//! writes deliberately do not. A full YAML round-trip would drop comments
//! and reflow formatting, and the manifests are hand-curated, so updates
//! patch a single scalar by line-anchored search instead: exactly one
//! line changes, every other byte survives.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::*;
use serde::Deserialize;

use crate::error::NightjarError;

/// Manifest filename expected inside a working copy.
pub const MANIFEST_FILE: &str = "dependencies.yaml";

/// One named dependency's manifest record. Unknown nested keys are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DependencyEntry {
    /// Upstream clone URL, when the dependency is externally hosted.
    pub source: Option<String>,
    /// Pinned ref: branch name, tag, or full commit hash.
    #[serde(rename = "ref")]
    pub reference: Option<String>,
}

/// Ordered dependency mapping, in on-disk key order.
pub type Manifest = IndexMap<String, DependencyEntry>;

/// Parse the manifest at `path`.
pub fn load(path: &Path) -> Result<Manifest, NightjarError> {
    let content = fs::read_to_string(path)
        .map_err(|err| NightjarError::manifest(path, err))?;

    serde_yaml::from_str(&content)
        .map_err(|err| NightjarError::manifest(path, err))
}

/// Rewrite the pinned ref of a single dependency in place.
///
/// Scans for a line opening the dependency's section (`<name>:` at the
/// start of a line), then patches the first following line containing
/// `ref:`: the text up to the first `:` is kept as the key part and the
/// value part becomes `new_ref`. Scanning stops at the first match, so at
/// most one line changes and every other line is written back verbatim.
///
/// A dependency that never appears, or that has no `ref:` line after it,
/// leaves the file unchanged. That silence is compatible behavior for
/// hand-edited manifests, but it can mask a typo'd name, so it is logged.
pub fn write_new_ref(
    path: &Path,
    dependency: &str,
    new_ref: &str,
) -> Result<(), NightjarError> {
    info!("writing ref for {dependency}");

    let content = fs::read_to_string(path)
        .map_err(|err| NightjarError::manifest(path, err))?;

    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let section_start = format!("{dependency}:");

    let mut in_section = false;
    let mut replacement: Option<(usize, String)> = None;

    for (i, line) in lines.iter().enumerate() {
        if line.starts_with(&section_start) {
            in_section = true;
        }
        if in_section && line.contains("ref:") {
            if let Some((key, _)) = line.split_once(':') {
                replacement = Some((i, format!("{key}: {new_ref}\n")));
            }
            break;
        }
    }

    if replacement.is_none() {
        warn!(
            "no ref line found for '{dependency}' in {}: leaving manifest \
             unchanged",
            path.display()
        );
    }

    let mut updated = String::with_capacity(content.len());
    for (i, line) in lines.iter().enumerate() {
        match &replacement {
            Some((target, new_line)) if *target == i => {
                updated.push_str(new_line)
            }
            _ => updated.push_str(line),
        }
    }

    fs::write(path, updated)
        .map_err(|err| NightjarError::manifest(path, err))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# model dependencies, curated by hand
casim:
  source: git@example.com:org/casim.git
  ref: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa

shumlib:
  source: git@example.com:org/shumlib.git
  ref: release-2.3
jules:
  source: ''
  ref: bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb
";

    fn manifest_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf)
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_entries_in_file_order() {
        let (_dir, path) = manifest_file(SAMPLE);
        let manifest = load(&path).unwrap();

        let names: Vec<&String> = manifest.keys().collect();
        assert_eq!(names, ["casim", "shumlib", "jules"]);

        let casim = &manifest["casim"];
        assert_eq!(
            casim.source.as_deref(),
            Some("git@example.com:org/casim.git")
        );
        assert_eq!(
            casim.reference.as_deref(),
            Some("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
        );
    }

    #[test]
    fn missing_manifest_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join(MANIFEST_FILE));
        assert!(matches!(
            result,
            Err(NightjarError::ManifestParse { .. })
        ));
    }

    #[test]
    fn malformed_manifest_is_a_parse_error() {
        let (_dir, path) = manifest_file("casim: [not: a, mapping");
        assert!(matches!(
            load(&path),
            Err(NightjarError::ManifestParse { .. })
        ));
    }

    /// The rewrite touches exactly one line; comments, blank lines, and
    /// other sections are byte-identical.
    #[test]
    fn rewrites_only_the_target_ref_line() {
        let (_dir, path) = manifest_file(SAMPLE);
        let new_ref = "cccccccccccccccccccccccccccccccccccccccc";

        write_new_ref(&path, "shumlib", new_ref).unwrap();

        let updated = fs::read_to_string(&path).unwrap();
        let expected = SAMPLE.replace(
            "  ref: release-2.3",
            "  ref: cccccccccccccccccccccccccccccccccccccccc",
        );
        assert_eq!(updated, expected);
        assert_eq!(updated.lines().count(), SAMPLE.lines().count());
    }

    #[test]
    fn rewrites_only_the_first_ref_line_of_the_section() {
        let (_dir, path) = manifest_file(SAMPLE);
        let new_ref = "dddddddddddddddddddddddddddddddddddddddd";

        write_new_ref(&path, "casim", new_ref).unwrap();

        let updated = fs::read_to_string(&path).unwrap();
        assert!(updated.contains(&format!("  ref: {new_ref}\n")));
        // later sections untouched
        assert!(updated.contains("  ref: release-2.3\n"));
        assert!(updated
            .contains("  ref: bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb\n"));
    }

    #[test]
    fn unknown_dependency_is_a_noop() {
        let (_dir, path) = manifest_file(SAMPLE);

        write_new_ref(
            &path,
            "socrates",
            "eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
    }

    #[test]
    fn section_without_ref_line_is_a_noop() {
        let content = "\
casim:
  source: git@example.com:org/casim.git
";
        let (_dir, path) = manifest_file(content);

        write_new_ref(
            &path,
            "casim",
            "ffffffffffffffffffffffffffffffffffffffff",
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn ignores_extra_nested_keys() {
        let content = "\
casim:
  source: git@example.com:org/casim.git
  ref: trunk
  notes: pinned until the migration lands
";
        let (_dir, path) = manifest_file(content);
        let manifest = load(&path).unwrap();
        assert_eq!(manifest["casim"].reference.as_deref(), Some("trunk"));
    }
}
