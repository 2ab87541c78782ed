//! Workflow-suite launch and suite-source pinning.
//!
//! The rose-stem suite carries a hardcoded source location in
//! `rose-suite.conf`; until cylc can be told where the working copy
//! lives, that line has to be rewritten for every fresh clone. The
//! rewrite follows the same single-line surgery discipline as the
//! dependency manifest writer.

use std::fs;
use std::path::Path;

use chrono::Local;
use log::*;

use crate::error::NightjarError;
use crate::exec;

/// Suite directory inside a working copy.
pub const SUITE_DIR: &str = "rose-stem";

const SUITE_CONF: &str = "rose-suite.conf";

/// Point the suite's `<REPO>_SOURCE` setting at the merged working copy.
///
/// Only the first matching line changes; a conf file without one is left
/// unchanged (logged, since that usually means a misnamed repository).
pub fn pin_source_location(
    repo: &str,
    loc: &Path,
) -> Result<(), NightjarError> {
    let conf_path = loc.join(SUITE_DIR).join(SUITE_CONF);
    let content = fs::read_to_string(&conf_path)?;
    let needle = format!("{}_SOURCE", repo.to_uppercase());

    let mut pinned = false;
    let mut updated = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if !pinned && trimmed.starts_with(&needle) {
            if let Some((key, _)) = trimmed.split_once(':') {
                updated.push_str(&format!("{key}:{}\"\n", loc.display()));
                pinned = true;
                continue;
            }
        }
        updated.push_str(line);
    }

    if !pinned {
        warn!(
            "no {needle} line found in {}: leaving suite conf unchanged",
            conf_path.display()
        );
    }

    fs::write(&conf_path, updated)?;
    Ok(())
}

/// Launch the rose-stem suite for a merged working copy, named for the
/// repository and today's date.
pub fn launch(
    repo: &str,
    groups: &str,
    loc: &Path,
) -> Result<(), NightjarError> {
    let date = Local::now().format("%Y-%m-%d");
    let run_name = format!("gh_{repo}_{date}");
    let group_opt = format!("g={groups}");
    let suite_path = loc.join(SUITE_DIR).display().to_string();

    info!("launching suite {run_name}");
    exec::run_checked(
        "cylc",
        &[
            "vip",
            "-n",
            &run_name,
            "-z",
            &group_opt,
            "-S",
            "USE_HEADS=true",
            &suite_path,
        ],
        None,
    )?;

    Ok(())
}
