//! The pack pipeline: build → discover → dedup → archive → cleanup.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::archive::{self, ArchiveWriter, Format};
use crate::build::{BuildRunner, CommandRunner};
use crate::config::PackConfig;
use crate::pattern;
use crate::walk;

/// Run one pack invocation end to end.
///
/// Configuration problems (bad pattern, unsupported suffix) fail before any
/// side effect; a failing build step aborts before discovery; an archive
/// I/O error aborts the pipeline and leaves the partial output file in
/// place. Cleanup is best effort and never fails the run.
pub fn run(cfg: &PackConfig, runner: &dyn CommandRunner) -> Result<()> {
    debug!("os: {}, arch: {}", cfg.goos, cfg.goarch);

    // Reject an unsupported output suffix before the build runs.
    Format::from_path(&cfg.output)?;
    let excludes = pattern::compile_all(&cfg.excludes)?;
    // Include patterns are checked up front too; a bad one must fail
    // before the build, not during the walk.
    pattern::compile_all(&cfg.includes)?;

    if let Some(parent) = cfg.output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut files: Vec<PathBuf> = Vec::new();
    let mut build_outputs = cfg.outfiles.clone();

    if !cfg.nobuild {
        fs::create_dir_all(&cfg.target_dir)
            .with_context(|| format!("failed to create {}", cfg.target_dir.display()))?;
        let build = BuildRunner::new(runner, &cfg.goos, &cfg.goarch, cfg.gom.as_deref());
        build.run_script(&cfg.script)?;
        if build_outputs.is_empty() {
            build_outputs.push(program_name()?);
        }
    }
    if cfg.goos == "windows" {
        for name in &mut build_outputs {
            name.push_str(".exe");
        }
    }
    if !cfg.nobuild {
        files.extend(build_outputs.iter().map(PathBuf::from));
    }

    for root in &cfg.includes {
        let found = walk::walk(Path::new(root), cfg.depth, &excludes)?;
        files.extend(found);
    }
    files.extend(cfg.add.iter().map(PathBuf::from));

    let mut writer = ArchiveWriter::create(&cfg.output)?;
    let mut seen: HashSet<String> = HashSet::with_capacity(files.len());
    for file in &files {
        let Some(name) = archive::sanitize_entry_name(file) else {
            debug!("skip: `{}` has no archivable name", file.display());
            continue;
        };
        // First occurrence wins; later duplicates are silently dropped.
        if !seen.insert(name) {
            continue;
        }
        info!("add: {}", file.display());
        writer.add(file)?;
    }
    writer.finish()?;
    info!("archive written to {}", cfg.output.display());

    if cfg.rm {
        for name in &build_outputs {
            if let Err(err) = fs::remove_file(name) {
                debug!("cleanup: failed to remove {name}: {err}");
            }
        }
    }
    Ok(())
}

/// Default build output name when `settings.outfiles` is empty: the base
/// name of the invoking directory.
fn program_name() -> Result<String> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    Ok(cwd
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "program".to_string()))
}
