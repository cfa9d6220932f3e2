//! Declarative pack configuration: YAML file plus CLI overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::PackArgs;
use crate::platform;

/// Traversal depth used when neither file nor flags set one.
pub const DEFAULT_DEPTH: usize = 3;

/// Raw shape of `gopack.yml`. Every field is optional; unrecognized keys
/// are a configuration error.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackFile {
    pub os: Option<String>,
    pub arch: Option<String>,
    pub output: Option<String>,
    pub gom: Option<String>,
    pub nobuild: Option<bool>,
    pub add: Vec<String>,
    pub rm: Option<bool>,
    pub depth: Option<usize>,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub script: Vec<String>,
    pub settings: Settings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Settings {
    pub target_dir: Option<String>,
    pub outfiles: Vec<String>,
    /// Placeholder for build options; recognized but currently unused.
    pub build: Option<String>,
}

/// Fully resolved configuration for one pack invocation. Built once at
/// startup, immutable afterwards.
#[derive(Debug)]
pub struct PackConfig {
    pub goos: String,
    pub goarch: String,
    pub output: PathBuf,
    pub gom: Option<String>,
    pub nobuild: bool,
    pub add: Vec<String>,
    pub rm: bool,
    pub depth: usize,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub script: Vec<String>,
    pub target_dir: PathBuf,
    pub outfiles: Vec<String>,
}

impl PackConfig {
    /// Merge the config file with CLI overrides. Flags win field-by-field;
    /// `--add` paths append after the file's own.
    pub fn resolve(file: PackFile, args: &PackArgs) -> Result<PackConfig> {
        let output = args
            .output
            .clone()
            .or(file.output)
            .map(Ok)
            .unwrap_or_else(default_output)?;
        let mut add = file.add;
        add.extend(args.add.iter().cloned());
        Ok(PackConfig {
            goos: args
                .os
                .clone()
                .or(file.os)
                .unwrap_or_else(|| platform::host_goos().to_string()),
            goarch: args
                .arch
                .clone()
                .or(file.arch)
                .unwrap_or_else(|| platform::host_goarch().to_string()),
            output: PathBuf::from(output),
            gom: args.gom.clone().or(file.gom),
            nobuild: args.nobuild || file.nobuild.unwrap_or(false),
            add,
            rm: args.rm || file.rm.unwrap_or(false),
            depth: args.depth.or(file.depth).unwrap_or(DEFAULT_DEPTH),
            includes: file.includes,
            excludes: file.excludes,
            script: file.script,
            target_dir: PathBuf::from(file.settings.target_dir.unwrap_or_else(|| ".".into())),
            outfiles: file.settings.outfiles,
        })
    }
}

/// Load the config file; a missing file yields the defaults so the CLI
/// flags alone are enough to run.
pub fn load(path: &Path) -> Result<PackFile> {
    if !path.exists() {
        return Ok(PackFile::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let file: PackFile = serde_yaml_bw::from_str(&raw)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    Ok(file)
}

fn default_output() -> Result<String> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let name = cwd
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pack".to_string());
    Ok(format!("{name}.zip"))
}
