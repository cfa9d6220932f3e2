use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gopack")]
#[command(version)]
#[command(about = "Build a program and pack it with its assets into an archive")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the build script and archive the results
    Pack(PackArgs),
}

#[derive(Args, Debug, Default)]
pub struct PackArgs {
    /// Pack configuration file
    #[arg(long = "config", default_value = "gopack.yml")]
    pub config: PathBuf,
    /// Target operating system (GOOS); defaults to the host
    #[arg(long = "os")]
    pub os: Option<String>,
    /// Target architecture (GOARCH); defaults to the host
    #[arg(long = "arch")]
    pub arch: Option<String>,
    /// Destination archive path (.zip, .tar, .tgz or .tar.gz)
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,
    /// Alias substituted for the leading `go` of each build command
    #[arg(long = "gom")]
    pub gom: Option<String>,
    /// Skip the build script
    #[arg(long = "nobuild")]
    pub nobuild: bool,
    /// Extra file appended after discovered files (repeatable)
    #[arg(long = "add", value_name = "PATH")]
    pub add: Vec<String>,
    /// Delete build outputs after archiving
    #[arg(long = "rm")]
    pub rm: bool,
    /// Maximum traversal depth below each include root
    #[arg(long = "depth")]
    pub depth: Option<usize>,
    /// Only log warnings and errors
    #[arg(long = "quiet", conflicts_with = "debug")]
    pub quiet: bool,
    /// Enable debug logging
    #[arg(long = "debug")]
    pub debug: bool,
}
