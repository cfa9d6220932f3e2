//! Format-polymorphic archive writing for `.zip`, `.tar` and `.tgz`/`.tar.gz`.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path};

use anyhow::{Context, Result, bail};
use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::warn;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Output format, selected once from the destination file's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Zip,
    Tar,
    TarGz,
}

impl Format {
    /// Infer the format from the output path. An unsupported suffix is a
    /// configuration error and must be reported before any file I/O.
    pub fn from_path(path: &Path) -> Result<Format> {
        let name = path.to_string_lossy();
        if name.ends_with(".zip") {
            Ok(Format::Zip)
        } else if name.ends_with(".tar") {
            Ok(Format::Tar)
        } else if name.ends_with(".tgz") || name.ends_with(".tar.gz") {
            Ok(Format::TarGz)
        } else {
            bail!(
                "unsupported archive suffix for `{}` (expected .zip, .tar, .tgz or .tar.gz)",
                path.display()
            )
        }
    }
}

/// An open archive bound to exactly one format.
///
/// Strictly sequential use: `add` entries one by one, then `finish` exactly
/// once. `finish` consumes the writer, so adding after close cannot compile.
/// On an I/O error the partially written output file is left in place; the
/// caller must treat the whole pack operation as failed and not ship it.
pub enum ArchiveWriter {
    Zip(Box<ZipWriter<File>>),
    Tar(tar::Builder<File>),
    TarGz(tar::Builder<GzEncoder<File>>),
}

impl ArchiveWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let format = Format::from_path(path)?;
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(match format {
            Format::Zip => ArchiveWriter::Zip(Box::new(ZipWriter::new(file))),
            Format::Tar => ArchiveWriter::Tar(tar::Builder::new(file)),
            Format::TarGz => ArchiveWriter::TarGz(tar::Builder::new(GzEncoder::new(
                file,
                Compression::default(),
            ))),
        })
    }

    /// Append one filesystem entry under its sanitized name, preserving the
    /// executable permission bits where the format supports them.
    pub fn add(&mut self, path: &Path) -> Result<()> {
        let Some(name) = sanitize_entry_name(path) else {
            warn!("skipping `{}`: empty name after sanitization", path.display());
            return Ok(());
        };
        let meta = fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?;
        match self {
            ArchiveWriter::Zip(zip) => {
                let opts = SimpleFileOptions::default().unix_permissions(unix_mode(&meta));
                if meta.is_dir() {
                    zip.add_directory(name, opts)
                        .with_context(|| format!("failed to add {} to zip", path.display()))?;
                } else {
                    zip.start_file(name, opts)
                        .with_context(|| format!("failed to add {} to zip", path.display()))?;
                    let mut file = File::open(path)
                        .with_context(|| format!("failed to open {}", path.display()))?;
                    io::copy(&mut file, zip.as_mut())
                        .with_context(|| format!("failed to write {} to zip", path.display()))?;
                }
            }
            ArchiveWriter::Tar(builder) => append_tar(builder, path, &name, &meta)?,
            ArchiveWriter::TarGz(builder) => append_tar(builder, path, &name, &meta)?,
        }
        Ok(())
    }

    /// Write the format trailer (zip central directory, tar end-of-archive
    /// padding, gzip footer) and release the output file handle.
    pub fn finish(self) -> Result<()> {
        match self {
            ArchiveWriter::Zip(zip) => {
                zip.finish().context("failed to finalize zip archive")?;
            }
            ArchiveWriter::Tar(builder) => {
                builder
                    .into_inner()
                    .context("failed to finalize tar archive")?;
            }
            ArchiveWriter::TarGz(builder) => {
                let encoder = builder
                    .into_inner()
                    .context("failed to finalize tar archive")?;
                encoder.finish().context("failed to finalize gzip stream")?;
            }
        }
        Ok(())
    }
}

fn append_tar<W: Write>(
    builder: &mut tar::Builder<W>,
    path: &Path,
    name: &str,
    meta: &fs::Metadata,
) -> Result<()> {
    if meta.is_dir() {
        builder.append_dir(name, path)
    } else {
        builder.append_path_with_name(path, name)
    }
    .with_context(|| format!("failed to add {} to tar archive", path.display()))
}

#[cfg(unix)]
fn unix_mode(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn unix_mode(meta: &fs::Metadata) -> u32 {
    if meta.is_dir() { 0o755 } else { 0o644 }
}

/// Normalize a filesystem path into a safe archive entry name.
///
/// Only normal path components survive: root prefixes, drive letters, `.`
/// and `..` segments are dropped so an extracted entry can never land
/// outside the extraction directory. Returns `None` when nothing is left.
pub fn sanitize_entry_name(path: &Path) -> Option<String> {
    let parts: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_selects_format() {
        assert_eq!(Format::from_path(Path::new("dist.zip")).unwrap(), Format::Zip);
        assert_eq!(Format::from_path(Path::new("dist.tar")).unwrap(), Format::Tar);
        assert_eq!(Format::from_path(Path::new("dist.tgz")).unwrap(), Format::TarGz);
        assert_eq!(
            Format::from_path(Path::new("out/dist.tar.gz")).unwrap(),
            Format::TarGz
        );
    }

    #[test]
    fn unsupported_suffix_is_an_error() {
        let err = Format::from_path(Path::new("dist.7z")).unwrap_err();
        assert!(err.to_string().contains("unsupported archive suffix"));
    }

    #[test]
    fn sanitize_strips_traversal_segments() {
        assert_eq!(
            sanitize_entry_name(Path::new("../../etc/passwd")).unwrap(),
            "etc/passwd"
        );
        assert_eq!(
            sanitize_entry_name(Path::new("/usr/bin/app")).unwrap(),
            "usr/bin/app"
        );
        assert_eq!(
            sanitize_entry_name(Path::new("./assets/./logo.png")).unwrap(),
            "assets/logo.png"
        );
    }

    #[test]
    fn sanitize_rejects_pathless_entries() {
        assert_eq!(sanitize_entry_name(Path::new("/")), None);
        assert_eq!(sanitize_entry_name(Path::new("..")), None);
    }

    #[test]
    fn sanitize_keeps_plain_relative_paths() {
        assert_eq!(
            sanitize_entry_name(Path::new("assets/img/icon.png")).unwrap(),
            "assets/img/icon.png"
        );
    }
}
