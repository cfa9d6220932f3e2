//! Host platform detection in Go toolchain vocabulary.
//!
//! Build scripts receive `GOOS`/`GOARCH`, so the defaults for `--os` and
//! `--arch` use the Go names rather than Rust's `std::env::consts` names.

/// The host operating system as a GOOS value.
pub fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// The host architecture as a GOARCH value.
pub fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        other => other,
    }
}
