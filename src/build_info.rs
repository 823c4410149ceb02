//! Build information
//!
//! `build.rs` bumps a build counter and stamps the compile time into the
//! environment; both are read back here as constants for the status tool and
//! the startup banner.

use std::path::Path;

use serde::Serialize;

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build counter, 0 when built without `build.rs` output
pub const BUILD_NUMBER: u64 = match option_env!("DISPENSARY_BUILD_NUMBER") {
    Some(s) => parse_build_number(s),
    None => 0,
};

/// Compile time, ISO 8601
pub const BUILD_TIMESTAMP: &str = match option_env!("DISPENSARY_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// Decimal digits only; anything else (or overflow) yields 0
const fn parse_build_number(s: &str) -> u64 {
    let bytes = s.as_bytes();
    let mut n: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = match bytes[i] {
            b @ b'0'..=b'9' => (b - b'0') as u64,
            _ => return 0,
        };
        n = match n.checked_mul(10) {
            Some(v) => match v.checked_add(digit) {
                Some(v) => v,
                None => return 0,
            },
            None => return 0,
        };
        i += 1;
    }
    n
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }

    /// e.g. `v1.0.0 (build 12)`
    pub fn label(&self) -> String {
        format!("v{} (build {})", self.version, self.build_number)
    }
}

/// Print the startup banner to stderr, with the catalog the server will use
pub fn print_startup_banner(settings_path: &Path, product_count: usize) {
    let info = BuildInfo::current();
    eprintln!("===============================================");
    eprintln!("  Dispensary Tool {}", info.label());
    eprintln!("  Compiled: {}", info.build_timestamp);
    eprintln!("  Settings: {}", settings_path.display());
    eprintln!("  Catalog:  {} products", product_count);
    eprintln!("===============================================");
}
