//! Dispensary Tool Status
//!
//! Runtime status information about the service, plus the usage guide.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::settings::CatalogStore;

/// Allotment calculation instructions for AI assistants
pub const ALLOTMENT_INSTRUCTIONS: &str = r#"
# Dispensary Tool Instructions

## Calculating an Allotment

Call `calculate_allotment` with the patient's remaining allotment in **ounces**,
exactly as read from the state registry (e.g. `"2.5"`).

- `disabled_products`: names of products the patient does not want, or that are
  out of stock. Everything else may be picked.
- The allotment is converted to grams as `oz × 28.34952 − 0.04`, rounded to one
  decimal. The 0.04 g offset matches the dispensary scales.
- Products are picked heaviest first. After every pick the search starts again
  from the heaviest product, so heavier products are always used up first.
- Products with the same weight are picked in catalog order.
- The response `table` is the counter display; `Remaining:` is the part of the
  allotment no enabled product fits into.

Negative, non-numeric, or oversized (above 1000 oz) allotments are rejected with
"The value ... was out of bounds."

## Editing the Catalog

- `get_catalog`: products with weights in grams and their pick priority
- `update_product_weights`: `{ "Ground Flower": 7.0, ... }`; unknown names and
  non-positive weights are skipped and listed in `skipped`
- `add_product` / `remove_product`: change the product list
- `reset_catalog`: restore the five default products

All edits are saved to the settings file immediately.

## Converting Weights

`convert_weight` takes a weight and its unit (`g`/`gram`, `oz`/`ounce`) and returns
the other unit. Unknown units are returned unchanged.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct DispensaryStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Settings information
    pub settings_path: String,
    pub settings_size_bytes: Option<u64>,
    pub product_count: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks service uptime and reports status against the live catalog
pub struct StatusTracker {
    start_time: Instant,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Get the current status
    pub fn get_status(&self, catalog: &CatalogStore) -> DispensaryStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        DispensaryStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            settings_path: catalog.path().display().to_string(),
            settings_size_bytes: catalog.file_size(),
            product_count: catalog.snapshot().len(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
