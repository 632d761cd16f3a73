//! Performance metrics and profiling utilities for `longpaths`.
//!
//! This module provides:
//! - [`PhaseTimer`] - A wrapper around `Instant` for timing scan phases
//! - [`rss_after_phase`] - Optional memory usage tracking using `sysinfo`,
//!   sampled at the end of every phase
//! - [`ProfileData`] - Structured data for performance metrics
//! - [`print_profile_summary`] - Terminal output for profiling results
//! - [`save_stats_json`] - JSON output for scripting integration
//!
//! # Usage
//!
//! ```rust
//! use longpaths::metrics::{PhaseTimer, ProfileData};
//!
//! let mut profile = ProfileData::new();
//! let timer = PhaseTimer::new("Enumerate");
//!
//! // ... do work ...
//!
//! profile.add_phase(timer.finish());
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sysinfo::System;

/// A timer for measuring the duration of a specific phase.
#[derive(Debug, Clone)]
pub struct PhaseTimer {
    /// The name of the phase being timed
    pub name: String,
    /// The start time of the phase
    pub start: Instant,
}

impl PhaseTimer {
    /// Creates a new timer and starts timing the specified phase.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    /// Finishes timing the phase and samples the process RSS.
    pub fn finish(self) -> PhaseResult {
        let duration = self.start.elapsed();
        PhaseResult {
            name: self.name,
            duration,
            rss_bytes: rss_after_phase(),
        }
    }
}

/// The result of a completed phase timing operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseResult {
    /// The name of the phase that was timed
    pub name: String,
    /// The duration of the phase
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Resident set size when the phase ended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rss_bytes: Option<u64>,
}

/// Serializes Duration as whole milliseconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Profiling data for a complete scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileData {
    /// Timing results for each phase of the scan
    pub phases: Vec<PhaseResult>,
    /// Largest RSS sampled across the phases, in bytes (if available)
    pub memory_peak: Option<u64>,
    /// Additional metadata about the scan
    pub metadata: BTreeMap<String, String>,
}

impl ProfileData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_phase(&mut self, phase: PhaseResult) {
        self.record_memory(phase.rss_bytes);
        self.phases.push(phase);
    }

    /// Keeps the largest RSS sample seen so far.
    pub fn record_memory(&mut self, bytes: Option<u64>) {
        if let Some(bytes) = bytes {
            self.memory_peak = Some(self.memory_peak.map_or(bytes, |peak| peak.max(bytes)));
        }
    }

    pub fn add_metadata(&mut self, key: &str, value: impl ToString) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Gets the total duration of all phases combined.
    pub fn total_duration(&self) -> Duration {
        self.phases.iter().map(|p| p.duration).sum()
    }
}

/// Measures the current process's RSS (Resident Set Size) in bytes.
///
/// Returns `None` when the platform does not expose per-process memory.
pub fn rss_after_phase() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    if !system.refresh_process(pid) {
        return None;
    }
    system.process(pid).map(|p| p.memory())
}

/// Prints a formatted profile summary to the terminal.
///
/// # Example Output
/// ```text
/// Scan phase timings
///   Enumerate        150 ms
///   Dispatch          42 ms
///   Aggregate          1 ms
/// Memory peak:      42.0 MB
/// ```
pub fn print_profile_summary(profile: &ProfileData) {
    println!("\nScan phase timings");

    for phase in &profile.phases {
        println!("  {:<15} {:>7} ms", phase.name, phase.duration.as_millis());
    }

    if let Some(memory_peak) = profile.memory_peak {
        let memory_mb = memory_peak as f64 / (1024.0 * 1024.0);
        println!("Memory peak:      {:.1} MB", memory_mb);
    }

    if !profile.metadata.is_empty() {
        println!("\nAdditional metrics:");
        for (key, value) in &profile.metadata {
            println!("  {:<15} {}", key, value);
        }
    }

    println!();
}

/// Saves profiling statistics as `stats.json` next to `output_path`.
///
/// Returns the path of the written file.
pub fn save_stats_json(output_path: &Path, profile: &ProfileData) -> Result<PathBuf> {
    let stats_path = output_path.with_file_name("stats.json");

    let stats = serde_json::json!({
        "scan_phases": profile.phases,
        "total_duration_ms": profile.total_duration().as_millis() as u64,
        "memory_peak_bytes": profile.memory_peak,
        "memory_peak_mb": profile.memory_peak.map(|b| b as f64 / (1024.0 * 1024.0)),
        "metadata": profile.metadata,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    std::fs::write(&stats_path, serde_json::to_string_pretty(&stats)?)
        .with_context(|| format!("Failed to write {}", stats_path.display()))?;

    Ok(stats_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_phase_timer() {
        let timer = PhaseTimer::new("test_phase");
        thread::sleep(Duration::from_millis(10));
        let result = timer.finish();

        assert_eq!(result.name, "test_phase");
        assert!(result.duration.as_millis() >= 10);
    }

    #[test]
    fn test_profile_data() {
        let mut profile = ProfileData::new();
        profile.add_phase(PhaseResult {
            name: "Enumerate".to_string(),
            duration: Duration::from_millis(100),
            rss_bytes: Some(4096),
        });
        profile.add_phase(PhaseResult {
            name: "Dispatch".to_string(),
            duration: Duration::from_millis(200),
            rss_bytes: Some(1024),
        });
        profile.add_metadata("entries", 1234);

        assert_eq!(profile.phases.len(), 2);
        assert_eq!(profile.total_duration(), Duration::from_millis(300));
        assert_eq!(profile.memory_peak, Some(4096));

        profile.record_memory(None);
        profile.record_memory(Some(8192));
        assert_eq!(profile.memory_peak, Some(8192));
        assert_eq!(profile.metadata.get("entries").map(String::as_str), Some("1234"));
    }

    #[test]
    fn test_memory_tracking() {
        // Not every sandbox exposes process memory
        if let Some(bytes) = rss_after_phase() {
            assert!(bytes > 0);
        }

        let mut profile = ProfileData::new();
        profile.add_phase(PhaseTimer::new("Enumerate").finish());
        assert_eq!(profile.memory_peak, profile.phases[0].rss_bytes);
    }

    #[test]
    fn test_stats_json_written_next_to_output() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let output = temp_dir.path().join("report.csv");
        let mut profile = ProfileData::new();
        profile.add_phase(PhaseResult {
            name: "Enumerate".to_string(),
            duration: Duration::from_millis(7),
            rss_bytes: None,
        });

        let written = save_stats_json(&output, &profile).unwrap();
        assert_eq!(written, temp_dir.path().join("stats.json"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&written).unwrap()).unwrap();
        assert_eq!(json["scan_phases"][0]["name"], "Enumerate");
        assert_eq!(json["scan_phases"][0]["duration"], 7);
        assert_eq!(json["total_duration_ms"], 7);
    }
}
