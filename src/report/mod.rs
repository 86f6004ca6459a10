// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Report export: one CSV row or JSON entry per (generator, algorithm) pair.
//!
//! The CSV layout and the JSON section names are consumed by the shop's
//! downstream tooling (dashboards and log scrapers), so they are part of
//! the external interface and kept stable — including the `arduino_*`
//! naming for the simulated board.

use crate::budget::BoardProfile;
use crate::monitor::{PairKey, PairMetrics, PerformanceMonitor, Violation};
use crate::weights::TargetSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Stable CSV column order.
const CSV_HEADER: &str = "combination,generator,algorithm,success_rate,avg_error,max_error,\
                          avg_time_ms,max_time_ms,p95_time_ms,memory_peak_kb,timeout_count,\
                          stack_overflow_count,arduino_compatible,total_tests";

/// Report export failure.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report")]
    Serialize(#[from] serde_json::Error),
}

/// Exported figures for one (generator, algorithm) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairReport {
    pub combination: String,
    pub generator: String,
    pub algorithm: String,
    pub success_rate: f64,
    pub avg_error: f64,
    pub max_error: u32,
    pub avg_time_ms: f64,
    pub max_time_ms: u64,
    pub p95_time_ms: u64,
    pub memory_peak_kb: f64,
    pub timeout_count: u64,
    pub stack_overflow_count: u64,
    pub arduino_compatible: bool,
    pub total_tests: u64,
}

impl PairReport {
    /// Flatten one pair's aggregates into exportable figures.
    pub fn new(key: &PairKey, metrics: &PairMetrics, profile: &BoardProfile) -> Self {
        let (generator, algorithm) = key;
        let times = metrics.time_stats();
        Self {
            combination: format!("{}_{}", generator.id(), algorithm.id()),
            generator: generator.id().to_string(),
            algorithm: algorithm.id().to_string(),
            success_rate: metrics.success_rate(),
            avg_error: metrics.avg_error(),
            max_error: metrics.max_error(),
            avg_time_ms: times.mean,
            max_time_ms: times.max,
            p95_time_ms: times.p95,
            memory_peak_kb: metrics.memory_peak_kb(),
            timeout_count: metrics.violations().get(Violation::Timeout),
            stack_overflow_count: metrics.violations().get(Violation::StackOverflow),
            arduino_compatible: metrics.board_compatible(profile),
            total_tests: metrics.trials(),
        }
    }

    /// One CSV row in header order.
    fn csv_row(&self) -> String {
        format!(
            "{},{},{},{:.4},{:.2},{},{:.2},{},{},{:.2},{},{},{},{}",
            self.combination,
            self.generator,
            self.algorithm,
            self.success_rate,
            self.avg_error,
            self.max_error,
            self.avg_time_ms,
            self.max_time_ms,
            self.p95_time_ms,
            self.memory_peak_kb,
            self.timeout_count,
            self.stack_overflow_count,
            self.arduino_compatible,
            self.total_tests,
        )
    }
}

/// Run parameters echoed into the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConfig {
    pub run_size: String,
    pub trials_per_pair: u64,
    pub base_seed: u64,
    pub items_per_trial: usize,
    pub target: TargetSpec,
}

/// Whole-run rollup for the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSummary {
    pub total_pairs: usize,
    pub total_trials: u64,
    pub overall_success_rate: f64,
    pub best_combination: Option<String>,
}

/// The complete JSON report document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub test_config: TestConfig,
    pub test_summary: TestSummary,
    pub combination_results: BTreeMap<String, PairReport>,
    pub arduino_specs: BoardProfile,
}

impl JsonReport {
    /// Assemble the report document from a finished run.
    pub fn build(monitor: &PerformanceMonitor, test_config: TestConfig) -> Self {
        let profile = monitor.profile();
        let combination_results: BTreeMap<String, PairReport> = monitor
            .pairs()
            .map(|(key, metrics)| {
                let report = PairReport::new(key, metrics, profile);
                (report.combination.clone(), report)
            })
            .collect();

        let total_trials = monitor.total_trials();
        let successes: f64 = monitor
            .pairs()
            .map(|(_, m)| m.success_rate() * m.trials() as f64)
            .sum();
        let rankings = monitor.rankings();

        Self {
            test_config,
            test_summary: TestSummary {
                total_pairs: combination_results.len(),
                total_trials,
                overall_success_rate: if total_trials == 0 {
                    0.0
                } else {
                    successes / total_trials as f64
                },
                best_combination: rankings
                    .first()
                    .map(|((g, a), _)| format!("{}_{}", g.id(), a.id())),
            },
            combination_results,
            arduino_specs: monitor.profile().clone(),
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Render the CSV report, ranked best pair first.
pub fn csv_string(monitor: &PerformanceMonitor) -> String {
    let profile = monitor.profile();
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for (key, metrics) in monitor.rankings() {
        let row = PairReport::new(&key, metrics, profile).csv_row();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}", row);
    }
    out
}

/// Write the CSV report to a file.
pub fn write_csv(monitor: &PerformanceMonitor, path: &Path) -> Result<(), ReportError> {
    fs::write(path, csv_string(monitor)).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
