// src/utils/progress_bars/logging.rs - Logging helpers for the two mapping passes
use log::{error, info, warn};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::stats_models::{RunOutcome, RunStats};
use crate::reference::ReferenceTables;
use crate::utils::get_memory_usage;

#[derive(Clone)]
pub struct RunLogger {
    data_source: String,
    start_time: Instant,
}

impl RunLogger {
    pub fn new(data_source: &str) -> Self {
        Self {
            data_source: data_source.to_string(),
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, run_id: &str, input: &str, output: &str) {
        info!("🚀 ===== DOW JONES MAPPER STARTING =====");
        info!("📅 Run ID: {}", run_id);
        info!("[{}] 📥 Reading from: {}", self.data_source, input);
        info!("[{}] 📤 Writing to: {}", self.data_source, output);
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        let msg = if let Some(details) = details {
            format!(
                "[{}] 🔄 Phase: {} - {} [+{:.1}s]",
                self.data_source, phase, details, elapsed.as_secs_f32()
            )
        } else {
            format!(
                "[{}] 🔄 Phase: {} [+{:.1}s]",
                self.data_source, phase, elapsed.as_secs_f32()
            )
        };
        info!("{}", msg);
    }

    pub fn log_tables_loaded(&self, tables: &ReferenceTables) {
        info!(
            "[{}] 📊 Code tables: {} countries, {} description codes, {} references, {} relation types",
            self.data_source,
            tables.countries.len(),
            tables.description1.len() + tables.description2.len() + tables.description3.len(),
            tables.references.len(),
            tables.relation_types.len()
        );
        info!(
            "[{}] 🔗 {} relationship edges, {} organisations indexed",
            self.data_source,
            tables.edge_count(),
            tables.org_index.len()
        );
    }

    pub fn log_progress(&self, records: u64, show_memory: bool) {
        if show_memory {
            info!(
                "[{}] 📦 {} rows processed (memory: {} MB)",
                self.data_source,
                records,
                get_memory_usage()
            );
        } else {
            info!("[{}] 📦 {} rows processed", self.data_source, records);
        }
    }

    pub fn log_write_failure(&self, output: &str, err: &dyn std::fmt::Display) {
        error!(
            "[{}] ❌ Could not write to {}: {}",
            self.data_source, output, err
        );
    }

    pub fn log_completion(&self, stats: &RunStats, phase_times: &HashMap<&'static str, Duration>) {
        info!("=== Pipeline Summary ===");
        info!("Run ID: {}", stats.run_id);
        for phase in ["code_tables", "reference_pass", "mapping_pass"] {
            if let Some(duration) = phase_times.get(phase) {
                info!("  {}: {:.2?}", phase, duration);
            }
        }
        info!(
            "{} rows processed: {} persons, {} entities",
            stats.records_written, stats.persons, stats.entities
        );
        let minutes = self.start_time.elapsed().as_secs_f64() / 60.0;
        match stats.outcome {
            RunOutcome::Completed => {
                info!("🎉 Process completed successfully in {:.1} minutes!", minutes)
            }
            RunOutcome::Aborted => warn!("⏹️  Process aborted after {:.1} minutes!", minutes),
            RunOutcome::WriteFailed => error!(
                "❌ Process stopped after a write failure at {:.1} minutes",
                minutes
            ),
        }
    }

    pub fn get_elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
