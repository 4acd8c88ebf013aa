// src/models/stats_models.rs
use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::utils::constants::{MAX_STAT_EXAMPLES, STAT_SAMPLING_SEED};

/// Stat categories written to the statistics sidecar.
pub mod category {
    pub const ENTITY_TYPE: &str = "ENTITY_TYPE";
    pub const NAME_TYPE: &str = "NAME_TYPE";
    pub const TRUNCATIONS: &str = "TRUNCATIONS";
    pub const DOB_DATA: &str = "DOB_DATA";
    pub const ATTRIBUTE: &str = "ATTRIBUTE";
    pub const ADDRESS: &str = "ADDRESS";
    pub const COUNTRIES: &str = "COUNTRIES";
    pub const ID_TYPE: &str = "ID_TYPE";
    pub const UNKNOWN: &str = "UNKNOWN";
    pub const DESCRIPTIONS: &str = "DESCRIPTIONS";
    pub const OTHER: &str = "OTHER";
    pub const RELATIONSHIPS: &str = "RELATIONSHIPS";
    pub const GROUP_ASSOCIATION: &str = "GROUP_ASSOCIATION";
    pub const UNMAPPED: &str = "UNMAPPED";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatEntry {
    pub count: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Per category / sub-category counters with a bounded sample of examples.
#[derive(Debug, Clone)]
pub struct StatPack {
    categories: BTreeMap<String, BTreeMap<String, StatEntry>>,
    rng: StdRng,
}

impl Default for StatPack {
    fn default() -> Self {
        Self::with_seed(STAT_SAMPLING_SEED)
    }
}

impl StatPack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            categories: BTreeMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn record(&mut self, category: &str, sub_category: &str) {
        self.entry(category, sub_category).count += 1;
    }

    /// Counts the event and keeps `example` if it is new. Once the sample is
    /// full a novel example overwrites one of the later slots at random, so
    /// the first two examples seen are always retained.
    pub fn record_example(&mut self, category: &str, sub_category: &str, example: &str) {
        let slot = self.rng.gen_range(2..MAX_STAT_EXAMPLES);
        let entry = self.entry(category, sub_category);
        entry.count += 1;
        if example.is_empty() || entry.examples.iter().any(|e| e == example) {
            return;
        }
        if entry.examples.len() < MAX_STAT_EXAMPLES {
            entry.examples.push(example.to_string());
        } else {
            entry.examples[slot] = example.to_string();
        }
    }

    pub fn get(&self, category: &str, sub_category: &str) -> Option<&StatEntry> {
        self.categories
            .get(category)
            .and_then(|subs| subs.get(sub_category))
    }

    pub fn count(&self, category: &str, sub_category: &str) -> u64 {
        self.get(category, sub_category).map_or(0, |e| e.count)
    }

    pub fn categories(&self) -> &BTreeMap<String, BTreeMap<String, StatEntry>> {
        &self.categories
    }

    fn entry(&mut self, category: &str, sub_category: &str) -> &mut StatEntry {
        self.categories
            .entry(category.to_string())
            .or_default()
            .entry(sub_category.to_string())
            .or_default()
    }
}

/// Outcome of the mapping pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunOutcome {
    Completed,
    Aborted,
    WriteFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub run_id: String,
    pub data_source: String,
    pub input_file: String,
    pub output_file: String,
    pub started_at: String,
    pub records_written: u64,
    pub persons: u64,
    pub entities: u64,
    pub elapsed_secs: f64,
    pub outcome: RunOutcome,
}

/// Statistics sidecar layout: the `RUN` block followed by every category.
#[derive(Serialize)]
pub struct StatsReport<'a> {
    #[serde(rename = "RUN")]
    pub run: &'a RunStats,
    #[serde(flatten)]
    pub categories: &'a BTreeMap<String, BTreeMap<String, StatEntry>>,
}
