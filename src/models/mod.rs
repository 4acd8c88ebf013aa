// src/models/mod.rs
pub mod record;
pub mod stats_models;

pub use record::{AddressEntry, FeatureMap, NameEntry, NormalizedRecord, RecordType};
pub use stats_models::{category, RunOutcome, RunStats, StatPack, StatsReport};
