// src/utils/constants.rs

/// Word cap for organisation names and address lines.
pub const MAX_ORG_NAME_WORDS: usize = 16;

/// Word cap for each person name part (last, maiden, first, middle).
pub const MAX_PERSON_NAME_WORDS: usize = 5;

/// Name type labels are cut to this many characters.
pub const MAX_NAME_TYPE_CHARS: usize = 25;

/// Records between progress log lines during the mapping pass.
pub const PROGRESS_INTERVAL: u64 = 10_000;

/// Examples retained per statistics entry.
pub const MAX_STAT_EXAMPLES: usize = 5;

/// Seed for example sampling so the sidecar is reproducible run to run.
pub const STAT_SAMPLING_SEED: u64 = 0x646a_6d61;

/// Separator used inside composite keys.
pub const COMPOSITE_KEY_DELIMITER: &str = "|";
