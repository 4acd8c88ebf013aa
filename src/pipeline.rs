// src/pipeline.rs
//
// Two-pass driver: code tables and the reference pass first, then one JSON
// line per Person/Entity profile in document order.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::code_tables::IsoCodes;
use crate::config::RunConfig;
use crate::errors::MapperResult;
use crate::mapping::RecordMapper;
use crate::models::{RecordType, RunOutcome, RunStats, StatPack, StatsReport};
use crate::reference::ReferenceBuilder;
use crate::utils::progress_bars::logging::RunLogger;
use crate::utils::progress_bars::progress_config::ProgressConfig;
use crate::xml::ElementStream;

/// Elements the mapping pass turns into records.
pub const PROFILE_TARGETS: [&str; 2] = ["Person", "Entity"];

/// Counters for one mapping pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassCounts {
    pub records_written: u64,
    pub persons: u64,
    pub entities: u64,
    pub outcome: RunOutcome,
}

impl Default for PassCounts {
    fn default() -> Self {
        Self {
            records_written: 0,
            persons: 0,
            entities: 0,
            outcome: RunOutcome::Completed,
        }
    }
}

/// Result of a whole run: the summary block plus the collected statistics.
#[derive(Debug)]
pub struct RunSummary {
    pub stats: RunStats,
    pub stat_pack: StatPack,
}

/// Interrupt handler body. Only raises the flag; the mapping pass finishes
/// the record in hand, flushes and reports `Aborted`. Repeated interrupts
/// change nothing.
pub fn request_shutdown(shutdown: &AtomicBool) {
    if shutdown.swap(true, Ordering::SeqCst) {
        warn!("Shutdown already requested, waiting for the current record to finish");
    } else {
        warn!("Interrupt received, finishing the current record...");
    }
}

/// Streams every profile through `mapper` into `writer`.
///
/// A failed write stops the pass with `WriteFailed`; lines already written
/// stay in place. The shutdown flag is checked after each record.
#[allow(clippy::too_many_arguments)]
pub fn map_records<R: BufRead, W: Write>(
    records: ElementStream<R>,
    mapper: &RecordMapper<'_>,
    writer: &mut W,
    stat_pack: &mut StatPack,
    shutdown: &AtomicBool,
    logger: &RunLogger,
    progress: &ProgressConfig,
    output_label: &str,
) -> MapperResult<PassCounts> {
    let mut counts = PassCounts::default();
    let spinner = progress.create_spinner("mapping profiles");

    for profile in records {
        let profile = profile?;
        let Some(hint) = RecordType::from_element(&profile.name) else {
            debug!("Skipping unexpected <{}>", profile.name);
            continue;
        };

        let record = mapper.map(&profile, hint, stat_pack);
        let written = record
            .to_json_line()
            .map_err(std::io::Error::from)
            .and_then(|line| writeln!(writer, "{}", line));
        if let Err(e) = written {
            logger.log_write_failure(output_label, &e);
            counts.outcome = RunOutcome::WriteFailed;
            break;
        }

        counts.records_written += 1;
        match hint {
            RecordType::Person => counts.persons += 1,
            _ => counts.entities += 1,
        }
        if let Some(pb) = &spinner {
            pb.inc(1);
        }
        if progress.is_milestone(counts.records_written) {
            logger.log_progress(counts.records_written, progress.should_show_memory());
        }

        if shutdown.load(Ordering::SeqCst) {
            counts.outcome = RunOutcome::Aborted;
            break;
        }
    }

    if let Err(e) = writer.flush() {
        logger.log_write_failure(output_label, &e);
        counts.outcome = RunOutcome::WriteFailed;
    }
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    Ok(counts)
}

/// Runs both passes for `config`. Precondition failures (assets, input,
/// output creation, malformed XML) come back as errors; write failures and
/// interrupts are reported through the summary's outcome.
pub fn run(config: &RunConfig, shutdown: Arc<AtomicBool>) -> Result<RunSummary> {
    let run_id = Uuid::new_v4().to_string();
    let started_at = Utc::now().to_rfc3339();
    let data_source = config.data_source.as_str();
    let input_label = config.input_file.display().to_string();
    let output_label = config.output_file.display().to_string();

    let logger = RunLogger::new(data_source);
    let progress = ProgressConfig::from_env();
    let mut phase_times: HashMap<&'static str, Duration> = HashMap::new();
    logger.log_start(&run_id, &input_label, &output_label);

    logger.log_phase("code_tables", Some("loading ISO country and state tables"));
    let phase_start = Instant::now();
    let iso = IsoCodes::load(&config.assets_dir, config.iso_country_size)
        .context("Failed to load code table assets")?;
    phase_times.insert("code_tables", phase_start.elapsed());

    logger.log_phase("reference_pass", Some("collecting code lists and relationships"));
    let phase_start = Instant::now();
    let refs = ReferenceBuilder::build(&config.input_file)
        .with_context(|| format!("Reference pass over {} failed", input_label))?;
    phase_times.insert("reference_pass", phase_start.elapsed());
    logger.log_tables_loaded(&refs);

    logger.log_phase("mapping_pass", Some("writing JSON lines"));
    let phase_start = Instant::now();
    let output = File::create(&config.output_file)
        .with_context(|| format!("Could not create output file {}", output_label))?;
    let mut writer = BufWriter::new(output);
    let records = ElementStream::open(&config.input_file, &PROFILE_TARGETS)
        .with_context(|| format!("Could not reopen {}", input_label))?;

    let mapper = RecordMapper::new(&iso, &refs, data_source, config.no_relationships);
    let mut stat_pack = StatPack::new();
    let counts = map_records(
        records,
        &mapper,
        &mut writer,
        &mut stat_pack,
        &shutdown,
        &logger,
        &progress,
        &output_label,
    )
    .with_context(|| format!("Mapping pass over {} failed", input_label))?;
    drop(writer);
    phase_times.insert("mapping_pass", phase_start.elapsed());

    let stats = RunStats {
        run_id,
        data_source: data_source.to_string(),
        input_file: input_label,
        output_file: output_label,
        started_at,
        records_written: counts.records_written,
        persons: counts.persons,
        entities: counts.entities,
        elapsed_secs: logger.get_elapsed().as_secs_f64(),
        outcome: counts.outcome,
    };

    if let Some(log_file) = &config.log_file {
        write_stats(log_file, &stats, &stat_pack)?;
        info!("Statistics written to {}", log_file.display());
    }

    logger.log_completion(&stats, &phase_times);
    Ok(RunSummary { stats, stat_pack })
}

/// Pretty-printed statistics sidecar: the `RUN` block then every category.
pub fn write_stats(path: &Path, stats: &RunStats, stat_pack: &StatPack) -> Result<()> {
    let report = StatsReport {
        run: stats,
        categories: stat_pack.categories(),
    };
    let file = File::create(path)
        .with_context(|| format!("Could not create statistics file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).context("Failed to serialise statistics")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceTables;
    use std::io;

    const DOC: &str = r#"<PFA><Records>
        <Person id="1"><NameDetails><Name NameType="Primary Name"><NameValue><Surname>ONE</Surname></NameValue></Name></NameDetails></Person>
        <Entity id="2"><NameDetails><Name NameType="Primary Name"><NameValue><EntityName>TWO</EntityName></NameValue></Name></NameDetails></Entity>
        <Person id="3"/>
    </Records></PFA>"#;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn quiet() -> ProgressConfig {
        ProgressConfig {
            enabled: false,
            ..Default::default()
        }
    }

    fn pass<W: Write>(writer: &mut W, shutdown: bool) -> PassCounts {
        let iso = IsoCodes::default();
        let refs = ReferenceTables::default();
        let mapper = RecordMapper::new(&iso, &refs, "DJ-PFA", false);
        let records = ElementStream::from_reader(DOC.as_bytes(), &PROFILE_TARGETS);
        map_records(
            records,
            &mapper,
            writer,
            &mut StatPack::new(),
            &AtomicBool::new(shutdown),
            &RunLogger::new("DJ-PFA"),
            &quiet(),
            "memory",
        )
        .unwrap()
    }

    #[test]
    fn test_writes_one_line_per_profile_in_order() {
        let mut out = Vec::new();
        let counts = pass(&mut out, false);
        assert_eq!(counts.records_written, 3);
        assert_eq!(counts.persons, 2);
        assert_eq!(counts.entities, 1);
        assert_eq!(counts.outcome, RunOutcome::Completed);

        let text = String::from_utf8(out).unwrap();
        let ids: Vec<String> = text
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["RECORD_ID"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_shutdown_flag_aborts_after_current_record() {
        let mut out = Vec::new();
        let counts = pass(&mut out, true);
        assert_eq!(counts.outcome, RunOutcome::Aborted);
        assert_eq!(counts.records_written, 1);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_repeated_interrupts_still_end_cleanly() {
        let shutdown = AtomicBool::new(false);
        request_shutdown(&shutdown);
        request_shutdown(&shutdown);
        assert!(shutdown.load(Ordering::SeqCst));

        let mut out = Vec::new();
        let counts = pass(&mut out, shutdown.load(Ordering::SeqCst));
        assert_eq!(counts.outcome, RunOutcome::Aborted);
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        for line in text.lines() {
            serde_json::from_str::<serde_json::Value>(line).unwrap();
        }
    }

    #[test]
    fn test_write_failure_stops_the_pass() {
        let counts = pass(&mut FailingWriter, false);
        assert_eq!(counts.outcome, RunOutcome::WriteFailed);
        assert_eq!(counts.records_written, 0);
    }
}
