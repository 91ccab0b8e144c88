//! Tracing subscriber setup driven by the `logging` config section.
//!
//! Every key other than `default` names a subsystem: a target prefix such as
//! `rentals` or `sqlx`. Records from a subsystem use that section's levels
//! and file; everything else falls through to `default`. Console output is
//! human readable, file output is JSON lines written through a size-rotated
//! writer.

use std::{
    collections::HashMap,
    io::{self, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use tracing::{level_filters::LevelFilter, Level, Metadata};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use crate::config::{LoggingConfig, Section};
use crate::paths::resolve_under;

const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" | "" => None,
        _ => Some(Level::INFO),
    }
}

/// True if `target` is `prefix` or lives under `prefix::`.
fn matches_prefix(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Per-record level decision: the first matching subsystem decides, else
/// the default level applies.
#[derive(Clone, Debug, Default)]
struct LevelMap {
    subsystems: Vec<(String, Option<Level>)>,
    default: Option<Level>,
}

impl LevelMap {
    fn level_for(&self, target: &str) -> Option<Level> {
        self.subsystems
            .iter()
            .find(|(prefix, _)| matches_prefix(target, prefix))
            .map_or(self.default, |(_, lvl)| *lvl)
    }

    fn enabled(&self, meta: &Metadata<'_>) -> bool {
        self.level_for(meta.target())
            .is_some_and(|max| meta.level() <= &max)
    }
}

// -------- rotating writer for files --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendCount>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log writer poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log writer poisoned"))?
            .flush()
    }
}

fn open_rotating_writer(path: &Path, section: &Section) -> io::Result<RotWriter> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let rot = FileRotate::new(
        path,
        AppendCount::new(section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

/// Writes that have no file for their target are dropped.
struct NullOr(Option<RotWriter>);

impl Write for NullOr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Routes each record to its subsystem's file, or the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotWriter>,
    by_prefix: Vec<(String, RotWriter)>,
}

impl FileRouter {
    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }

    fn resolve(&self, target: &str) -> Option<RotWriter> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_prefix(target, prefix))
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = NullOr;

    fn make_writer(&'a self) -> Self::Writer {
        NullOr(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        NullOr(self.resolve(meta.target()))
    }
}

// -------- plan --------

/// Everything derived from the config before any global state is touched.
struct Plan {
    console_targets: Targets,
    console_default: LevelMap,
    file_levels: LevelMap,
    files: FileRouter,
}

fn build_plan(cfg: &LoggingConfig, base_dir: &Path) -> Plan {
    let default_section = cfg.get("default");
    // Longest prefix first so `rentals::api` wins over `rentals`.
    let mut subsystems: Vec<(&String, &Section)> =
        cfg.iter().filter(|(k, _)| k.as_str() != "default").collect();
    subsystems.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

    let mut console_targets = Targets::new().with_default(LevelFilter::OFF);
    for (name, section) in &subsystems {
        let level = parse_tracing_level(&section.console_level)
            .map_or(LevelFilter::OFF, LevelFilter::from_level);
        console_targets = console_targets.with_target(name.as_str(), level);
    }

    // Default console layer covers only targets outside every subsystem.
    let console_default = LevelMap {
        subsystems: subsystems.iter().map(|(n, _)| ((*n).clone(), None)).collect(),
        default: default_section.and_then(|s| parse_tracing_level(&s.console_level)),
    };

    let mut files = FileRouter::default();
    let mut file_subsystems = Vec::new();
    for (name, section) in &subsystems {
        let writer = open_section_file(name, section, base_dir);
        let level = writer
            .as_ref()
            .and_then(|_| parse_tracing_level(&section.file_level));
        // A subsystem without its own file still shares the default file.
        match writer {
            Some(w) => {
                files.by_prefix.push(((*name).clone(), w));
                file_subsystems.push(((*name).clone(), level));
            }
            None => file_subsystems.push((
                (*name).clone(),
                default_section.and_then(|s| parse_tracing_level(&s.file_level)),
            )),
        }
    }
    files.default = default_section.and_then(|s| open_section_file("default", s, base_dir));
    let file_levels = LevelMap {
        subsystems: file_subsystems,
        default: files
            .default
            .as_ref()
            .and(default_section)
            .and_then(|s| parse_tracing_level(&s.file_level)),
    };

    Plan {
        console_targets,
        console_default,
        file_levels,
        files,
    }
}

fn open_section_file(name: &str, section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }
    let path = resolve_under(base_dir, &section.file);
    match open_rotating_writer(&path, section) {
        Ok(w) => Some(w),
        Err(e) => {
            // The subscriber is not installed yet.
            eprintln!(
                "Failed to init log file for '{}': {} ({})",
                name,
                path.display(),
                e
            );
            None
        }
    }
}

// -------- public init --------

/// Install the global subscriber.
/// - `cfg`: the `logging` section
/// - `base_dir`: resolves relative log file paths (usually `server.home_dir`)
///
/// Calling it twice is harmless; the second install is ignored.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` before installing the subscriber.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let plan = build_plan(cfg, base_dir);
    let ansi = atty::is(atty::Stream::Stdout);

    let console_explicit = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(plan.console_targets);

    let console_default = plan.console_default.default.map(|_| {
        let levels = plan.console_default.clone();
        fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(FilterFn::new(move |meta| levels.enabled(meta)))
    });

    let file_layer = (!plan.files.is_empty()).then(|| {
        let levels = plan.file_levels.clone();
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_current_span(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(plan.files)
            .with_filter(FilterFn::new(move |meta| levels.enabled(meta)))
    });

    let _ = Registry::default()
        .with(console_explicit)
        .with(console_default)
        .with(file_layer)
        .try_init();
}

fn init_default_logging() {
    let _ = fmt()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

/// Resolved file sinks, for diagnostics (`--print-config` and tests).
pub fn planned_log_files(cfg: &LoggingConfig, base_dir: &Path) -> HashMap<String, std::path::PathBuf> {
    cfg.iter()
        .filter(|(_, s)| !s.file.trim().is_empty())
        .map(|(k, s)| (k.clone(), resolve_under(base_dir, &s.file)))
        .collect()
}
