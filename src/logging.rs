//! File logging. The terminal belongs to the TUI, so nothing goes to stdout.
//!
//! Filter priority: `REVDIFF_LOG` > `RUST_LOG` > `warn,revdiff=info`.
//! Default file: `<data_local_dir>/revdiff/logs/revdiff-<pid>.log`.

use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "warn,revdiff=info";

/// Keeps the background writer alive; dropping it flushes the log.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

pub fn init(log_file: Option<PathBuf>) -> Result<LogGuard> {
    let (dir, filename) = resolve_log_path(log_file);
    std::fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::never(&dir, &filename);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    Registry::default()
        .with(create_filter())
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;

    Ok(LogGuard {
        _file_guard: guard,
        log_file: dir.join(filename),
    })
}

fn create_filter() -> EnvFilter {
    if let Ok(level) = env::var("REVDIFF_LOG") {
        return expand_level(&level);
    }
    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }
    EnvFilter::new(DEFAULT_FILTER)
}

/// `REVDIFF_LOG=debug` scopes the level to this crate; directive syntax is
/// passed through untouched.
fn expand_level(value: &str) -> EnvFilter {
    EnvFilter::new(expand_directives(value))
}

fn expand_directives(value: &str) -> String {
    if value.contains('=') || value.contains(',') {
        value.to_string()
    } else {
        format!("warn,revdiff={value}")
    }
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("revdiff-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir, name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("revdiff")
        .join("logs");
    (dir, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_is_scoped_to_crate() {
        assert_eq!(expand_directives("debug"), "warn,revdiff=debug");
        assert_eq!(expand_directives("revdiff=trace,git2=info"), "revdiff=trace,git2=info");
    }

    #[test]
    fn override_path_with_extension_is_a_file() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/logs/run.log")));
        assert_eq!(dir, PathBuf::from("/tmp/logs"));
        assert_eq!(name, "run.log");

        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/logs")));
        assert_eq!(dir, PathBuf::from("/tmp/logs"));
        assert!(name.starts_with("revdiff-"));

        let (dir, _) = resolve_log_path(Some(PathBuf::from("run.log")));
        assert_eq!(dir, PathBuf::from("."));
    }
}
