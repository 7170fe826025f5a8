//! Config and log locations, and the log file setup.

use std::fs;
use std::fs::File;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};

const LATEST_LOG: &str = "latest.log";

/// Archived runs kept next to `latest.log`.
const KEPT_ARCHIVES: usize = 10;

/// `config.json` in the platform config directory
/// (`~/.config/helpdesk` on Linux).
pub fn config_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "helpdesk", "helpdesk").map(|dirs| dirs.config_dir().join("config.json"))
}

/// The platform cache directory (`~/.cache/helpdesk` on Linux).
fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "helpdesk", "helpdesk").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Sends log records to a fresh `latest.log`.
///
/// The previous run's log is archived under its start time first. Logging
/// stays off when the directory is unavailable.
pub fn init_logging(level: LevelFilter) {
    if level == LevelFilter::Off {
        return;
    }
    let Some(dir) = log_dir() else { return };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    // a failed archive only costs the previous log
    let _ = archive_latest(&dir);
    let _ = prune_archives(&dir, KEPT_ARCHIVES);

    if let Ok(file) = File::create(dir.join(LATEST_LOG)) {
        let _ = WriteLogger::init(level, LogConfig::default(), file);
    }
}

/// Renames `latest.log` to `<timestamp>.log`.
fn archive_latest(dir: &Path) -> io::Result<()> {
    let latest = dir.join(LATEST_LOG);
    if !latest.exists() {
        return Ok(());
    }
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S%.3f");
    fs::rename(latest, dir.join(format!("{stamp}.log")))
}

/// Deletes all but the newest `keep` archives; returns how many went.
///
/// Archive names are timestamps, so name order is age order.
fn prune_archives(dir: &Path, keep: usize) -> io::Result<usize> {
    let mut archives: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "log")
                && path.file_name().is_some_and(|name| name != LATEST_LOG)
        })
        .collect();
    archives.sort();

    let excess = archives.len().saturating_sub(keep);
    for path in &archives[..excess] {
        fs::remove_file(path)?;
    }
    Ok(excess)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("helpdesk-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_prune_keeps_newest_archives() {
        let dir = scratch("prune");
        for stamp in ["20240101_080000.000", "20240102_080000.000", "20240103_080000.000"] {
            fs::write(dir.join(format!("{stamp}.log")), "").unwrap();
        }
        fs::write(dir.join(LATEST_LOG), "").unwrap();
        fs::write(dir.join("config.json"), "{}").unwrap();

        assert_eq!(prune_archives(&dir, 2).unwrap(), 1);
        assert!(!dir.join("20240101_080000.000.log").exists());
        assert!(dir.join("20240103_080000.000.log").exists());
        assert!(dir.join(LATEST_LOG).exists());
        assert!(dir.join("config.json").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_archive_moves_latest_aside() {
        let dir = scratch("archive");
        archive_latest(&dir).unwrap();

        fs::write(dir.join(LATEST_LOG), "previous run").unwrap();
        archive_latest(&dir).unwrap();
        assert!(!dir.join(LATEST_LOG).exists());
        let archived: Vec<_> = fs::read_dir(&dir).unwrap().filter_map(Result::ok).collect();
        assert_eq!(archived.len(), 1);
        assert_eq!(fs::read_to_string(archived[0].path()).unwrap(), "previous run");

        fs::remove_dir_all(&dir).unwrap();
    }
}
