//! Lifecycle of transient match exports: unique naming, one-shot download,
//! and a periodic sweep of files nobody came back for.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

const EXPORT_PREFIX: &str = "matched_candidates";

/// Export file name unique per caller and second:
/// `matched_candidates_<title>_<session>_<YYYYmmdd_HHMMSS>.csv`.
pub fn export_file_name(job_title: &str, session_id: Uuid, now: DateTime<Utc>) -> String {
    format!(
        "{EXPORT_PREFIX}_{}_{}_{}.csv",
        sanitize_title(job_title),
        session_id.simple(),
        now.format("%Y%m%d_%H%M%S")
    )
}

fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(60)
        .collect();
    if cleaned.is_empty() {
        "job".to_string()
    } else {
        cleaned
    }
}

/// Resolves a stored export name inside `export_dir`, refusing anything that
/// is not a bare file name.
pub fn resolve_export_path(export_dir: &Path, file_name: &str) -> Option<PathBuf> {
    let candidate = Path::new(file_name);
    let is_bare = candidate.file_name().map(|n| n == candidate.as_os_str()) == Some(true);
    is_bare.then(|| export_dir.join(candidate))
}

/// Reads an export into memory and deletes it. A file can be taken once.
pub async fn take_export(path: &Path) -> std::io::Result<Vec<u8>> {
    let bytes = tokio::fs::read(path).await?;
    tokio::fs::remove_file(path).await?;
    Ok(bytes)
}

/// Deletes files in `dir` whose age is at least `max_age`. A missing
/// directory counts as nothing to sweep.
pub async fn sweep_stale_exports(dir: &Path, max_age: Duration) -> std::io::Result<usize> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let now = SystemTime::now();
    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();
        if age >= max_age {
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Could not remove stale export {}: {e}", entry.path().display()),
            }
        }
    }
    Ok(removed)
}

/// Spawns the background sweep that runs every `interval`.
pub fn spawn_export_sweeper(dir: PathBuf, max_age: Duration, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match sweep_stale_exports(&dir, max_age).await {
                Ok(0) => {}
                Ok(n) => info!("Removed {n} stale export(s) from {}", dir.display()),
                Err(e) => warn!("Export sweep of {} failed: {e}", dir.display()),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_export_file_name_includes_caller_and_timestamp() {
        let session = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let name = export_file_name("Senior Data Engineer", session, now);
        assert_eq!(
            name,
            format!(
                "matched_candidates_Senior_Data_Engineer_{}_20260304_050607.csv",
                session.simple()
            )
        );
    }

    #[test]
    fn test_concurrent_callers_never_share_a_file_name() {
        let now = Utc::now();
        let a = export_file_name("Analyst", Uuid::new_v4(), now);
        let b = export_file_name("Analyst", Uuid::new_v4(), now);
        assert_ne!(a, b);
    }

    #[test]
    fn test_title_is_sanitized() {
        let name = export_file_name("../../etc/passwd", Uuid::nil(), Utc::now());
        assert!(!name.contains('/'));
        assert!(resolve_export_path(Path::new("/exports"), &name).is_some());
    }

    #[test]
    fn test_resolve_rejects_paths() {
        let dir = Path::new("/exports");
        assert!(resolve_export_path(dir, "../secret.csv").is_none());
        assert!(resolve_export_path(dir, "nested/file.csv").is_none());
        assert_eq!(
            resolve_export_path(dir, "file.csv"),
            Some(PathBuf::from("/exports/file.csv"))
        );
    }

    #[tokio::test]
    async fn test_take_export_deletes_after_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        tokio::fs::write(&path, b"a,b\n").await.unwrap();

        let bytes = take_export(&path).await.unwrap();
        assert_eq!(bytes, b"a,b\n");
        assert!(!path.exists());
        assert!(take_export(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_sweep_removes_old_files_only() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("old.csv"), b"x").await.unwrap();

        let kept = sweep_stale_exports(dir.path(), Duration::from_secs(86_400))
            .await
            .unwrap();
        assert_eq!(kept, 0);
        assert!(dir.path().join("old.csv").exists());

        let removed = sweep_stale_exports(dir.path(), Duration::ZERO).await.unwrap();
        assert_eq!(removed, 1);
        assert!(!dir.path().join("old.csv").exists());
    }

    #[tokio::test]
    async fn test_sweep_of_missing_directory_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let removed = sweep_stale_exports(&dir.path().join("nope"), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }
}
