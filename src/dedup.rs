//! Removal of candidates already stored in an archive.

use crate::error::RiddleError;
use crate::types::Candidate;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Lists the member names of the zip archive at `archive_path`.
pub fn archive_member_names(archive_path: &Path) -> Result<HashSet<String>, RiddleError> {
    let file = std::fs::File::open(archive_path)?;
    let archive = zip::ZipArchive::new(file)?;
    Ok(archive.file_names().map(str::to_string).collect())
}

/// Drops candidates whose basename is already a member of the archive.
///
/// A missing archive leaves the list untouched. Surviving candidates keep
/// their order.
pub fn filter_against_archive(
    candidates: Vec<Candidate>,
    archive_path: &Path,
) -> Result<Vec<Candidate>, RiddleError> {
    if !archive_path.is_file() {
        return Ok(candidates);
    }

    let members = archive_member_names(archive_path)?;
    info!("[~] Removing entries already in {}", archive_path.display());
    let before = candidates.len();
    let kept: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| !members.contains(c.basename()))
        .collect();
    info!("{} of {} candidates already archived", before - kept.len(), before);
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_archive(path: &Path, names: &[&str]) {
        let mut writer = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
        for name in names {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"data").unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_filters_archived_members() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("pics.zip");
        write_archive(&archive, &["a.png"]);

        let kept = filter_against_archive(
            vec![Candidate::new("http://x/a.png"), Candidate::new("http://x/b.png")],
            &archive,
        )
        .unwrap();
        assert_eq!(kept, vec![Candidate::new("http://x/b.png")]);
    }

    #[test]
    fn test_missing_archive_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = vec![Candidate::new("http://x/a.png"), Candidate::new("http://x/b.png")];
        let kept =
            filter_against_archive(candidates.clone(), &dir.path().join("absent.zip")).unwrap();
        assert_eq!(kept, candidates);
    }

    #[test]
    fn test_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("pics.zip");
        write_archive(&archive, &["b.png", "d.png"]);

        let kept = filter_against_archive(
            ["a", "b", "c", "d", "e"]
                .iter()
                .map(|n| Candidate::new(format!("http://x/{}.png", n)))
                .collect(),
            &archive,
        )
        .unwrap();
        let names: Vec<&str> = kept.iter().map(|c| c.basename()).collect();
        assert_eq!(names, vec!["a.png", "c.png", "e.png"]);
    }

    #[test]
    fn test_corrupt_archive_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.zip");
        std::fs::write(&archive, b"not a zip").unwrap();
        assert!(filter_against_archive(vec![Candidate::new("http://x/a.png")], &archive).is_err());
    }
}
