//! Zip archive creation and appending.

use crate::dedup::archive_member_names;
use crate::error::RiddleError;
use crate::types::{ArchiveCompression, ArchiveSummary};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::{error, info, warn};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Adds the files directly inside `folder` to the zip archive at `zip_path`.
///
/// An existing archive is opened for appending; otherwise a new one is
/// created. Subdirectories are not descended into. A file whose name is
/// already a member is skipped rather than written twice. Files that cannot be
/// read are logged and counted, and do not abort the remaining ones.
///
/// # Arguments
///
/// * `folder` - Directory whose files are archived
/// * `zip_path` - Archive to create or extend
/// * `compression` - Compression for the new members
///
/// # Returns
///
/// A summary of the call, or an error if the archive cannot be opened or
/// finalized.
pub fn compress_folder(
    folder: &Path,
    zip_path: &Path,
    compression: ArchiveCompression,
) -> Result<ArchiveSummary, RiddleError> {
    info!("[~] Compressing folder {}...", folder.display());

    let (mut writer, mut members) = open_writer(zip_path)?;
    let options = SimpleFileOptions::default().compression_method(compression.into());
    let mut summary = ArchiveSummary::default();

    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            warn!("Skipping {}: file name is not valid UTF-8", path.display());
            summary.failed += 1;
            continue;
        };

        if members.contains(&name) {
            warn!("Skipping {}: already in {}", name, zip_path.display());
            summary.skipped_duplicates += 1;
            continue;
        }

        match add_file(&mut writer, &path, &name, options) {
            Ok(()) => {
                members.insert(name);
                summary.added += 1;
            }
            Err(e) => {
                error!("Failed to add {} to archive: {}", path.display(), e);
                summary.failed += 1;
            }
        }
    }

    writer.finish()?;
    info!(
        "[+] Folder {} compressed to {} ({} added, {} duplicates skipped, {} failed)",
        folder.display(),
        zip_path.display(),
        summary.added,
        summary.skipped_duplicates,
        summary.failed
    );
    Ok(summary)
}

fn open_writer(zip_path: &Path) -> Result<(ZipWriter<File>, HashSet<String>), RiddleError> {
    if zip_path.is_file() {
        let members = archive_member_names(zip_path)?;
        let file = OpenOptions::new().read(true).write(true).open(zip_path)?;
        Ok((ZipWriter::new_append(file)?, members))
    } else {
        Ok((ZipWriter::new(File::create(zip_path)?), HashSet::new()))
    }
}

fn add_file(
    writer: &mut ZipWriter<File>,
    path: &Path,
    name: &str,
    options: SimpleFileOptions,
) -> Result<(), RiddleError> {
    let mut source = File::open(path)?;
    writer.start_file(name, options)?;
    if let Err(e) = std::io::copy(&mut source, writer) {
        writer.abort_file()?;
        return Err(e.into());
    }
    Ok(())
}
