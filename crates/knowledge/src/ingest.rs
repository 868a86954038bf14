//! Loading files into the corpus.

use crate::chunker::chunk_text;
use crate::corpus::SqliteCorpus;
use crate::types::{Document, LearnOptions, LearnStats};
use grounded_core::{AppError, AppResult};
use std::path::Path;
use std::time::Instant;
use walkdir::WalkDir;

/// Metadata key holding the path a document was read from.
pub const PATH_KEY: &str = "path";

/// Metadata key holding the chunk position within its file.
pub const CHUNK_KEY: &str = "chunk";

/// Read files and directories into the corpus.
///
/// Every chunk becomes one document carrying the originating `filename`.
/// Files that cannot be read as UTF-8 text are skipped and counted; a path
/// that does not exist is an error.
pub async fn learn(corpus: &SqliteCorpus, options: &LearnOptions) -> AppResult<LearnStats> {
    let start = Instant::now();
    let mut stats = LearnStats::default();

    tracing::info!("Starting learn operation for {} path(s)", options.paths.len());

    for path in &options.paths {
        if path.is_file() {
            learn_file(corpus, path, options, &mut stats).await?;
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if entry_path.is_file() && should_include(entry_path, options) {
                    learn_file(corpus, entry_path, options, &mut stats).await?;
                }
            }
        } else {
            return Err(AppError::Knowledge(format!(
                "Path does not exist: {:?}",
                path
            )));
        }
    }

    stats.duration_secs = start.elapsed().as_secs_f64();

    tracing::info!(
        "Learn operation completed: {} files, {} chunks, {} skipped, {} bytes in {:.2}s",
        stats.files_count,
        stats.chunks_count,
        stats.skipped_count,
        stats.bytes_processed,
        stats.duration_secs
    );

    Ok(stats)
}

async fn learn_file(
    corpus: &SqliteCorpus,
    path: &Path,
    options: &LearnOptions,
    stats: &mut LearnStats,
) -> AppResult<()> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Skipping {:?}: {}", path, e);
            stats.skipped_count += 1;
            return Ok(());
        }
    };

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    let chunks = chunk_text(&text, options.chunk_size, options.chunk_overlap);
    for (position, chunk) in chunks.iter().enumerate() {
        let document = Document::new(chunk.as_str())
            .with_filename(filename.as_str())
            .with_metadata(PATH_KEY, path.to_string_lossy())
            .with_metadata(CHUNK_KEY, position.to_string());
        corpus.insert(&document).await?;
    }

    tracing::debug!("Learned {:?}: {} chunks", path, chunks.len());

    stats.files_count += 1;
    stats.chunks_count += chunks.len() as u32;
    stats.bytes_processed += text.len() as u64;
    Ok(())
}

/// Check whether a file's extension is accepted.
fn should_include(path: &Path, options: &LearnOptions) -> bool {
    if options.extensions.is_empty() {
        return true;
    }

    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            options
                .extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
