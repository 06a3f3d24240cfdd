//! Gathers the text of every surviving file that matches an include pattern.

use crate::config::ReadErrorPolicy;
use crate::error::{ReadError, Result};
use crate::patterns::Filters;
use crate::walk::{Entry, Position, Visitor, WalkOrder, Walker};
use log;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFile {
    pub rel_path: String,
    pub content: String,
}

/// Outcome of a collection run that did not abort.
#[derive(Debug, Default)]
pub struct CollectSummary {
    pub collected: usize,
    /// Files left out under [`ReadErrorPolicy::Skip`].
    pub skipped: Vec<ReadError>,
}

/// Reads a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String, ReadError> {
    let bytes = fs::read(path).map_err(|source| ReadError::Access {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| ReadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Walks `root` and hands each collected file to `sink` as soon as it is read.
///
/// Files of a directory come before its subdirectories, both in name order.
/// Ignore rules always win over include patterns.
pub fn collect_files<F>(
    root: &Path,
    filters: &Filters,
    policy: ReadErrorPolicy,
    sink: F,
) -> Result<CollectSummary>
where
    F: FnMut(CollectedFile) -> Result<()>,
{
    let mut collector = ContentCollector {
        filters,
        policy,
        sink,
        summary: CollectSummary::default(),
    };
    Walker::new(root, filters)
        .order(WalkOrder::FilesFirst)
        .walk(&mut collector)?;
    log::info!(
        "Collected {} files ({} skipped).",
        collector.summary.collected,
        collector.summary.skipped.len()
    );
    Ok(collector.summary)
}

/// Same as [`collect_files`] but keeps everything in memory.
pub fn collect_all(
    root: &Path,
    filters: &Filters,
    policy: ReadErrorPolicy,
) -> Result<(Vec<CollectedFile>, CollectSummary)> {
    let mut files = Vec::new();
    let summary = collect_files(root, filters, policy, |file| {
        files.push(file);
        Ok(())
    })?;
    Ok((files, summary))
}

struct ContentCollector<'a, F> {
    filters: &'a Filters,
    policy: ReadErrorPolicy,
    sink: F,
    summary: CollectSummary,
}

impl<F> Visitor for ContentCollector<'_, F>
where
    F: FnMut(CollectedFile) -> Result<()>,
{
    fn visit(&mut self, entry: &Entry, _position: Position) -> Result<()> {
        if entry.is_dir {
            return Ok(());
        }
        if !self.filters.should_include_file(&entry.name) {
            log::trace!("Not included: {}", entry.rel_path);
            return Ok(());
        }

        match read_text(&entry.path) {
            Ok(content) => {
                log::trace!("Collected {} ({} bytes)", entry.rel_path, content.len());
                self.summary.collected += 1;
                (self.sink)(CollectedFile {
                    rel_path: entry.rel_path.clone(),
                    content,
                })
            }
            Err(e) => match self.policy {
                ReadErrorPolicy::Abort => Err(e.into()),
                ReadErrorPolicy::Skip => {
                    log::info!("Skipping {}: {}", entry.rel_path, e);
                    self.summary.skipped.push(e);
                    Ok(())
                }
            },
        }
    }
}
