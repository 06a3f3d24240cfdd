//! The one directory traversal both output sections are built from.
//!
//! Each directory is listed, sorted by name and filtered through
//! [`Walker::admits`]; the surviving entries go to a [`Visitor`]. Admitted
//! directories are descended into, everything else is pruned before its
//! contents are ever listed.

use crate::error::{AppError, Result};
use crate::patterns::Filters;
use log;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A directory entry found during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    /// `/`-separated path relative to the walk root.
    pub rel_path: String,
    pub is_dir: bool,
}

/// Where an admitted entry sits inside its parent directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Last in the full sorted listing, filtered entries included.
    pub last_in_listing: bool,
    /// Last among the admitted entries.
    pub last_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkOrder {
    /// Files and directories together in name order, each directory
    /// descended into right after it is visited.
    #[default]
    Interleaved,
    /// All files of a directory first, then its subdirectories in name order.
    FilesFirst,
}

pub trait Visitor {
    fn visit(&mut self, entry: &Entry, position: Position) -> Result<()>;

    /// Called once the contents of an admitted directory have been walked.
    fn leave_dir(&mut self, _dir: &Entry) -> Result<()> {
        Ok(())
    }
}

pub struct Walker<'a> {
    root: PathBuf,
    filters: &'a Filters,
    order: WalkOrder,
}

impl<'a> Walker<'a> {
    pub fn new(root: &Path, filters: &'a Filters) -> Self {
        Self {
            root: root.to_path_buf(),
            filters,
            order: WalkOrder::default(),
        }
    }

    pub fn order(mut self, order: WalkOrder) -> Self {
        self.order = order;
        self
    }

    pub fn walk<V: Visitor>(&self, visitor: &mut V) -> Result<()> {
        log::debug!(
            "Walking {} ({:?})",
            self.root.display(),
            self.order
        );
        self.walk_dir(&self.root, None, visitor)
    }

    fn walk_dir<V: Visitor>(
        &self,
        dir: &Path,
        rel_dir: Option<&str>,
        visitor: &mut V,
    ) -> Result<()> {
        let listing = self.list(dir, rel_dir)?;
        let last_listed = listing.len().checked_sub(1);

        let admitted: Vec<(usize, &Entry)> = listing
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.admits(entry))
            .collect();
        let last_admitted = admitted.last().map(|(idx, _)| *idx);

        let position = |idx: usize| Position {
            last_in_listing: Some(idx) == last_listed,
            last_visible: Some(idx) == last_admitted,
        };

        match self.order {
            WalkOrder::Interleaved => {
                for (idx, entry) in &admitted {
                    self.visit_entry(entry, position(*idx), visitor)?;
                }
            }
            WalkOrder::FilesFirst => {
                let (dirs, files): (Vec<(usize, &Entry)>, Vec<(usize, &Entry)>) =
                    admitted.into_iter().partition(|(_, entry)| entry.is_dir);
                for (idx, entry) in files.into_iter().chain(dirs) {
                    self.visit_entry(entry, position(idx), visitor)?;
                }
            }
        }
        Ok(())
    }

    fn visit_entry<V: Visitor>(
        &self,
        entry: &Entry,
        position: Position,
        visitor: &mut V,
    ) -> Result<()> {
        visitor.visit(entry, position)?;
        if entry.is_dir {
            self.walk_dir(&entry.path, Some(&entry.rel_path), visitor)?;
            visitor.leave_dir(entry)?;
        }
        Ok(())
    }

    /// Lists one directory, sorted by file name.
    fn list(&self, dir: &Path, rel_dir: Option<&str>) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for item in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let item = item.map_err(|e| AppError::Walk {
                path: e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf),
                source: e,
            })?;
            let name = item.file_name().to_string_lossy().into_owned();
            let is_dir = item.file_type().is_dir()
                || (item.path_is_symlink()
                    && fs::metadata(item.path()).map_or(false, |m| m.is_dir()));
            let rel_path = match rel_dir {
                Some(parent) => format!("{}/{}", parent, name),
                None => name.clone(),
            };
            entries.push(Entry {
                name,
                path: item.into_path(),
                rel_path,
                is_dir,
            });
        }
        log::trace!("Listed {} entries in {}", entries.len(), dir.display());
        Ok(entries)
    }

    /// The single admission rule shared by every traversal.
    pub fn admits(&self, entry: &Entry) -> bool {
        let reason = if entry.name.starts_with('.') {
            Some("hidden")
        } else if self.filters.is_self(&entry.path) {
            Some("self")
        } else if entry.is_dir {
            self.filters
                .should_ignore_dir(&entry.name)
                .then_some("ignored directory")
        } else if self.filters.should_ignore_file(&entry.name) {
            Some("ignored file name")
        } else if self.filters.should_ignore_path(&entry.rel_path) {
            Some("ignored path")
        } else {
            None
        };
        match reason {
            Some(reason) => {
                log::trace!("Skipping {} ({})", entry.rel_path, reason);
                false
            }
            None => true,
        }
    }
}
