//! Renders the filtered directory structure as indented lines.

use crate::config::ConnectorMode;
use crate::error::Result;
use crate::patterns::Filters;
use crate::walk::{Entry, Position, Visitor, WalkOrder, Walker};
use log;
use std::path::Path;

const BRANCH: &str = "├─";
const LAST_BRANCH: &str = "└─";
const CONTINUATION: &str = "│  ";
const BLANK: &str = "   ";

/// Produces one line per surviving entry, depth first, siblings in name order.
///
/// Directories carry a trailing `/`. With [`ConnectorMode::Listing`] an entry
/// only gets `└─` when it is the last name in its directory listing, so a
/// level whose trailing entries are all filtered out ends on `├─`.
pub fn build_tree(root: &Path, filters: &Filters, connectors: ConnectorMode) -> Result<Vec<String>> {
    let mut renderer = TreeRenderer::new(connectors);
    Walker::new(root, filters)
        .order(WalkOrder::Interleaved)
        .walk(&mut renderer)?;
    log::info!("Tree rendered with {} lines.", renderer.lines.len());
    Ok(renderer.lines)
}

struct TreeRenderer {
    connectors: ConnectorMode,
    prefix: Vec<&'static str>,
    lines: Vec<String>,
}

impl TreeRenderer {
    fn new(connectors: ConnectorMode) -> Self {
        Self {
            connectors,
            prefix: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn is_last(&self, position: Position) -> bool {
        match self.connectors {
            ConnectorMode::Listing => position.last_in_listing,
            ConnectorMode::Visible => position.last_visible,
        }
    }
}

impl Visitor for TreeRenderer {
    fn visit(&mut self, entry: &Entry, position: Position) -> Result<()> {
        let is_last = self.is_last(position);
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        let suffix = if entry.is_dir { "/" } else { "" };
        self.lines.push(format!(
            "{}{} {}{}",
            self.prefix.concat(),
            connector,
            entry.name,
            suffix
        ));
        if entry.is_dir {
            self.prefix.push(if is_last { BLANK } else { CONTINUATION });
        }
        Ok(())
    }

    fn leave_dir(&mut self, _dir: &Entry) -> Result<()> {
        self.prefix.pop();
        Ok(())
    }
}
