pub mod collect;
pub mod config;
pub mod error;
pub mod output_formats;
pub mod patterns;
pub mod tree;
pub mod walk;

pub use collect::{CollectSummary, CollectedFile, collect_all, collect_files, read_text};
pub use config::{Config, ConnectorMode, ReadErrorPolicy};
pub use error::{AppError, ReadError, Result};
pub use output_formats::{ArtifactWriter, generate_artifact, render_tree_section, write_artifact};
pub use patterns::{Filters, normalize};
pub use tree::build_tree;
pub use walk::{Entry, Position, Visitor, WalkOrder, Walker};
