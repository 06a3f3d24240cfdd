//! Layout of the collected-code artifact.

use crate::collect::{CollectSummary, CollectedFile, collect_files};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::patterns::Filters;
use crate::tree::build_tree;
use log;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub const TREE_HEADER: &str = "Структура проекта:";
pub const SECTION_DELIMITER: &str =
    "-----------------------------------------------------------";
pub const COMPLETION_MESSAGE: &str = "Сбор кода завершён. Результаты в файле";

pub fn file_header(rel_path: &str) -> String {
    format!("--- Мой файл {} имеет такое содержание: ", rel_path)
}

/// Writes the artifact sections in order: tree first, then one block per file.
pub struct ArtifactWriter<W: Write> {
    out: W,
}

impl<W: Write> ArtifactWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_tree<S: AsRef<str>>(&mut self, lines: &[S]) -> io::Result<()> {
        self.out.write_all(render_tree_section(lines).as_bytes())
    }

    pub fn write_file(&mut self, file: &CollectedFile) -> io::Result<()> {
        write!(self.out, "{}\n\n", file_header(&file.rel_path))?;
        self.out.write_all(file.content.as_bytes())?;
        write!(self.out, "\n\n{}\n\n", SECTION_DELIMITER)
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Tree section on its own, exactly as it appears at the top of the artifact.
pub fn render_tree_section<S: AsRef<str>>(lines: &[S]) -> String {
    let mut text = format!("{}\n\n", TREE_HEADER);
    for line in lines {
        text.push_str(line.as_ref());
        text.push('\n');
    }
    text.push_str(&format!("\n{}\n\n", SECTION_DELIMITER));
    text
}

/// Renders the tree and streams every collected file of `project_root` into `out`.
pub fn generate_artifact<W: Write>(
    project_root: &Path,
    filters: &Filters,
    config: &Config,
    out: W,
    output_path: &Path,
) -> Result<(W, CollectSummary)> {
    let write_err = |source: io::Error| AppError::FileWrite {
        path: output_path.to_path_buf(),
        source,
    };

    log::debug!("Rendering project tree...");
    let lines = build_tree(project_root, filters, config.tree.connectors)?;
    let mut writer = ArtifactWriter::new(out);
    writer.write_tree(&lines).map_err(write_err)?;

    log::debug!("Collecting file contents...");
    let summary = collect_files(
        project_root,
        filters,
        config.general.on_read_error,
        |file| writer.write_file(&file).map_err(write_err),
    )?;

    let out = writer.finish().map_err(write_err)?;
    Ok((out, summary))
}

/// Creates (or truncates) `output_path` and writes the full artifact to it.
///
/// The file is closed on every exit path. On failure it may be left
/// partially written.
pub fn write_artifact(
    project_root: &Path,
    filters: &Filters,
    config: &Config,
    output_path: &Path,
) -> Result<CollectSummary> {
    log::info!("Writing artifact to {}", output_path.display());
    let file = File::create(output_path).map_err(|source| AppError::FileWrite {
        path: output_path.to_path_buf(),
        source,
    })?;
    let (_, summary) = generate_artifact(
        project_root,
        filters,
        config,
        BufWriter::new(file),
        output_path,
    )?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_is_fifty_nine_dashes() {
        assert_eq!(SECTION_DELIMITER.len(), 59);
        assert!(SECTION_DELIMITER.chars().all(|c| c == '-'));
    }

    #[test]
    fn tree_section_layout() {
        let text = render_tree_section(&["├─ a.py", "└─ b/"]);
        assert_eq!(
            text,
            format!(
                "Структура проекта:\n\n├─ a.py\n└─ b/\n\n{}\n\n",
                SECTION_DELIMITER
            )
        );
    }

    #[test]
    fn empty_tree_still_has_header_and_delimiter() {
        let text = render_tree_section::<&str>(&[]);
        assert_eq!(text, format!("Структура проекта:\n\n\n{}\n\n", SECTION_DELIMITER));
    }

    #[test]
    fn file_block_layout() {
        let mut buf = Vec::new();
        let mut writer = ArtifactWriter::new(&mut buf);
        writer
            .write_file(&CollectedFile {
                rel_path: "pkg/a.py".into(),
                content: "x = 1\n".into(),
            })
            .unwrap();
        writer.finish().unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            format!(
                "--- Мой файл pkg/a.py имеет такое содержание: \n\nx = 1\n\n\n{}\n\n",
                SECTION_DELIMITER
            )
        );
    }
}
