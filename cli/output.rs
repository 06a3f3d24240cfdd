use anyhow::{Context, Result};
use codecollect_core::ReadError;
use codecollect_core::output_formats::COMPLETION_MESSAGE;
use colored::*;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

pub fn print_completion(output_file: &Path) {
    println!("{} {}", COMPLETION_MESSAGE, output_file.display());
}

pub fn print_skipped_files(skipped: &[ReadError]) {
    if skipped.is_empty() {
        return;
    }
    eprintln!(
        "\n{}",
        "⚠️ Warning: Files left out because they could not be read:".yellow()
    );
    for err in skipped {
        eprintln!(" - {}", err);
    }
    eprintln!("---");
}

pub fn write_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut file =
        File::create(path).with_context(|| format!("Failed to create file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to file {}", path.display()))?;
    Ok(())
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
