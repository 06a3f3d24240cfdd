//! Name and path matching against the configured glob sets.
//!
//! Patterns use shell-style wildcards (`*`, `?`, `[...]`) and are matched
//! against a single file name, a single directory name or a whole relative
//! path. In path patterns `*` and `?` stay within one segment, so
//! `dir/*.yaml` does not reach `dir/sub/file.yaml`. Braces and backslashes
//! are ordinary characters: `{a,b}.py` only matches a file of that name.

use crate::config::{Config, FiltersConfig};
use crate::error::{AppError, Result};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use log;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Applies NFC so that precomposed and decomposed spellings of a name compare equal.
pub fn normalize(name: &str) -> Cow<'_, str> {
    if unicode_normalization::is_nfc(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(name.nfc().collect())
    }
}

/// Extension patterns (`*.ext`) are compared case-insensitively, everything
/// else literally.
fn is_extension_pattern(pattern: &str) -> bool {
    pattern.starts_with("*.")
}

/// The immutable matcher shared by the tree renderer and the content collector.
#[derive(Debug, Clone)]
pub struct Filters {
    exact_patterns: Vec<String>,
    exact_files: GlobSet,
    extension_files: GlobSet,
    dirs: GlobSet,
    paths: GlobSet,
    include: GlobSet,
    self_paths: Vec<PathBuf>,
}

impl Filters {
    pub fn from_config(filters: &FiltersConfig) -> Result<Self> {
        let (extension, exact): (Vec<&String>, Vec<&String>) = filters
            .ignore_files
            .iter()
            .partition(|p| is_extension_pattern(p));
        log::debug!(
            "Partitioned file ignores: {} exact, {} extension",
            exact.len(),
            extension.len()
        );

        let exact_patterns: Vec<String> = exact.into_iter().cloned().collect();
        let lowered: Vec<String> = extension.iter().map(|p| p.to_lowercase()).collect();
        let normalized_dirs: Vec<String> = filters
            .ignore_dirs
            .iter()
            .map(|p| normalize(p).into_owned())
            .collect();

        Ok(Self {
            exact_files: build_glob_set(&exact_patterns)?,
            exact_patterns,
            extension_files: build_glob_set(&lowered)?,
            dirs: build_glob_set(&normalized_dirs)?,
            paths: build_path_glob_set(&filters.ignore_paths)?,
            include: build_glob_set(&filters.include_files)?,
            self_paths: Vec::new(),
        })
    }

    /// Registers the running program (or another artifact of the run) so
    /// that it never shows up in either traversal.
    ///
    /// The absolute path is excluded directly. With `exclude_name` the file
    /// name also joins the exact-match ignore patterns, so copies of the
    /// program elsewhere in the tree are hidden too.
    pub fn exclude_self(mut self, absolute_path: &Path, exclude_name: bool) -> Result<Self> {
        if exclude_name {
            if let Some(name) = absolute_path.file_name() {
                let name = name.to_string_lossy();
                log::debug!("Adding own file name '{}' to exact ignores", name);
                self.exact_patterns.push(globset::escape(&name));
                self.exact_files = build_glob_set(&self.exact_patterns)?;
            }
        }
        log::debug!("Excluding own path: {}", absolute_path.display());
        self.self_paths.push(absolute_path.to_path_buf());
        Ok(self)
    }

    /// Filters for one run: the configured patterns, plus the running
    /// executable (by path and name) and the output artifact (by path).
    pub fn for_run(
        config: &Config,
        project_root: &Path,
        executable: Option<&Path>,
    ) -> Result<Self> {
        let mut filters = Self::from_config(&config.filters)?;
        if let Some(exe) = executable {
            let exe = exe.canonicalize().unwrap_or_else(|_| exe.to_path_buf());
            filters = filters.exclude_self(&exe, true)?;
        }
        let output = config.get_effective_output_path(project_root);
        filters.exclude_self(&output, false)
    }

    pub fn should_ignore_file(&self, filename: &str) -> bool {
        if self.exact_files.is_match(filename) {
            return true;
        }
        self.extension_files.is_match(filename.to_lowercase())
    }

    pub fn should_ignore_path(&self, rel_path: &str) -> bool {
        self.paths.is_match(rel_path)
    }

    pub fn should_ignore_dir(&self, name: &str) -> bool {
        self.dirs.is_match(normalize(name).as_ref())
    }

    pub fn should_include_file(&self, filename: &str) -> bool {
        self.include.is_match(filename)
    }

    pub fn is_self(&self, absolute_path: &Path) -> bool {
        self.self_paths.iter().any(|p| p == absolute_path)
    }
}

/// Rewrites shell wildcard syntax for `globset`, which would otherwise read
/// `{a,b}` as alternation. Braces outside a `[...]` class become one-char
/// classes.
fn shell_to_glob(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains(['{', '}']) {
        return Cow::Borrowed(pattern);
    }

    enum Class {
        Outside,
        Opened,
        Negated,
        Inside,
    }

    let mut out = String::with_capacity(pattern.len() + 4);
    let mut class = Class::Outside;
    for c in pattern.chars() {
        class = match (class, c) {
            (Class::Outside, '{' | '}') => {
                out.push('[');
                out.push(c);
                out.push(']');
                Class::Outside
            }
            (Class::Outside, '[') => {
                out.push(c);
                Class::Opened
            }
            (Class::Opened, '!') => {
                out.push(c);
                Class::Negated
            }
            // A `]` right after the opening bracket is a member, not the end.
            (Class::Opened | Class::Negated, _) => {
                out.push(c);
                Class::Inside
            }
            (Class::Inside, ']') => {
                out.push(c);
                Class::Outside
            }
            (state, _) => {
                out.push(c);
                state
            }
        };
    }
    Cow::Owned(out)
}

fn build_glob_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    build_with(patterns, |p| GlobBuilder::new(p).backslash_escape(false).build())
}

fn build_path_glob_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    build_with(patterns, |p| {
        GlobBuilder::new(p)
            .literal_separator(true)
            .backslash_escape(false)
            .build()
    })
}

fn build_with<S, F>(patterns: &[S], compile: F) -> Result<GlobSet>
where
    S: AsRef<str>,
    F: Fn(&str) -> std::result::Result<Glob, globset::Error>,
{
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        match compile(&shell_to_glob(pattern)) {
            Ok(glob) => {
                log::trace!("Adding glob pattern: {}", pattern);
                builder.add(glob);
            }
            Err(e) => {
                log::error!("Invalid glob pattern \"{}\": {}", pattern, e);
                return Err(AppError::Glob(format!(
                    "Invalid glob pattern \"{}\": {}",
                    pattern, e
                )));
            }
        }
    }
    builder.build().map_err(|e| {
        log::error!("Error building glob set: {}", e);
        AppError::Glob(e.to_string())
    })
}
