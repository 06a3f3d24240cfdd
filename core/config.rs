use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = ".xtools/codecollect";
pub const DEFAULT_CONFIG_FILENAME: &str = "codecollect.toml";
pub const DEFAULT_OUTPUT_FILENAME: &str = "collected_code.txt";

pub const DEFAULT_IGNORE_FILES: &[&str] = &[
    "*.pyc", "*.pyo", "*.txt", "*.md", "*.log", "*.ini", "*.png", "*.jpg", "*.gif", "*.svg",
    "*.pdf", "*.zip", "*.rar", "*.tar", "*.gz", "*.bz2", "*.7z", "*.exe", "*.jpeg", "*.js",
    "*.min.js", "*.bin", "*.ipynb", "*.csv", "*.xls", "*.xlsx", "*.ppt", "*.pptx",
    "TEST.py",
    "*_old*.py",
    "build_image.sh",
    "Collected_Code_Script.py",
    "Collected_Code_Script-v2.py",
    "Collected_Code_Script.sh",
    "docker-compose.override.yml",
    "langgraph_rag_demo.py",
    "service.yaml",
];

pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "__pycache__",
    "venv",
    "env",
    ".venv",
    "build",
    "dist",
    ".pytest_cache",
    ".git",
    ".idea",
    "docs",
    "docs_",
    "time-bot",
    "ПРЕЗЕНТАЦИЯ",
    "tmp",
    "утилита-парсит проект со структурой и кодом",
    "backend_fallback",
    "frontend",
];

pub const DEFAULT_IGNORE_PATHS: &[&str] = &[
    "backend/app/categories_config.yaml",
    "backend_fallback/categories_config.yaml",
];

pub const DEFAULT_INCLUDE_FILES: &[&str] = &["*.py", "*.go", "*.yml", "Dockerfile"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub tree: TreeConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    #[serde(default)]
    pub on_read_error: ReadErrorPolicy,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    #[serde(default = "default_ignore_files")]
    pub ignore_files: Vec<String>,
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,
    #[serde(default = "default_ignore_paths")]
    pub ignore_paths: Vec<String>,
    #[serde(default = "default_include_files")]
    pub include_files: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct TreeConfig {
    #[serde(default)]
    pub connectors: ConnectorMode,
}

/// What to do with a file that passed every filter but cannot be read as text.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadErrorPolicy {
    /// Stop the whole run at the first unreadable file.
    #[default]
    Abort,
    /// Leave the file out of the artifact and report it once the run is over.
    Skip,
}

/// How the tree decides between `├─` and `└─` for an entry.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorMode {
    /// Last position in the full sorted directory listing, hidden and
    /// ignored entries included. Byte-compatible with existing artifacts.
    #[default]
    Listing,
    /// Last position among the entries that are actually drawn.
    Visible,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_file: default_output_file(),
            on_read_error: ReadErrorPolicy::default(),
        }
    }
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            ignore_files: default_ignore_files(),
            ignore_dirs: default_ignore_dirs(),
            ignore_paths: default_ignore_paths(),
            include_files: default_include_files(),
        }
    }
}

fn to_owned_vec(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
}
fn default_output_file() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILENAME)
}
fn default_ignore_files() -> Vec<String> {
    to_owned_vec(DEFAULT_IGNORE_FILES)
}
fn default_ignore_dirs() -> Vec<String> {
    to_owned_vec(DEFAULT_IGNORE_DIRS)
}
fn default_ignore_paths() -> Vec<String> {
    to_owned_vec(DEFAULT_IGNORE_PATHS)
}
fn default_include_files() -> Vec<String> {
    to_owned_vec(DEFAULT_INCLUDE_FILES)
}

impl Config {
    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_to_resolve = match cli_project_root {
            Some(p) => PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned()),
            None => std::env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&PathBuf>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p) => {
                let path = PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned());
                if !path.is_file() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = project_root
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME);
                if default_path.is_file() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&toml_content).map_err(|e| match e {
            AppError::TomlParse(msg) => AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        toml::from_str::<Config>(toml_content).map_err(|e| AppError::TomlParse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Output artifact location; relative paths are anchored at the project root.
    pub fn get_effective_output_path(&self, project_root: &Path) -> PathBuf {
        if self.general.output_file.is_absolute() {
            self.general.output_file.clone()
        } else {
            project_root.join(&self.general.output_file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_reference_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.general.output_file, PathBuf::from("collected_code.txt"));
        assert_eq!(config.general.on_read_error, ReadErrorPolicy::Abort);
        assert_eq!(config.tree.connectors, ConnectorMode::Listing);
        assert!(config.filters.ignore_dirs.iter().any(|d| d == "__pycache__"));
        assert_eq!(config.filters.include_files, vec!["*.py", "*.go", "*.yml", "Dockerfile"]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [general]
            on_read_error = "skip"

            [filters]
            include_files = ["*.rs"]

            [tree]
            connectors = "visible"
            "#,
        )
        .unwrap();
        assert_eq!(config.general.on_read_error, ReadErrorPolicy::Skip);
        assert_eq!(config.general.output_file, PathBuf::from(DEFAULT_OUTPUT_FILENAME));
        assert_eq!(config.filters.include_files, vec!["*.rs"]);
        assert_eq!(config.filters.ignore_files, default_ignore_files());
        assert_eq!(config.tree.connectors, ConnectorMode::Visible);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::from_toml_str("[general]\nverbose = true\n").unwrap_err();
        assert!(matches!(err, AppError::TomlParse(_)));
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = Config::default();
        config.general.on_read_error = ReadErrorPolicy::Skip;
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("on_read_error = \"skip\""));
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn output_path_is_anchored_at_root_unless_absolute() {
        let root = Path::new("/work/project");
        let mut config = Config::default();
        assert_eq!(
            config.get_effective_output_path(root),
            root.join(DEFAULT_OUTPUT_FILENAME)
        );
        config.general.output_file = PathBuf::from("/tmp/out.txt");
        assert_eq!(config.get_effective_output_path(root), PathBuf::from("/tmp/out.txt"));
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::resolve_config_path(dir.path(), Some(&missing), false).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(
            Config::resolve_config_path(dir.path(), Some(&missing), true)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn default_config_file_is_picked_up_when_present() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::resolve_config_path(dir.path(), None, false).unwrap().is_none());

        let config_dir = dir.path().join(DEFAULT_CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        let config_file = config_dir.join(DEFAULT_CONFIG_FILENAME);
        fs::write(&config_file, "[tree]\nconnectors = \"visible\"\n").unwrap();

        let resolved = Config::resolve_config_path(dir.path(), None, false).unwrap();
        assert_eq!(resolved.as_deref(), Some(config_file.as_path()));
        let loaded = Config::load_from_path(&config_file).unwrap();
        assert_eq!(loaded.tree.connectors, ConnectorMode::Visible);
    }
}
