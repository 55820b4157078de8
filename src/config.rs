use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub substitutions: Vec<Substitution>,
    pub site: SiteConfig,
}

/// Where the class library lives and which part of it is documented
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub root: PathBuf,
    pub namespace: String,
    pub extension: String,
}

/// API document output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub languages: Vec<String>,
    pub extension: String,
    /// Link template, `{path}` is replaced by the class path
    pub source_url: String,
}

/// A literal find/replace pair applied to output paths and content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

impl Substitution {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Static site settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub theme_dir: PathBuf,
    pub sources_dir: PathBuf,
    pub output_dir: PathBuf,
    pub index_title: String,
    pub chapter_title: String,
    pub root_path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            namespace: "ManaPHP".to_string(),
            extension: "php".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./api"),
            languages: vec!["en".to_string()],
            extension: "rst".to_string(),
            source_url: "https://github.com/manaphp/manaphp/blob/master/{path}.php".to_string(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            theme_dir: PathBuf::from("./theme"),
            sources_dir: PathBuf::from("./sources"),
            output_dir: PathBuf::from("./public"),
            index_title: "index".to_string(),
            chapter_title: "{title}".to_string(),
            root_path: "/".to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        root: Option<PathBuf>,
        output: Option<PathBuf>,
        namespace: Option<String>,
        languages: Vec<String>,
    ) {
        if let Some(root) = root {
            self.source.root = root;
        }

        if let Some(out) = output {
            self.output.directory = out;
        }

        if let Some(ns) = namespace {
            self.source.namespace = ns;
        }

        if !languages.is_empty() {
            self.output.languages = languages;
        }
    }

    /// Apply every substitution, in table order
    pub fn substitute(&self, text: &str) -> String {
        self.substitutions
            .iter()
            .fold(text.to_string(), |acc, s| acc.replace(&s.from, &s.to))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.source.namespace.is_empty() {
            return Err(Error::config_validation("namespace must not be empty"));
        }

        if self.output.languages.is_empty() {
            return Err(Error::config_validation("at least one output language required"));
        }

        for (name, ext) in [
            ("source", &self.source.extension),
            ("output", &self.output.extension),
        ] {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(Error::config_validation(format!(
                    "{} extension must be non-empty and given without a leading dot",
                    name
                )));
            }
        }

        if !self.output.source_url.contains("{path}") {
            return Err(Error::config_validation("source_url must contain {path}"));
        }

        if self.substitutions.iter().any(|s| s.from.is_empty()) {
            return Err(Error::config_validation("substitution 'from' must not be empty"));
        }

        Ok(())
    }
}
