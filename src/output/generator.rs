// API document generator
//
// Runs in two phases. Loading and convention checks must succeed before any
// page is rendered, and every page of a language is rendered before the
// first one is written.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::metadata::Introspector;
use crate::output::descriptor::ClassDescriptor;
use crate::registry::SourceRegistry;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Summary of one generation run
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub classes: usize,
    pub languages: usize,
    pub files_written: Vec<PathBuf>,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        format!(
            "Generated {} files ({} classes, {} languages)",
            self.files_written.len(),
            self.classes,
            self.languages
        )
    }
}

/// Writes one page per class per output language
pub struct DocumentGenerator {
    config: Config,
    verbose: bool,
}

impl DocumentGenerator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            verbose: false,
        }
    }

    /// Show a progress bar while rendering
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Load the library and check the one-class-per-file convention.
    ///
    /// Returns the target classes to document.
    pub fn prepare(&self, registry: &mut SourceRegistry) -> Result<Vec<String>> {
        let files = registry.discover(&self.config.source.root)?;
        registry.load(&files)?;

        let classes = registry.enumerate_target_classes();
        let violations = registry.find_convention_violations(&classes);
        if !violations.is_empty() {
            return Err(Error::ConventionViolation {
                classes: violations,
            });
        }

        Ok(classes)
    }

    /// Generate every page
    pub fn run(&self, registry: &mut SourceRegistry) -> Result<GenerationReport> {
        let classes = self.prepare(registry)?;

        let mut report = GenerationReport {
            classes: classes.len(),
            languages: self.config.output.languages.len(),
            ..Default::default()
        };

        for language in &self.config.output.languages {
            let pages = self.render_language(&*registry, language, &classes)?;
            for (path, contents) in pages {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, contents)?;
                report.files_written.push(path);
            }
        }

        Ok(report)
    }

    /// Render all pages of one language in memory
    fn render_language(
        &self,
        introspector: &dyn Introspector,
        language: &str,
        classes: &[String],
    ) -> Result<Vec<(PathBuf, String)>> {
        let progress = if self.verbose {
            let pb = ProgressBar::new(classes.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .map_err(|e| Error::other(e.to_string()))?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut pages = Vec::with_capacity(classes.len());
        for class in classes {
            if let Some(ref pb) = progress {
                pb.set_message(class.clone());
                pb.inc(1);
            }

            let metadata = introspector
                .class_metadata(class)
                .ok_or_else(|| Error::other(format!("class not loaded: {}", class)))?;
            let rst = ClassDescriptor::new(
                &metadata,
                &self.config.source.namespace,
                &self.config.output.source_url,
            )
            .render()?;

            pages.push((
                self.output_path(language, class),
                self.config.substitute(&rst),
            ));
        }

        if let Some(pb) = progress {
            pb.finish_with_message(format!("{} rendered", language));
        }

        Ok(pages)
    }

    /// `<output>/<language>/<Name_Space_Class>.<ext>`, substituted
    pub fn output_path(&self, language: &str, class: &str) -> PathBuf {
        let relative = format!(
            "{}/{}.{}",
            language,
            class.replace('\\', "_"),
            self.config.output.extension
        );
        self.config
            .output
            .directory
            .join(Path::new(&self.config.substitute(&relative)))
    }
}
