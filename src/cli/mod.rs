//! CLI module for classdoc

mod args;

pub use args::{Args, Command};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::DocumentGenerator;
use crate::registry::SourceRegistry;
use crate::site::SiteGenerator;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Config file looked up in the working directory
const DEFAULT_CONFIG: &str = "classdoc.toml";

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Api {
            path,
            output,
            namespace,
            languages,
            config,
            verbose,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(path, output, namespace, languages);
            cfg.validate()?;

            if verbose {
                println!("Library: {}", cfg.source.root.display());
                println!("Namespace: {}", cfg.source.namespace);
                println!("Output: {}", cfg.output.directory.display());
                println!("Languages: {:?}", cfg.output.languages);
                if !cfg.substitutions.is_empty() {
                    println!("Substitutions: {}", cfg.substitutions.len());
                }
            }

            if !cfg.source.root.exists() {
                return Err(Error::PathNotFound(cfg.source.root));
            }

            let mut registry = SourceRegistry::from_config(&cfg.source)?;
            let directory = cfg.output.directory.clone();

            println!("Generating API documentation...");
            let report = DocumentGenerator::new(cfg)
                .with_verbose(verbose)
                .run(&mut registry)?;

            println!("{}", report.summary());
            println!("Documentation written to: {}", directory.display());
            Ok(())
        }

        Command::Check {
            path,
            namespace,
            config,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(path, None, namespace, Vec::new());
            cfg.validate()?;

            if !cfg.source.root.exists() {
                return Err(Error::PathNotFound(cfg.source.root));
            }

            let mut registry = SourceRegistry::from_config(&cfg.source)?;
            let classes = DocumentGenerator::new(cfg).prepare(&mut registry)?;

            for class in &classes {
                println!("{}", class);
            }
            println!(
                "\n{} classes in {} files, no convention violations",
                classes.len(),
                registry.loaded_files().count()
            );
            Ok(())
        }

        Command::Site { config, verbose } => {
            let cfg = load_config(config.as_deref())?;

            if verbose {
                println!("Theme: {}", cfg.site.theme_dir.display());
                println!("Sources: {}", cfg.site.sources_dir.display());
                println!("Output: {}", cfg.site.output_dir.display());
            }

            println!("Generating site...");
            let output_dir = cfg.site.output_dir.clone();
            let report = SiteGenerator::new(cfg.site).generate()?;

            println!("{}", report.summary());
            println!("Site written to: {}", output_dir.display());
            Ok(())
        }

        Command::Version => {
            println!("classdoc {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// An explicit config file must load; the default one is optional
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::PathNotFound(path.to_path_buf()));
            }
            Config::load(path)
        }
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG);
            if default_path.exists() {
                Config::load(&default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}
