//! Classdoc - Generate API docs for PHP class libraries
//!
//! Reads a PHP class library, checks that it follows the one-class-per-file
//! layout, and renders one reStructuredText page per class and output
//! language. A small static site generator turns markdown chapters into
//! HTML pages.

pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod output;
pub mod parser;
pub mod registry;
pub mod site;

// Re-export main types
pub use config::Config;
pub use error::{Error, Result};
pub use metadata::{ClassMetadata, DefaultValue, Introspector, MethodMetadata, ParameterMetadata};
pub use output::{ClassDescriptor, DocumentGenerator, GenerationReport};
pub use parser::DocBlock;
pub use registry::SourceRegistry;
pub use site::{MarkdownRenderer, SiteGenerator};
