use std::path::PathBuf;
use thiserror::Error;

/// Classdoc error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Parser error: {0}")]
    Parser(String),

    /// Source files that did not register any new declaration after loading
    #[error("some source files failed to load: [{}]", join_paths(.files))]
    Registry { files: Vec<PathBuf> },

    /// Target classes without a source file named after them
    #[error("some classes violate the one-class-per-file convention: [{}]", .classes.join(", "))]
    ConventionViolation { classes: Vec<String> },

    #[error("<code> segment is not closed: {target}")]
    DocBlock { target: String },

    #[error("Site error: {0}")]
    Site(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for classdoc operations
pub type Result<T> = std::result::Result<T, Error>;

fn join_paths(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|f| f.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        Error::Parser(msg.into())
    }

    /// Create a docblock formatting error for a class or `Class:method` target
    pub fn docblock(target: impl Into<String>) -> Self {
        Error::DocBlock {
            target: target.into(),
        }
    }

    /// Create a site generation error
    pub fn site(msg: impl Into<String>) -> Self {
        Error::Site(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_path_not_found_display() {
        let err = Error::PathNotFound(PathBuf::from("/some/path"));
        assert_eq!(err.to_string(), "Path not found: /some/path");
    }

    #[test]
    fn test_registry_error_lists_every_file() {
        let err = Error::Registry {
            files: vec![PathBuf::from("/lib/A.php"), PathBuf::from("/lib/B.php")],
        };
        assert_eq!(
            err.to_string(),
            "some source files failed to load: [/lib/A.php, /lib/B.php]"
        );
    }

    #[test]
    fn test_convention_violation_display() {
        let err = Error::ConventionViolation {
            classes: vec!["ManaPHP\\Foo".to_string(), "ManaPHP\\Bar".to_string()],
        };
        assert!(err.to_string().contains("ManaPHP\\Foo, ManaPHP\\Bar"));
    }

    #[test]
    fn test_docblock_error_names_target() {
        let err = Error::docblock("ManaPHP\\Db:query");
        assert_eq!(err.to_string(), "<code> segment is not closed: ManaPHP\\Db:query");
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::config_validation("namespace must not be empty");
        assert_eq!(err.to_string(), "Config validation error: namespace must not be empty");
    }

    #[test]
    fn test_other_error() {
        let err = Error::other("something went wrong");
        assert_eq!(err.to_string(), "something went wrong");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
