// AST types for parsed PHP source
//
// Only declarations are kept: classes, interfaces and traits with their
// constants and methods. Names are fully qualified at parse time.

use std::fmt;
use std::path::PathBuf;

/// A parsed PHP file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    /// Absolute file path
    pub path: PathBuf,
    /// Declarations in source order
    pub declarations: Vec<Declaration>,
    /// Whether tree-sitter reported syntax errors
    pub has_errors: bool,
}

impl ParsedFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            declarations: Vec::new(),
            has_errors: false,
        }
    }

    /// Check if file declares anything
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Kind of type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Class,
    Interface,
    Trait,
}

/// A class, interface or trait declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Fully qualified name, without leading backslash
    pub name: String,
    pub kind: DeclarationKind,
    pub is_abstract: bool,
    pub is_final: bool,
    /// Parent class (classes only)
    pub parent: Option<String>,
    /// Implemented interfaces, or extended interfaces for an interface
    pub interfaces: Vec<String>,
    /// Traits pulled in with `use`
    pub traits: Vec<String>,
    /// Raw `/** ... */` comment
    pub doc_comment: Option<String>,
    pub constants: Vec<Constant>,
    pub methods: Vec<Method>,
}

impl Declaration {
    pub fn new(name: &str, kind: DeclarationKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            is_abstract: false,
            is_final: false,
            parent: None,
            interfaces: Vec::new(),
            traits: Vec::new(),
            doc_comment: None,
            constants: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == DeclarationKind::Interface
    }

    /// Look up a constant declared directly on this type
    pub fn constant(&self, name: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.name == name)
    }
}

/// A class constant
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub value: Expr,
}

/// Method modifiers, ordered the way PHP reflection lists them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Abstract,
    Final,
    Public,
    Protected,
    Private,
    Static,
}

impl Modifier {
    /// Parse a modifier keyword (`var` counts as `public`)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "abstract" => Some(Self::Abstract),
            "final" => Some(Self::Final),
            "public" | "var" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            "static" => Some(Self::Static),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::Final => "final",
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Static => "static",
        }
    }

    pub fn is_visibility(&self) -> bool {
        matches!(self, Self::Public | Self::Protected | Self::Private)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    /// Modifiers as written
    pub modifiers: Vec<Modifier>,
    pub parameters: Vec<Parameter>,
    pub doc_comment: Option<String>,
}

impl Method {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            modifiers: Vec::new(),
            parameters: Vec::new(),
            doc_comment: None,
        }
    }
}

/// A method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Name without the `$` sigil
    pub name: String,
    pub default: Option<Expr>,
    /// Default value as written
    pub default_text: Option<String>,
    pub variadic: bool,
}

impl Parameter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            default: None,
            default_text: None,
            variadic: false,
        }
    }

    pub fn with_default(name: &str, default: Expr, text: &str) -> Self {
        Self {
            name: name.to_string(),
            default: Some(default),
            default_text: Some(text.to_string()),
            variadic: false,
        }
    }

    /// Whether a call may omit this parameter on its own
    pub fn has_default(&self) -> bool {
        self.default.is_some() || self.variadic
    }
}

/// A constant expression, as far as it can be read without evaluating code
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Null,
    Bool(bool),
    Str(String),
    /// Array literal elements with optional keys
    Array(Vec<(Option<Expr>, Expr)>),
    /// `Class::NAME` (class resolved) or a global `NAME`
    ConstantRef {
        class: Option<String>,
        name: String,
        text: String,
    },
    /// Anything else, kept as source text
    Raw(String),
}
