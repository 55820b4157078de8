//! Read-only class metadata, as reflection reports it
//!
//! These types are what the renderers consume. [`crate::registry::SourceRegistry`]
//! builds them from parsed source; tests build them by hand.

use crate::parser::Modifier;

/// Source of class metadata, looked up by fully qualified name
pub trait Introspector {
    fn class_metadata(&self, name: &str) -> Option<ClassMetadata>;
}

/// Whether `name` belongs to the documented library
pub fn in_namespace(name: &str, namespace: &str) -> bool {
    name.starts_with(namespace)
}

/// One introspected class or interface
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetadata {
    pub name: String,
    pub is_interface: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub parent: Option<ClassRef>,
    /// Implemented interfaces, inherited ones included
    pub interfaces: Vec<String>,
    pub doc_comment: Option<String>,
    /// Methods in reflection order, inherited ones included
    pub methods: Vec<MethodMetadata>,
}

impl ClassMetadata {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_interface: false,
            is_abstract: false,
            is_final: false,
            parent: None,
            interfaces: Vec::new(),
            doc_comment: None,
            methods: Vec::new(),
        }
    }

    /// Title kind; interface wins, then final, then abstract
    pub fn kind(&self) -> ClassKind {
        if self.is_interface {
            ClassKind::Interface
        } else if self.is_final {
            ClassKind::Final
        } else if self.is_abstract {
            ClassKind::Abstract
        } else {
            ClassKind::Concrete
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Interface,
    Final,
    Abstract,
    Concrete,
}

impl ClassKind {
    pub fn title_prefix(&self) -> &'static str {
        match self {
            Self::Interface => "Interface",
            Self::Final => "Final class",
            Self::Abstract => "Abstract class",
            Self::Concrete => "Class",
        }
    }
}

/// Reference to a parent class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef {
    pub name: String,
    pub is_abstract: bool,
}

/// One method, possibly inherited
#[derive(Debug, Clone, PartialEq)]
pub struct MethodMetadata {
    pub declaring_class: String,
    pub name: String,
    /// Sorted in reflection order
    pub modifiers: Vec<Modifier>,
    pub parameters: Vec<ParameterMetadata>,
    pub doc_comment: Option<String>,
}

impl MethodMetadata {
    pub fn new(declaring_class: &str, name: &str) -> Self {
        Self {
            declaring_class: declaring_class.to_string(),
            name: name.to_string(),
            modifiers: vec![Modifier::Public],
            parameters: Vec::new(),
            doc_comment: None,
        }
    }

    /// `Class:method`, used to name the method in errors
    pub fn target(&self) -> String {
        format!("{}:{}", self.declaring_class, self.name)
    }
}

/// One method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMetadata {
    pub name: String,
    pub is_optional: bool,
    /// Default value, when it reduces to a literal
    pub default: Option<DefaultValue>,
    /// Symbolic form of the default: the constant it names, or the
    /// expression text when it does not reduce to a literal
    pub default_constant: Option<String>,
    /// Type from the method's `@param` tag
    pub type_annotation: Option<String>,
}

impl ParameterMetadata {
    pub fn required(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_optional: false,
            default: None,
            default_constant: None,
            type_annotation: None,
        }
    }

    pub fn optional(name: &str, default: DefaultValue) -> Self {
        Self {
            is_optional: true,
            default: Some(default),
            ..Self::required(name)
        }
    }

    pub fn with_type(mut self, type_annotation: &str) -> Self {
        self.type_annotation = Some(type_annotation.to_string());
        self
    }

    pub fn with_constant(mut self, constant: &str) -> Self {
        self.default_constant = Some(constant.to_string());
        self
    }
}

/// A default parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Int(i64),
    Float(f64),
    Null,
    Bool(bool),
    Str(String),
    List(Vec<DefaultValue>),
    Map(Vec<(DefaultValue, DefaultValue)>),
}

impl DefaultValue {
    /// PHP literal for the value
    pub fn to_literal(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(f) => format!("{:?}", f),
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Str(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Self::List(items) => {
                let items: Vec<String> = items.iter().map(Self::to_literal).collect();
                format!("[{}]", items.join(", "))
            }
            Self::Map(entries) => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{} => {}", k.to_literal(), v.to_literal()))
                    .collect();
                format!("[{}]", entries.join(", "))
            }
        }
    }
}
