// Source registry
//
// Discovers and loads the library's source files, then answers reflection
// queries over everything that was loaded. Loading is append-only: a file is
// registered at most once and declarations are never replaced.

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::metadata::{
    in_namespace, ClassMetadata, ClassRef, DefaultValue, Introspector, MethodMetadata,
    ParameterMetadata,
};
use crate::parser::docblock::param_type;
use crate::parser::{
    Constant, Declaration, DeclarationKind, Expr, Method, Modifier, Parameter, ParsedFile,
    PhpParser,
};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// How many constant indirections are followed when resolving a default
const MAX_CONSTANT_DEPTH: usize = 16;

/// Loaded declarations of one class library
pub struct SourceRegistry {
    namespace: String,
    extension: String,
    parser: PhpParser,
    /// Files whose declarations were registered
    loaded: BTreeSet<PathBuf>,
    /// Lowercased name -> declaration (PHP names are case-insensitive)
    declarations: BTreeMap<String, Declaration>,
}

impl SourceRegistry {
    /// Create an empty registry for the given target namespace
    pub fn new(namespace: &str, extension: &str) -> Result<Self> {
        Ok(Self {
            namespace: namespace.to_string(),
            extension: extension.to_string(),
            parser: PhpParser::new()?,
            loaded: BTreeSet::new(),
            declarations: BTreeMap::new(),
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Self::new(&config.namespace, &config.extension)
    }

    /// Find source files under `root`, skipping dot files and directories
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let root = root
            .canonicalize()
            .map_err(|_| Error::PathNotFound(root.to_path_buf()))?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path
                .extension()
                .map_or(false, |ext| ext == self.extension.as_str())
            {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Load every file not loaded yet.
    ///
    /// Fails with [`Error::Registry`] naming each file that did not end up
    /// registered: syntax errors, no declarations, or a declaration that
    /// collides with one already loaded.
    pub fn load(&mut self, files: &[PathBuf]) -> Result<()> {
        for path in files {
            if self.loaded.contains(path) {
                continue;
            }

            let parsed = self.parser.parse_file(path)?;
            if self.can_register(&parsed) {
                for decl in parsed.declarations {
                    self.declarations.insert(decl.name.to_ascii_lowercase(), decl);
                }
                self.loaded.insert(path.clone());
            }
        }

        let failed: Vec<PathBuf> = files
            .iter()
            .filter(|f| !self.loaded.contains(*f))
            .cloned()
            .collect();

        if failed.is_empty() {
            Ok(())
        } else {
            Err(Error::Registry { files: failed })
        }
    }

    fn can_register(&self, file: &ParsedFile) -> bool {
        if file.has_errors || file.is_empty() {
            return false;
        }

        let mut seen = HashSet::new();
        file.declarations.iter().all(|decl| {
            let key = decl.name.to_ascii_lowercase();
            !self.declarations.contains_key(&key) && seen.insert(key)
        })
    }

    pub fn loaded_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.loaded.iter()
    }

    /// Classes and interfaces of the target namespace, sorted
    pub fn enumerate_target_classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self
            .declarations
            .values()
            .filter(|d| d.kind != DeclarationKind::Trait && in_namespace(&d.name, &self.namespace))
            .map(|d| d.name.clone())
            .collect();
        classes.sort();
        classes
    }

    /// Classes with no loaded file at `<Name/Space/Class>.<ext>`
    pub fn find_convention_violations(&self, classes: &[String]) -> Vec<String> {
        classes
            .iter()
            .filter(|class| {
                let expected = PathBuf::from(format!(
                    "{}.{}",
                    class.replace('\\', "/"),
                    self.extension
                ));
                !self.loaded.iter().any(|file| file.ends_with(&expected))
            })
            .cloned()
            .collect()
    }

    fn lookup(&self, name: &str) -> Option<&Declaration> {
        self.declarations
            .get(&name.trim_start_matches('\\').to_ascii_lowercase())
    }

    fn class_ref(&self, name: &str) -> ClassRef {
        match self.lookup(name) {
            Some(decl) => ClassRef {
                name: decl.name.clone(),
                is_abstract: decl.is_abstract || decl.is_interface(),
            },
            None => ClassRef {
                name: name.to_string(),
                is_abstract: false,
            },
        }
    }

    fn collect_interfaces(
        &self,
        decl: &Declaration,
        found: &mut BTreeSet<String>,
        visited: &mut HashSet<String>,
    ) {
        if !visited.insert(decl.name.to_ascii_lowercase()) {
            return;
        }

        for name in &decl.interfaces {
            match self.lookup(name) {
                Some(iface) => {
                    found.insert(iface.name.clone());
                    self.collect_interfaces(iface, found, visited);
                }
                None => {
                    found.insert(name.clone());
                }
            }
        }

        if let Some(parent) = decl.parent.as_deref().and_then(|p| self.lookup(p)) {
            self.collect_interfaces(parent, found, visited);
        }
    }

    /// Own and trait methods first, then the parent chain, then interfaces
    fn collect_methods(
        &self,
        decl: &Declaration,
        methods: &mut Vec<MethodMetadata>,
        seen: &mut HashSet<String>,
        visited: &mut HashSet<String>,
    ) {
        if !visited.insert(decl.name.to_ascii_lowercase()) {
            return;
        }

        let from_traits = self.trait_methods(decl, &mut HashSet::new());
        for method in decl.methods.iter().chain(from_traits) {
            if seen.insert(method.name.to_ascii_lowercase()) {
                methods.push(self.method_metadata(decl, method));
            }
        }

        if let Some(parent) = decl.parent.as_deref().and_then(|p| self.lookup(p)) {
            self.collect_methods(parent, methods, seen, visited);
        }

        for iface in decl.interfaces.iter().filter_map(|i| self.lookup(i)) {
            self.collect_methods(iface, methods, seen, visited);
        }
    }

    /// Methods copied in from `use`d traits, nested traits included
    fn trait_methods<'a>(
        &'a self,
        decl: &'a Declaration,
        visited: &mut HashSet<String>,
    ) -> Vec<&'a Method> {
        let mut methods = Vec::new();
        for used in decl.traits.iter().filter_map(|name| self.lookup(name)) {
            if visited.insert(used.name.to_ascii_lowercase()) {
                methods.extend(used.methods.iter());
                methods.extend(self.trait_methods(used, visited));
            }
        }
        methods
    }

    fn method_metadata(&self, decl: &Declaration, method: &Method) -> MethodMetadata {
        let mut modifiers = method.modifiers.clone();
        if decl.is_interface() {
            modifiers.push(Modifier::Abstract);
        }
        if !modifiers.iter().any(Modifier::is_visibility) {
            modifiers.push(Modifier::Public);
        }
        modifiers.sort();
        modifiers.dedup();

        let doc = method.doc_comment.as_deref();
        let parameters = method
            .parameters
            .iter()
            .enumerate()
            .map(|(i, param)| {
                // a default followed by a required parameter is unusable
                let is_optional = method.parameters[i..].iter().all(Parameter::has_default);
                let mut meta = ParameterMetadata::required(&param.name);
                meta.is_optional = is_optional;
                meta.type_annotation = doc.and_then(|d| param_type(d, &param.name));
                if is_optional {
                    let (value, constant) = self.default_of(param);
                    meta.default = value;
                    meta.default_constant = constant;
                }
                meta
            })
            .collect();

        MethodMetadata {
            declaring_class: decl.name.clone(),
            name: method.name.clone(),
            modifiers,
            parameters,
            doc_comment: method.doc_comment.clone(),
        }
    }

    fn default_of(&self, param: &Parameter) -> (Option<DefaultValue>, Option<String>) {
        let Some(expr) = &param.default else {
            return (None, None);
        };

        let value = self.evaluate(expr, 0);
        let constant = match expr {
            Expr::ConstantRef { text, .. } => Some(text.clone()),
            _ if value.is_none() => param.default_text.clone(),
            _ => None,
        };
        (value, constant)
    }

    fn evaluate(&self, expr: &Expr, depth: usize) -> Option<DefaultValue> {
        if depth > MAX_CONSTANT_DEPTH {
            return None;
        }

        match expr {
            Expr::Int(n) => Some(DefaultValue::Int(*n)),
            Expr::Float(f) => Some(DefaultValue::Float(*f)),
            Expr::Null => Some(DefaultValue::Null),
            Expr::Bool(b) => Some(DefaultValue::Bool(*b)),
            Expr::Str(s) => Some(DefaultValue::Str(s.clone())),
            Expr::Array(elements) => self.evaluate_array(elements, depth),
            Expr::ConstantRef {
                class: Some(class),
                name,
                ..
            } => {
                let mut visited = HashSet::new();
                let constant = self.find_constant(class, name, &mut visited)?;
                self.evaluate(&constant.value, depth + 1)
            }
            Expr::ConstantRef { class: None, .. } | Expr::Raw(_) => None,
        }
    }

    fn evaluate_array(&self, elements: &[(Option<Expr>, Expr)], depth: usize) -> Option<DefaultValue> {
        if elements.iter().all(|(key, _)| key.is_none()) {
            return elements
                .iter()
                .map(|(_, value)| self.evaluate(value, depth))
                .collect::<Option<Vec<_>>>()
                .map(DefaultValue::List);
        }

        // None once an integer key reaches i64::MAX; appending after that
        // is an error in PHP, so the array stays unresolved
        let mut next_index = Some(0);
        let mut entries = Vec::new();
        for (key, value) in elements {
            let key = match key {
                Some(key) => self.evaluate(key, depth)?,
                None => DefaultValue::Int(next_index?),
            };
            if let DefaultValue::Int(n) = key {
                next_index = next_index.and_then(|next| n.checked_add(1).map(|after| next.max(after)));
            }
            entries.push((key, self.evaluate(value, depth)?));
        }
        Some(DefaultValue::Map(entries))
    }

    /// Class constant lookup through parents and interfaces
    fn find_constant(
        &self,
        class: &str,
        name: &str,
        visited: &mut HashSet<String>,
    ) -> Option<&Constant> {
        let decl = self.lookup(class)?;
        if !visited.insert(decl.name.to_ascii_lowercase()) {
            return None;
        }

        if let Some(constant) = decl.constant(name) {
            return Some(constant);
        }

        decl.parent
            .iter()
            .chain(decl.interfaces.iter())
            .find_map(|other| self.find_constant(other, name, visited))
    }
}

impl Introspector for SourceRegistry {
    fn class_metadata(&self, name: &str) -> Option<ClassMetadata> {
        let decl = self.lookup(name)?;

        let mut class = ClassMetadata::new(&decl.name);
        class.is_interface = decl.is_interface();
        class.is_abstract = decl.is_abstract || decl.is_interface();
        class.is_final = decl.is_final;
        class.doc_comment = decl.doc_comment.clone();

        if !decl.is_interface() {
            class.parent = decl.parent.as_deref().map(|p| self.class_ref(p));
        }

        let mut interfaces = BTreeSet::new();
        self.collect_interfaces(decl, &mut interfaces, &mut HashSet::new());
        class.interfaces = interfaces.into_iter().collect();

        let mut methods = Vec::new();
        self.collect_methods(decl, &mut methods, &mut HashSet::new(), &mut HashSet::new());
        class.methods = methods;

        Some(class)
    }
}

/// Dot files and directories
pub(crate) fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map_or(false, |name| name.starts_with('.'))
}
