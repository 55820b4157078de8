// PHP parser using tree-sitter
//
// Extracts type declarations the way PHP reflection would see them once the
// file is loaded: names are resolved against the file's namespace and `use`
// imports, default values are kept as constant expressions.

use crate::error::{Error, Result};
use crate::parser::ast::*;
use std::collections::HashMap;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;
use tree_sitter::{Node, Parser};

/// Parser for PHP source files
pub struct PhpParser {
    parser: Parser,
}

impl PhpParser {
    /// Create a new PHP parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_php::language_php();
        parser
            .set_language(&language)
            .map_err(|e| Error::Parser(format!("Failed to set PHP language: {}", e)))?;
        Ok(Self { parser })
    }

    /// Parse a PHP file.
    ///
    /// Sources are not required to be UTF-8; invalid bytes (a Latin-1
    /// comment, say) are replaced rather than rejected.
    pub fn parse_file(&mut self, path: &Path) -> Result<ParsedFile> {
        let bytes = std::fs::read(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
        })?;

        self.parse_source(&String::from_utf8_lossy(&bytes), path.to_path_buf())
    }

    /// Parse PHP source code
    pub fn parse_source(&mut self, source: &str, path: PathBuf) -> Result<ParsedFile> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parser("Failed to parse source"))?;

        let root = tree.root_node();
        let mut file = ParsedFile::new(path);
        file.has_errors = root.has_error();

        let mut scope = Scope::default();
        walk_statements(&root, source.as_bytes(), &mut scope, &mut file);

        Ok(file)
    }
}

/// Namespace and imports in effect at a point in the file
#[derive(Debug, Default)]
struct Scope {
    namespace: String,
    /// Lowercased alias -> fully qualified name
    imports: HashMap<String, String>,
}

impl Scope {
    fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.trim_start_matches('\\').to_string(),
            imports: HashMap::new(),
        }
    }

    /// Prefix a declared name with the current namespace
    fn qualify(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}\\{}", self.namespace, name)
        }
    }

    /// Resolve a class name reference to its fully qualified form
    fn resolve(&self, name: &str) -> String {
        if let Some(qualified) = name.strip_prefix('\\') {
            return qualified.to_string();
        }

        let (first, rest) = match name.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };

        if first.eq_ignore_ascii_case("namespace") {
            if let Some(rest) = rest {
                return self.qualify(rest);
            }
        }

        match (self.imports.get(&first.to_ascii_lowercase()), rest) {
            (Some(target), Some(rest)) => format!("{}\\{}", target, rest),
            (Some(target), None) => target.clone(),
            (None, _) => self.qualify(name),
        }
    }

    /// Record the imports of a `use` statement
    fn add_imports(&mut self, statement: &str) {
        let statement = statement.trim().trim_end_matches(';').trim();
        let Some(body) = strip_keyword(statement, "use") else {
            return;
        };
        if strip_keyword(body, "function").is_some() || strip_keyword(body, "const").is_some() {
            return;
        }

        let items: Vec<String> = match body.split_once('{') {
            Some((prefix, group)) => {
                let prefix = prefix.trim().trim_end_matches('\\');
                group
                    .trim_end_matches('}')
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| format!("{}\\{}", prefix, item))
                    .collect()
            }
            None => body
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        };

        for item in items {
            let tokens: Vec<&str> = item.split_whitespace().collect();
            let (target, alias) = match tokens.as_slice() {
                [target] => (*target, None),
                [target, kw, alias] if kw.eq_ignore_ascii_case("as") => (*target, Some(*alias)),
                _ => continue,
            };
            let target = target.trim_start_matches('\\');
            let alias = alias.unwrap_or_else(|| target.rsplit('\\').next().unwrap_or(target));
            self.imports
                .insert(alias.to_ascii_lowercase(), target.to_string());
        }
    }
}

/// Name resolution inside a class body
struct ClassContext<'a> {
    scope: &'a Scope,
    class: &'a str,
    parent: Option<&'a str>,
}

impl ClassContext<'_> {
    fn resolve(&self, name: &str) -> String {
        match name.to_ascii_lowercase().as_str() {
            "self" | "static" => self.class.to_string(),
            "parent" => self.parent.unwrap_or(name).to_string(),
            _ => self.scope.resolve(name),
        }
    }
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    let rest = &text[keyword.len()..];
    if head.eq_ignore_ascii_case(keyword) && rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn find_child<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Keywords written between the start of a declaration and its name
fn leading_keywords<'a>(node: &Node, name: &Node, source: &'a [u8]) -> Vec<&'a str> {
    source
        .get(node.start_byte()..name.start_byte())
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .map(|text| text.split_whitespace().collect())
        .unwrap_or_default()
}

/// The `/** ... */` comment directly before a declaration
fn doc_comment(node: &Node, source: &[u8]) -> Option<String> {
    let prev = node.prev_named_sibling()?;
    if prev.kind() != "comment" {
        return None;
    }
    let text = node_text(&prev, source);
    text.starts_with("/**").then(|| text.to_string())
}

fn walk_statements(node: &Node, source: &[u8], scope: &mut Scope, file: &mut ParsedFile) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "namespace_definition" => {
                let name = child
                    .child_by_field_name("name")
                    .or_else(|| find_child(&child, "namespace_name"))
                    .map(|n| node_text(&n, source))
                    .unwrap_or("");

                match child.child_by_field_name("body") {
                    Some(body) => {
                        let mut inner = Scope::new(name);
                        walk_statements(&body, source, &mut inner, file);
                    }
                    None => *scope = Scope::new(name),
                }
            }
            "namespace_use_declaration" => scope.add_imports(node_text(&child, source)),
            "class_declaration" | "interface_declaration" | "trait_declaration" => {
                if let Some(decl) = parse_declaration(&child, source, scope) {
                    file.declarations.push(decl);
                }
            }
            _ => {}
        }
    }
}

fn parse_declaration(node: &Node, source: &[u8], scope: &Scope) -> Option<Declaration> {
    let kind = match node.kind() {
        "interface_declaration" => DeclarationKind::Interface,
        "trait_declaration" => DeclarationKind::Trait,
        _ => DeclarationKind::Class,
    };

    let name_node = node.child_by_field_name("name")?;
    let name = scope.qualify(node_text(&name_node, source));
    let mut decl = Declaration::new(&name, kind);
    decl.doc_comment = doc_comment(node, source);

    for keyword in leading_keywords(node, &name_node, source) {
        match keyword.to_ascii_lowercase().as_str() {
            "abstract" => decl.is_abstract = true,
            "final" => decl.is_final = true,
            _ => {}
        }
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "base_clause" => {
                let names = clause_names(&child, source, scope);
                if kind == DeclarationKind::Interface {
                    decl.interfaces.extend(names);
                } else {
                    decl.parent = names.into_iter().next();
                }
            }
            "class_interface_clause" => decl.interfaces.extend(clause_names(&child, source, scope)),
            _ => {}
        }
    }

    if let Some(body) = node.child_by_field_name("body") {
        let class = decl.name.clone();
        let parent = decl.parent.clone();
        let ctx = ClassContext {
            scope,
            class: &class,
            parent: parent.as_deref(),
        };
        parse_body(&body, source, &ctx, &mut decl);
    }

    Some(decl)
}

/// Names listed by an `extends` / `implements` clause
fn clause_names(clause: &Node, source: &[u8], scope: &Scope) -> Vec<String> {
    let text = node_text(clause, source);
    let list = text
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest)
        .unwrap_or("");

    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| scope.resolve(name))
        .collect()
}

fn parse_body(body: &Node, source: &[u8], ctx: &ClassContext, decl: &mut Declaration) {
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        match child.kind() {
            "method_declaration" => {
                if let Some(method) = parse_method(&child, source, ctx) {
                    decl.methods.push(method);
                }
            }
            "const_declaration" => decl.constants.extend(parse_constants(&child, source, ctx)),
            "use_declaration" => decl.traits.extend(trait_names(node_text(&child, source), ctx)),
            _ => {}
        }
    }
}

/// Traits named by `use A, B;` or `use A, B { ... }` inside a class body
fn trait_names(text: &str, ctx: &ClassContext) -> Vec<String> {
    let Some(rest) = strip_keyword(text, "use") else {
        return Vec::new();
    };
    let list = rest.split(|c| c == '{' || c == ';').next().unwrap_or("");

    list.split(',')
        .map(str::trim)
        .filter(|name| is_name(name))
        .map(|name| ctx.scope.resolve(name))
        .collect()
}

fn parse_constants(node: &Node, source: &[u8], ctx: &ClassContext) -> Vec<Constant> {
    let mut constants = Vec::new();
    let mut cursor = node.walk();

    for element in node.named_children(&mut cursor) {
        if element.kind() != "const_element" {
            continue;
        }
        let mut inner = element.walk();
        let parts: Vec<Node> = element.named_children(&mut inner).collect();
        if let (Some(name), Some(value)) = (parts.first(), parts.last()) {
            if parts.len() >= 2 {
                constants.push(Constant {
                    name: node_text(name, source).to_string(),
                    value: parse_expr(value, source, ctx),
                });
            }
        }
    }

    constants
}

fn parse_method(node: &Node, source: &[u8], ctx: &ClassContext) -> Option<Method> {
    let name_node = node.child_by_field_name("name")?;
    let mut method = Method::new(node_text(&name_node, source));
    method.doc_comment = doc_comment(node, source);
    method.modifiers = leading_keywords(node, &name_node, source)
        .into_iter()
        .filter_map(Modifier::from_keyword)
        .collect();

    if let Some(params) = node.child_by_field_name("parameters") {
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if let Some(parameter) = parse_parameter(&param, source, ctx) {
                method.parameters.push(parameter);
            }
        }
    }

    Some(method)
}

fn parse_parameter(node: &Node, source: &[u8], ctx: &ClassContext) -> Option<Parameter> {
    if !matches!(
        node.kind(),
        "simple_parameter" | "variadic_parameter" | "property_promotion_parameter"
    ) {
        return None;
    }

    let name_node = node
        .child_by_field_name("name")
        .or_else(|| find_child(node, "variable_name"))?;
    let name = node_text(&name_node, source).trim_start_matches('&').trim_start_matches('$');

    let mut parameter = Parameter::new(name);
    parameter.variadic = node.kind() == "variadic_parameter";
    if let Some(default) = node.child_by_field_name("default_value") {
        parameter.default = Some(parse_expr(&default, source, ctx));
        parameter.default_text = Some(node_text(&default, source).to_string());
    }

    Some(parameter)
}

fn parse_expr(node: &Node, source: &[u8], ctx: &ClassContext) -> Expr {
    let text = node_text(node, source);
    match node.kind() {
        "array_creation_expression" => {
            let mut cursor = node.walk();
            let elements = node
                .named_children(&mut cursor)
                .filter(|c| c.kind() == "array_element_initializer")
                .map(|el| parse_array_element(&el, source, ctx))
                .collect::<Option<Vec<_>>>();
            match elements {
                Some(elements) => Expr::Array(elements),
                None => Expr::Raw(text.to_string()),
            }
        }
        "parenthesized_expression" => match node.named_child(0) {
            Some(inner) => parse_expr(&inner, source, ctx),
            None => Expr::Raw(text.to_string()),
        },
        _ => parse_scalar(text, ctx),
    }
}

fn parse_array_element(
    node: &Node,
    source: &[u8],
    ctx: &ClassContext,
) -> Option<(Option<Expr>, Expr)> {
    let mut cursor = node.walk();
    let parts: Vec<Node> = node.named_children(&mut cursor).collect();
    match parts.as_slice() {
        [value] => Some((None, parse_expr(value, source, ctx))),
        [key, value] => Some((
            Some(parse_expr(key, source, ctx)),
            parse_expr(value, source, ctx),
        )),
        _ => None,
    }
}

/// Read a scalar literal or constant reference from its source text
fn parse_scalar(text: &str, ctx: &ClassContext) -> Expr {
    let text = text.trim();
    match text.to_ascii_lowercase().as_str() {
        "null" => return Expr::Null,
        "true" => return Expr::Bool(true),
        "false" => return Expr::Bool(false),
        _ => {}
    }

    if let Some(value) = parse_int(text) {
        return Expr::Int(value);
    }
    if let Some(value) = parse_float(text) {
        return Expr::Float(value);
    }
    if let Some(value) = parse_string(text) {
        return Expr::Str(value);
    }

    if let Some((class, name)) = text.split_once("::") {
        if is_name(class) && is_identifier(name) {
            return Expr::ConstantRef {
                class: Some(ctx.resolve(class)),
                name: name.to_string(),
                text: text.to_string(),
            };
        }
    }

    if is_name(text) {
        return Expr::ConstantRef {
            class: None,
            name: text.trim_start_matches('\\').to_string(),
            text: text.to_string(),
        };
    }

    Expr::Raw(text.to_string())
}

fn parse_int(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    let lower = digits.to_ascii_lowercase();
    let value = if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()?
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()?
    } else if lower.len() > 1 && lower.starts_with('0') {
        i64::from_str_radix(&lower[1..], 8).ok()?
    } else if !lower.is_empty() && lower.chars().all(|c| c.is_ascii_digit()) {
        lower.parse().ok()?
    } else {
        return None;
    };

    Some(if negative { -value } else { value })
}

fn parse_float(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();
    let numeric = cleaned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !numeric || !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}

fn parse_string(text: &str) -> Option<String> {
    let text = text
        .strip_prefix('b')
        .or_else(|| text.strip_prefix('B'))
        .unwrap_or(text);
    if text.len() < 2 {
        return None;
    }

    if text.starts_with('\'') && text.ends_with('\'') {
        let inner = &text[1..text.len() - 1];
        let mut out = String::new();
        let mut chars = inner.chars().peekable();
        while let Some(c) = chars.next() {
            match (c, chars.peek()) {
                ('\\', Some(&next @ ('\\' | '\''))) => {
                    out.push(next);
                    chars.next();
                }
                _ => out.push(c),
            }
        }
        return Some(out);
    }

    if text.starts_with('"') && text.ends_with('"') {
        return parse_double_quoted(&text[1..text.len() - 1]);
    }

    None
}

/// Decode a double-quoted body. Octal and `\x` escapes produce raw bytes,
/// so the result is built as bytes and read back lossily.
fn parse_double_quoted(inner: &str) -> Option<String> {
    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            // interpolation cannot be read statically
            '$' => return None,
            '\\' => {
                let Some(&next) = chars.peek() else {
                    out.push(b'\\');
                    break;
                };
                let simple = match next {
                    'n' => Some(b'\n'),
                    't' => Some(b'\t'),
                    'r' => Some(b'\r'),
                    'v' => Some(0x0b),
                    'e' => Some(0x1b),
                    'f' => Some(0x0c),
                    '\\' | '$' | '"' => Some(next as u8),
                    _ => None,
                };
                if let Some(byte) = simple {
                    chars.next();
                    out.push(byte);
                } else if let Some(byte) = take_digits(&mut chars, 8, 3) {
                    out.push(byte as u8);
                } else if next == 'x' {
                    chars.next();
                    match take_digits(&mut chars, 16, 2) {
                        Some(byte) => out.push(byte as u8),
                        None => out.extend_from_slice(b"\\x"),
                    }
                } else if next == 'u' {
                    chars.next();
                    match take_codepoint(&mut chars) {
                        Some(ch) => push_char(&mut out, ch),
                        None => out.extend_from_slice(b"\\u"),
                    }
                } else {
                    out.push(b'\\');
                }
            }
            _ => push_char(&mut out, c),
        }
    }
    Some(String::from_utf8_lossy(&out).into_owned())
}

/// Consume up to `max` digits of `radix`; octal values wrap to a byte
fn take_digits(chars: &mut Peekable<Chars>, radix: u32, max: usize) -> Option<u32> {
    let mut value: Option<u32> = None;
    for _ in 0..max {
        let Some(digit) = chars.peek().and_then(|c| c.to_digit(radix)) else {
            break;
        };
        chars.next();
        value = Some(value.unwrap_or(0) * radix + digit);
    }
    value.map(|v| v & 0xff)
}

/// `{hex}` after `\u`; the input is left alone when it is not well formed
fn take_codepoint(chars: &mut Peekable<Chars>) -> Option<char> {
    let rest: String = chars.clone().collect();
    let body = rest.strip_prefix('{')?;
    let (hex, _) = body.split_once('}')?;
    let ch = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)?;
    for _ in 0..hex.len() + 2 {
        chars.next();
    }
    Some(ch)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_name(text: &str) -> bool {
    let trimmed = text.trim_start_matches('\\');
    !trimmed.is_empty() && trimmed.split('\\').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParsedFile {
        let mut parser = PhpParser::new().unwrap();
        parser
            .parse_source(source, PathBuf::from("/lib/ManaPHP/Test.php"))
            .unwrap()
    }

    fn scope() -> Scope {
        let mut scope = Scope::new("ManaPHP\\Http");
        scope.add_imports("use ManaPHP\\Di\\Container, ManaPHP\\Event\\Listener as Hook;");
        scope
    }

    #[test]
    fn test_parser_new() {
        assert!(PhpParser::new().is_ok());
    }

    #[test]
    fn test_empty_file() {
        let file = parse("<?php\n");
        assert!(file.is_empty());
        assert!(!file.has_errors);
    }

    #[test]
    fn test_syntax_error_flagged() {
        let file = parse("<?php\nclass {\n");
        assert!(file.has_errors);
    }

    #[test]
    fn test_namespaced_class() {
        let file = parse("<?php\nnamespace ManaPHP\\Http;\n\nclass Request\n{\n}\n");
        assert_eq!(file.declarations.len(), 1);
        let decl = &file.declarations[0];
        assert_eq!(decl.name, "ManaPHP\\Http\\Request");
        assert_eq!(decl.kind, DeclarationKind::Class);
    }

    #[test]
    fn test_braced_namespace() {
        let file = parse("<?php\nnamespace ManaPHP {\n    interface Component {}\n}\n");
        assert_eq!(file.declarations[0].name, "ManaPHP\\Component");
        assert!(file.declarations[0].is_interface());
    }

    #[test]
    fn test_class_modifiers() {
        let file = parse("<?php\nnamespace A;\nabstract class B {}\nfinal class C {}\n");
        assert!(file.declarations[0].is_abstract);
        assert!(!file.declarations[0].is_final);
        assert!(file.declarations[1].is_final);
    }

    #[test]
    fn test_extends_and_implements_resolved() {
        let source = r#"<?php
namespace ManaPHP\Http;

use ManaPHP\Component;
use ManaPHP\Http\Cookies\CookiesInterface as Cookies;

class Response extends Component implements ResponseInterface, Cookies, \JsonSerializable
{
}
"#;
        let file = parse(source);
        let decl = &file.declarations[0];
        assert_eq!(decl.parent.as_deref(), Some("ManaPHP\\Component"));
        assert_eq!(
            decl.interfaces,
            vec![
                "ManaPHP\\Http\\ResponseInterface".to_string(),
                "ManaPHP\\Http\\Cookies\\CookiesInterface".to_string(),
                "JsonSerializable".to_string(),
            ]
        );
    }

    #[test]
    fn test_interface_extends_many() {
        let file = parse("<?php\nnamespace A;\ninterface B extends C, \\D {}\n");
        let decl = &file.declarations[0];
        assert!(decl.parent.is_none());
        assert_eq!(decl.interfaces, vec!["A\\C".to_string(), "D".to_string()]);
    }

    #[test]
    fn test_doc_comments_attached() {
        let source = r#"<?php
namespace A;

/**
 * Class B
 */
class B
{
    /**
     * Run it.
     */
    public function run()
    {
    }

    // not a doc comment
    public function stop()
    {
    }
}
"#;
        let file = parse(source);
        let decl = &file.declarations[0];
        assert_eq!(decl.doc_comment.as_deref(), Some("/**\n * Class B\n */"));
        assert_eq!(
            decl.methods[0].doc_comment.as_deref(),
            Some("/**\n     * Run it.\n     */")
        );
        assert!(decl.methods[1].doc_comment.is_none());
    }

    #[test]
    fn test_method_modifiers_and_parameters() {
        let source = r#"<?php
namespace A;

abstract class B
{
    const MODE = 2;

    final public static function make($name, $options = [], ...$rest)
    {
    }

    abstract protected function handle($mode = self::MODE, $flag = true);
}
"#;
        let file = parse(source);
        let decl = &file.declarations[0];
        assert_eq!(decl.constant("MODE").map(|c| &c.value), Some(&Expr::Int(2)));

        let make = &decl.methods[0];
        assert_eq!(make.name, "make");
        assert_eq!(
            make.modifiers,
            vec![Modifier::Final, Modifier::Public, Modifier::Static]
        );
        let names: Vec<&str> = make.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "options", "rest"]);
        assert!(make.parameters[0].default.is_none());
        assert_eq!(make.parameters[1].default, Some(Expr::Array(vec![])));
        assert!(make.parameters[2].variadic);

        let handle = &decl.methods[1];
        assert_eq!(handle.modifiers, vec![Modifier::Abstract, Modifier::Protected]);
        assert_eq!(
            handle.parameters[0].default,
            Some(Expr::ConstantRef {
                class: Some("A\\B".to_string()),
                name: "MODE".to_string(),
                text: "self::MODE".to_string(),
            })
        );
        assert_eq!(handle.parameters[1].default, Some(Expr::Bool(true)));
    }

    #[test]
    fn test_array_default_with_keys() {
        let source = "<?php\nclass A {\n    public function f($a = ['x' => 1, 'y'], $b = array(1, -2)) {}\n}\n";
        let file = parse(source);
        let params = &file.declarations[0].methods[0].parameters;
        assert_eq!(
            params[0].default,
            Some(Expr::Array(vec![
                (Some(Expr::Str("x".to_string())), Expr::Int(1)),
                (None, Expr::Str("y".to_string())),
            ]))
        );
        assert_eq!(
            params[1].default,
            Some(Expr::Array(vec![(None, Expr::Int(1)), (None, Expr::Int(-2))]))
        );
        assert_eq!(params[1].default_text.as_deref(), Some("array(1, -2)"));
    }

    #[test]
    fn test_trait_declaration() {
        let file = parse("<?php\nnamespace A;\ntrait Loggable {}\n");
        assert_eq!(file.declarations[0].kind, DeclarationKind::Trait);
    }

    #[test]
    fn test_trait_use_resolved() {
        let file = parse(
            "<?php\nnamespace ManaPHP;\nuse ManaPHP\\Di\\InjectableTrait;\nclass Component\n{\n    use InjectableTrait, \\Psr\\LoggerTrait {\n        InjectableTrait::getShared insteadof LoggerTrait;\n    }\n}\n",
        );
        assert!(!file.has_errors);
        assert_eq!(
            file.declarations[0].traits,
            vec!["ManaPHP\\Di\\InjectableTrait".to_string(), "Psr\\LoggerTrait".to_string()]
        );
    }

    #[test]
    fn test_scope_resolve() {
        let scope = scope();
        assert_eq!(scope.resolve("Request"), "ManaPHP\\Http\\Request");
        assert_eq!(scope.resolve("Container"), "ManaPHP\\Di\\Container");
        assert_eq!(scope.resolve("hook"), "ManaPHP\\Event\\Listener");
        assert_eq!(scope.resolve("Container\\Sub"), "ManaPHP\\Di\\Container\\Sub");
        assert_eq!(scope.resolve("\\Exception"), "Exception");
        assert_eq!(scope.resolve("namespace\\Cookie"), "ManaPHP\\Http\\Cookie");
    }

    #[test]
    fn test_group_use_and_function_use() {
        let mut scope = Scope::new("App");
        scope.add_imports("use ManaPHP\\Db\\{Query, Model as M};");
        scope.add_imports("use function ManaPHP\\helper;");
        assert_eq!(scope.resolve("Query"), "ManaPHP\\Db\\Query");
        assert_eq!(scope.resolve("M"), "ManaPHP\\Db\\Model");
        assert_eq!(scope.resolve("helper"), "App\\helper");
    }

    #[test]
    fn test_parse_scalar_literals() {
        let scope = scope();
        let ctx = ClassContext {
            scope: &scope,
            class: "ManaPHP\\Http\\Client",
            parent: Some("ManaPHP\\Component"),
        };
        assert_eq!(parse_scalar("NULL", &ctx), Expr::Null);
        assert_eq!(parse_scalar("False", &ctx), Expr::Bool(false));
        assert_eq!(parse_scalar("0x1F", &ctx), Expr::Int(31));
        assert_eq!(parse_scalar("0755", &ctx), Expr::Int(493));
        assert_eq!(parse_scalar("- 3", &ctx), Expr::Int(-3));
        assert_eq!(parse_scalar("1_000", &ctx), Expr::Int(1000));
        assert_eq!(parse_scalar("0.5", &ctx), Expr::Float(0.5));
        assert_eq!(parse_scalar("'it\\'s'", &ctx), Expr::Str("it's".to_string()));
        assert_eq!(parse_scalar("\"a\\tb\"", &ctx), Expr::Str("a\tb".to_string()));
        assert_eq!(parse_scalar("\"$x\"", &ctx), Expr::Raw("\"$x\"".to_string()));
        assert_eq!(parse_scalar("\"\\x41\\101\"", &ctx), Expr::Str("AA".to_string()));
        assert_eq!(parse_scalar("\"\\u{e9}t\\u{1F600}\"", &ctx), Expr::Str("\u{e9}t\u{1F600}".to_string()));
        assert_eq!(parse_scalar("\"\\0\"", &ctx), Expr::Str("\0".to_string()));
        assert_eq!(parse_scalar("\"\\xZ\\d\"", &ctx), Expr::Str("\\xZ\\d".to_string()));
        assert_eq!(
            parse_scalar("parent::TIMEOUT", &ctx),
            Expr::ConstantRef {
                class: Some("ManaPHP\\Component".to_string()),
                name: "TIMEOUT".to_string(),
                text: "parent::TIMEOUT".to_string(),
            }
        );
        assert_eq!(
            parse_scalar("\\PHP_EOL", &ctx),
            Expr::ConstantRef {
                class: None,
                name: "PHP_EOL".to_string(),
                text: "\\PHP_EOL".to_string(),
            }
        );
        assert_eq!(parse_scalar("1 + 2", &ctx), Expr::Raw("1 + 2".to_string()));
    }
}
