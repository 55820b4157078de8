// reStructuredText rendering of one class
//
// Sections are emitted in a fixed order: title, extends, implements, source
// link, class description and code sample, then the method list.

use crate::error::Result;
use crate::metadata::{in_namespace, ClassMetadata};
use crate::output::signature::render_method;
use crate::parser::DocBlock;

/// Renders the API page of one class
pub struct ClassDescriptor<'a> {
    class: &'a ClassMetadata,
    namespace: &'a str,
    /// Link template with a `{path}` placeholder
    source_url: &'a str,
}

impl<'a> ClassDescriptor<'a> {
    pub fn new(class: &'a ClassMetadata, namespace: &'a str, source_url: &'a str) -> Self {
        Self {
            class,
            namespace,
            source_url,
        }
    }

    /// Render the whole page
    pub fn render(&self) -> Result<String> {
        let mut rst = String::new();
        rst.push_str(&self.title());
        rst.push_str(&self.extends());
        rst.push_str(&self.implements());
        rst.push_str(&self.source_link());

        if let Some(raw) = &self.class.doc_comment {
            let doc = DocBlock::parse(raw, true, &self.class.name)?;
            rst.push_str(&description(&doc));
            rst.push_str(&code_block(&doc));
        }

        rst.push_str(&self.methods()?);
        Ok(rst)
    }

    pub fn title(&self) -> String {
        let title = format!(
            "{} **{}**",
            self.class.kind().title_prefix(),
            escape(&self.class.name)
        );
        let rule = "=".repeat(title.chars().count());
        format!("{}\n{}\n\n", title, rule)
    }

    pub fn extends(&self) -> String {
        let Some(parent) = &self.class.parent else {
            return String::new();
        };

        if in_namespace(&parent.name, self.namespace) {
            let role = if parent.is_abstract {
                "abstract class"
            } else {
                "class"
            };
            format!("*extends* {} {}\n\n", role, doc_link(&parent.name))
        } else {
            format!("*extends* {}\n\n", parent.name)
        }
    }

    pub fn implements(&self) -> String {
        if self.class.interfaces.is_empty() {
            return String::new();
        }

        let mut names: Vec<&String> = self.class.interfaces.iter().collect();
        names.sort();

        let links: Vec<String> = names
            .into_iter()
            .map(|name| {
                if in_namespace(name, self.namespace) {
                    doc_link(name)
                } else {
                    name.clone()
                }
            })
            .collect();

        format!("*implements* {}\n\n", links.join(", "))
    }

    pub fn source_link(&self) -> String {
        let url = self
            .source_url
            .replace("{path}", &self.class.name.replace('\\', "/"));
        format!(
            ".. role:: raw-html(raw)\n   :format: html\n\n\
             :raw-html:`<a href=\"{}\" class=\"btn btn-default btn-sm\">Source on GitHub</a>`\n\n",
            url
        )
    }

    /// The `Methods` section; empty when the class has no methods
    pub fn methods(&self) -> Result<String> {
        if self.class.methods.is_empty() {
            return Ok(String::new());
        }

        let mut rst = String::from("Methods\n-------\n\n");
        for method in &self.class.methods {
            rst.push_str(&render_method(method, self.namespace));

            if let Some(raw) = &method.doc_comment {
                let doc = DocBlock::parse(raw, true, &method.target())?;
                rst.push_str("\n\n");
                rst.push_str(&doc.description.join("\n\n"));
                rst.push_str("\n\n");
                rst.push_str(&code_block(&doc));
            }

            rst.push_str("\n\n");
        }

        Ok(rst)
    }
}

/// Backslashes are escapes in RST text
fn escape(name: &str) -> String {
    name.replace('\\', "\\\\")
}

/// `:doc:` reference to another class page
fn doc_link(name: &str) -> String {
    format!(":doc:`{} <{}>`", escape(name), name.replace('\\', "_"))
}

fn description(doc: &DocBlock) -> String {
    if doc.description.is_empty() {
        String::new()
    } else {
        format!("{}\n\n", doc.description.join("\n\n"))
    }
}

fn code_block(doc: &DocBlock) -> String {
    let Some(lines) = &doc.code else {
        return String::new();
    };

    let mut rst = String::from("\n\n.. code-block:: php\n\n    <?php\n\n");
    for line in lines {
        rst.push_str("    ");
        rst.push_str(line);
        rst.push('\n');
    }
    rst
}
