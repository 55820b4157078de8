// Parser module for extracting declarations and doc comments from PHP source

pub mod ast;
pub mod docblock;
mod php;

pub use ast::*;
pub use docblock::DocBlock;
pub use php::PhpParser;
