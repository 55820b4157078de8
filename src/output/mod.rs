// Output generation module

pub mod descriptor;
pub mod generator;
pub mod signature;

pub use descriptor::ClassDescriptor;
pub use generator::{DocumentGenerator, GenerationReport};
pub use signature::{render_method, render_parameter};
