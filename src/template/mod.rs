//! CloudFormation template loading
//!
//! Short-hand intrinsic tags are expanded at load time; nothing is
//! resolved or evaluated.

pub mod loader;
pub mod tags;

pub use loader::{load_template, Document, TemplateLoader};
pub use tags::{IntrinsicTag, TagArity};
