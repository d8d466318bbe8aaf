//! Content module - loads, validates and renders posts

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::{FieldProblem, FrontMatter, FrontMatterError};
pub use loader::{ContentError, ContentLoader, PostIndex};
pub use markdown::MarkdownRenderer;
pub use post::{Post, PostMeta};
