//! Content source adapters.
//!
//! Turn content files into [`NewPage`](crate::page::NewPage) records:
//!
//! - **markdown**: YAML front matter + CommonMark body
//!
//! The built-in `markdown` plugin exposes the adapter to `[[plugins]]`.

pub mod markdown;

pub use markdown::{MarkdownComponent, MarkdownOptions, MarkdownPlugin};
