//! Pages: the units of output.
//!
//! A [`NewPage`] is the partial shape handed to the registry; the registry fills in
//! defaults and stores the resulting [`Page`] behind an `Arc`.
//!
//! # Defaults
//!
//! | Field  | Default                                          |
//! |--------|--------------------------------------------------|
//! | `data` | empty map                                        |
//! | `name` | file stem of `path`, else file stem of `source`  |
//! | `path` | `<name>.html`                                    |
//! | `url`  | `./<name>`                                       |

mod registry;

pub use registry::{Actions, PageRegistry};

use crate::render::Component;
use educe::Educe;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arbitrary page metadata (front matter, title, layout, navigation links...).
pub type PageData = serde_json::Map<String, Value>;

/// Extension of rendered output files.
pub const OUTPUT_EXTENSION: &str = "html";

/// Registry-assigned page identity.
///
/// Two pages with the same `path` are still distinct pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(u64);

/// One unit of output content.
#[derive(Educe)]
#[educe(Debug)]
pub struct Page {
    id: PageId,
    /// Arbitrary metadata
    pub data: PageData,
    /// Renderable body
    #[educe(Debug(ignore))]
    pub component: Arc<dyn Component>,
    /// Identifier, usually the source file stem
    pub name: String,
    /// Output file path relative to the output directory
    pub path: PathBuf,
    /// Canonical relative URL
    pub url: String,
    /// Source file, when the page came from a content file
    pub source: Option<PathBuf>,
}

impl Page {
    pub const fn id(&self) -> PageId {
        self.id
    }

    /// String value of a `data` entry.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Page title from `data.title`, falling back to the page name.
    pub fn title(&self) -> &str {
        self.data_str("title").unwrap_or(&self.name)
    }
}

/// Partial page passed to [`PageRegistry::create_page`].
#[derive(Educe)]
#[educe(Debug)]
pub struct NewPage {
    pub data: Option<PageData>,
    #[educe(Debug(ignore))]
    pub component: Arc<dyn Component>,
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    pub url: Option<String>,
    pub source: Option<PathBuf>,
}

impl NewPage {
    pub fn new(component: Arc<dyn Component>) -> Self {
        Self {
            data: None,
            component,
            name: None,
            path: None,
            url: None,
            source: None,
        }
    }

    pub fn data(mut self, data: PageData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Fill in defaults and attach an identity.
    ///
    /// A page with neither `name`, `path` nor `source` keeps an empty path; it is
    /// rejected when rendering starts, not here.
    fn normalize(self, id: PageId) -> Page {
        let name = self
            .name
            .or_else(|| self.path.as_deref().and_then(base_name))
            .or_else(|| self.source.as_deref().and_then(file_stem))
            .unwrap_or_default();

        let path = self.path.unwrap_or_else(|| {
            if name.is_empty() {
                PathBuf::new()
            } else {
                PathBuf::from(format!("{name}.{OUTPUT_EXTENSION}"))
            }
        });
        let url = self.url.unwrap_or_else(|| format!("./{name}"));

        Page {
            id,
            data: self.data.unwrap_or_default(),
            component: self.component,
            name,
            path,
            url,
            source: self.source,
        }
    }
}

/// File name of an output path without the `.html` extension.
fn base_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let suffix = format!(".{OUTPUT_EXTENSION}");
    Some(name.strip_suffix(&suffix).unwrap_or(&name).to_owned())
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}
