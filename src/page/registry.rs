//! Ordered in-memory page collection.

use super::{NewPage, Page, PageId};
use std::sync::Arc;

/// Ordered collection of pages for one build.
///
/// Mutations are synchronous and immediately visible to whoever reads next.
/// Nothing here validates page shape or path uniqueness; the orchestrator does
/// that when rendering starts.
#[derive(Debug, Default)]
pub struct PageRegistry {
    pages: Vec<Arc<Page>>,
    next_id: u64,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `page` and append it.
    ///
    /// Returns the shared handle of the stored page.
    pub fn create_page(&mut self, page: NewPage) -> Arc<Page> {
        let id = PageId(self.next_id);
        self.next_id += 1;

        let page = Arc::new(page.normalize(id));
        self.pages.push(Arc::clone(&page));
        page
    }

    /// Remove the page with the same identity as `page`.
    ///
    /// Returns `false` (and does nothing) when it is not registered.
    pub fn delete_page(&mut self, page: &Page) -> bool {
        self.delete_by_id(page.id())
    }

    pub fn delete_by_id(&mut self, id: PageId) -> bool {
        let before = self.pages.len();
        self.pages.retain(|p| p.id() != id);
        self.pages.len() != before
    }

    pub fn get(&self, id: PageId) -> Option<&Arc<Page>> {
        self.pages.iter().find(|p| p.id() == id)
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.get(id).is_some()
    }

    /// Pages in creation order.
    pub fn pages(&self) -> &[Arc<Page>] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Registry mutators handed to hooks.
pub struct Actions<'a> {
    registry: &'a mut PageRegistry,
}

impl<'a> Actions<'a> {
    pub fn new(registry: &'a mut PageRegistry) -> Self {
        Self { registry }
    }

    pub fn create_page(&mut self, page: NewPage) -> Arc<Page> {
        self.registry.create_page(page)
    }

    pub fn delete_page(&mut self, page: &Page) -> bool {
        self.registry.delete_page(page)
    }

    pub fn pages(&self) -> &[Arc<Page>] {
        self.registry.pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Component, StaticComponent};

    fn new_page(name: &str) -> NewPage {
        let component: Arc<dyn Component> = Arc::new(StaticComponent::text(name));
        NewPage::new(component).name(name)
    }

    #[test]
    fn test_create_appends_in_order() {
        let mut registry = PageRegistry::new();
        registry.create_page(new_page("a"));
        registry.create_page(new_page("b"));

        let names: Vec<_> = registry.pages().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut registry = PageRegistry::new();
        let a = registry.create_page(new_page("same"));
        let b = registry.create_page(new_page("same"));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_delete_matches_identity_not_path() {
        let mut registry = PageRegistry::new();
        let first = registry.create_page(new_page("dup"));
        let second = registry.create_page(new_page("dup"));
        assert_eq!(first.path, second.path);

        assert!(registry.delete_page(&first));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(second.id()));
        assert!(!registry.contains(first.id()));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut registry = PageRegistry::new();
        let page = registry.create_page(new_page("a"));
        assert!(registry.delete_page(&page));
        assert!(!registry.delete_page(&page));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_actions_mutate_registry() {
        let mut registry = PageRegistry::new();
        {
            let mut actions = Actions::new(&mut registry);
            let page = actions.create_page(new_page("a"));
            actions.create_page(new_page("b"));
            actions.delete_page(&page);
            assert_eq!(actions.pages().len(), 1);
        }
        assert_eq!(registry.pages()[0].name, "b");
    }
}
