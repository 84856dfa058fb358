// Page registry - the explicit list of protected pages shown in the access grid
use std::collections::HashSet;

use crate::models::PageInfo;

#[derive(Debug, Clone)]
pub struct PageRegistry {
    pages: Vec<PageInfo>,
}

impl PageRegistry {
    /// Later duplicates of a path are dropped; order is otherwise preserved.
    pub fn new(pages: impl IntoIterator<Item = PageInfo>) -> Self {
        let mut seen = HashSet::new();
        let pages = pages
            .into_iter()
            .filter(|page| seen.insert(page.path.clone()))
            .collect();
        Self { pages }
    }

    pub fn pages(&self) -> &[PageInfo] {
        &self.pages
    }

    pub fn name_of(&self, path: &str) -> Option<&str> {
        self.pages
            .iter()
            .find(|page| page.path == path)
            .map(|page| page.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_occurrence_of_each_path() {
        let registry = PageRegistry::new([
            PageInfo::new("/blog", "Blog"),
            PageInfo::new("/admin", "Admin"),
            PageInfo::new("/blog", "Posts"),
        ]);
        assert_eq!(registry.pages().len(), 2);
        assert_eq!(registry.name_of("/blog"), Some("Blog"));
        assert_eq!(registry.name_of("/missing"), None);
    }
}
