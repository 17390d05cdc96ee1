//! First-seen name → index assignment
//!
//! Materials and textures are numbered in the order they are first used.
//! Asking for the same name again always returns the index it got the first
//! time, for the whole export pass.

use indexmap::IndexSet;

#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    names: IndexSet<String>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `name`, assigning the next free index on first use.
    ///
    /// The boolean is `true` when the name was seen for the first time.
    pub fn assign(&mut self, name: &str) -> (u32, bool) {
        if let Some(index) = self.names.get_index_of(name) {
            return (index as u32, false);
        }
        let (index, _) = self.names.insert_full(name.to_owned());
        (index as u32, true)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in index order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_is_first_seen_order() {
        let mut index = NameIndex::new();
        assert_eq!(index.assign("skin"), (0, true));
        assert_eq!(index.assign("cloth"), (1, true));
        assert_eq!(index.assign("skin"), (0, false));
        assert_eq!(index.assign("metal"), (2, true));
        assert_eq!(index.assign("cloth"), (1, false));

        let names: Vec<_> = index.names().collect();
        assert_eq!(names, ["skin", "cloth", "metal"]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_starts_empty() {
        let mut index = NameIndex::new();
        assert!(index.is_empty());
        index.assign("eye");
        assert!(!index.is_empty());
    }
}
