use std::collections::HashMap;

/// Position index keyed by ASCII-uppercased names.
///
/// Every position inserted under a name is kept, in insertion order, so
/// callers can choose between "first declaration" and "all matches".
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveIndex {
    map: HashMap<String, Vec<usize>>,
}

impl CaseInsensitiveIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `position` under `name`. Returns true if the name was
    /// already present (in any casing).
    pub fn insert(&mut self, name: &str, position: usize) -> bool {
        let positions = self.map.entry(name.to_ascii_uppercase()).or_default();
        positions.push(position);
        positions.len() > 1
    }

    pub fn first(&self, name: &str) -> Option<usize> {
        self.all(name).first().copied()
    }

    pub fn all(&self, name: &str) -> &[usize] {
        self.map
            .get(&name.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_uppercase())
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case() {
        let mut index = CaseInsensitiveIndex::new();
        assert!(!index.insert("Age", 0));
        for query in ["AGE", "age", "Age"] {
            assert_eq!(index.first(query), Some(0));
        }
        assert!(!index.contains("gender"));
    }

    #[test]
    fn keeps_every_position_in_order() {
        let mut index = CaseInsensitiveIndex::new();
        index.insert("LIMIT", 3);
        assert!(index.insert("limit", 7));
        assert_eq!(index.all("Limit"), &[3, 7]);
        assert_eq!(index.first("limit"), Some(3));
        assert_eq!(index.len(), 1);
    }
}
