//! The ordered property source chain owned by an environment.
//!
//! Earlier entries win on lookup. Names are unique at the top level: every
//! `add_*` operation first removes an existing entry with the same name.

use crate::domain::{entities::property_source::PropertySource, error::DomainError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySources {
    sources: Vec<PropertySource>,
}

impl PropertySources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&PropertySource> {
        self.sources.iter().find(|s| s.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Position of `name` in the chain; `0` is the highest precedence.
    pub fn precedence_of(&self, name: &str) -> Option<usize> {
        self.sources.iter().position(|s| s.name() == name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertySource> {
        self.sources.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(PropertySource::name).collect()
    }

    /// Add with the highest precedence.
    pub fn add_first(&mut self, source: PropertySource) {
        self.remove(source.name());
        self.sources.insert(0, source);
    }

    /// Add with the lowest precedence.
    pub fn add_last(&mut self, source: PropertySource) {
        self.remove(source.name());
        self.sources.push(source);
    }

    /// Add immediately before (with higher precedence than) `relative`.
    pub fn add_before(&mut self, relative: &str, source: PropertySource) -> Result<(), DomainError> {
        Self::assert_legal_relative(relative, &source)?;
        self.remove(source.name());
        let index = self.require_index(relative)?;
        self.sources.insert(index, source);
        Ok(())
    }

    /// Add immediately after (with lower precedence than) `relative`.
    pub fn add_after(&mut self, relative: &str, source: PropertySource) -> Result<(), DomainError> {
        Self::assert_legal_relative(relative, &source)?;
        self.remove(source.name());
        let index = self.require_index(relative)?;
        self.sources.insert(index + 1, source);
        Ok(())
    }

    /// Swap the entry named `name` for `source`, keeping its position.
    pub fn replace(&mut self, name: &str, source: PropertySource) -> Result<(), DomainError> {
        let index = self.require_index(name)?;
        self.sources[index] = source;
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertySource> {
        let index = self.precedence_of(name)?;
        Some(self.sources.remove(index))
    }

    /// First value for `key` across the whole chain, unresolved.
    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.sources.iter().find_map(|s| s.get_property(key))
    }

    fn require_index(&self, name: &str) -> Result<usize, DomainError> {
        self.precedence_of(name)
            .ok_or_else(|| DomainError::UnknownPropertySource { name: name.into() })
    }

    fn assert_legal_relative(relative: &str, source: &PropertySource) -> Result<(), DomainError> {
        if source.name() == relative {
            return Err(DomainError::SelfRelativeAddition {
                name: relative.into(),
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PropertySources {
    type Item = &'a PropertySource;
    type IntoIter = std::slice::Iter<'a, PropertySource>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::property_source::MapPropertySource;

    fn src(name: &str, value: &str) -> PropertySource {
        MapPropertySource::new(name, [("key", value)]).into()
    }

    fn chain(names: &[&str]) -> PropertySources {
        let mut sources = PropertySources::new();
        for name in names {
            sources.add_last(src(name, name));
        }
        sources
    }

    #[test]
    fn add_first_and_last() {
        let mut sources = chain(&["b"]);
        sources.add_first(src("a", "a"));
        sources.add_last(src("c", "c"));
        assert_eq!(sources.names(), vec!["a", "b", "c"]);
        assert_eq!(sources.get_property("key"), Some("a"));
    }

    #[test]
    fn add_replaces_same_name_entry() {
        let mut sources = chain(&["a", "b"]);
        sources.add_last(src("a", "again"));
        assert_eq!(sources.names(), vec!["b", "a"]);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources.get("a").unwrap().get_property("key"), Some("again"));
    }

    #[test]
    fn add_before_and_after() {
        let mut sources = chain(&["a", "c"]);
        sources.add_before("c", src("b", "b")).unwrap();
        sources.add_after("c", src("d", "d")).unwrap();
        assert_eq!(sources.names(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn add_before_missing_anchor_fails() {
        let mut sources = chain(&["a"]);
        assert_eq!(
            sources.add_before("zzz", src("b", "b")),
            Err(DomainError::UnknownPropertySource { name: "zzz".into() })
        );
    }

    #[test]
    fn add_relative_to_itself_fails() {
        let mut sources = chain(&["a"]);
        assert!(matches!(
            sources.add_after("a", src("a", "x")),
            Err(DomainError::SelfRelativeAddition { .. })
        ));
        assert_eq!(sources.names(), vec!["a"]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut sources = chain(&["a", "b", "c"]);
        sources.replace("b", src("b", "new")).unwrap();
        assert_eq!(sources.names(), vec!["a", "b", "c"]);
        assert_eq!(sources.get("b").unwrap().get_property("key"), Some("new"));
        assert!(sources.replace("zzz", src("zzz", "x")).is_err());
    }

    #[test]
    fn remove_returns_entry() {
        let mut sources = chain(&["a", "b"]);
        assert_eq!(sources.remove("a").map(|s| s.name().to_string()), Some("a".into()));
        assert!(sources.remove("a").is_none());
        assert_eq!(sources.precedence_of("b"), Some(0));
    }
}
