//! Ordered registry of command elements.
//!
//! Aliases are unique across the registry. The length of the longest display
//! name is cached for column alignment in help listings.

use crate::core::element::CommandElement;
use crate::error::{CalbrError, Result};

/// First alias shared by both sets, if any.
#[must_use]
pub fn aliases_conflict<'a>(left: &'a [String], right: &[String]) -> Option<&'a str> {
    left.iter()
        .find(|alias| right.contains(alias))
        .map(String::as_str)
}

/// Registered commands in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    elements: Vec<CommandElement>,
    max_name_len: usize,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `element`.
    ///
    /// # Errors
    ///
    /// Returns [`CalbrError::AliasConflict`] if any alias is already held by a
    /// registered element; the registry is left unchanged.
    pub fn register(&mut self, element: CommandElement) -> Result<()> {
        for existing in &self.elements {
            if let Some(alias) = aliases_conflict(element.identifier(), existing.identifier()) {
                return Err(CalbrError::AliasConflict {
                    alias: alias.to_string(),
                    existing: existing.name().to_string(),
                });
            }
        }

        self.max_name_len = self.max_name_len.max(name_len(&element));
        tracing::debug!(
            command = element.name(),
            aliases = ?element.identifier(),
            "Registered command"
        );
        self.elements.push(element);
        Ok(())
    }

    /// Remove the first element answering to `alias`.
    pub fn unregister(&mut self, alias: &str) -> Option<CommandElement> {
        let index = self.position(alias)?;
        let element = self.elements.remove(index);

        if name_len(&element) == self.max_name_len {
            self.max_name_len = self.elements.iter().map(name_len).max().unwrap_or(0);
        }
        tracing::debug!(command = element.name(), "Unregistered command");
        Some(element)
    }

    #[must_use]
    pub fn lookup(&self, alias: &str) -> Option<&CommandElement> {
        self.elements.iter().find(|element| element.matches(alias))
    }

    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.lookup(alias).is_some()
    }

    /// All elements in registration order.
    #[must_use]
    pub fn all(&self) -> &[CommandElement] {
        &self.elements
    }

    /// Length in characters of the longest display name.
    #[must_use]
    pub const fn max_name_len(&self) -> usize {
        self.max_name_len
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn position(&self, alias: &str) -> Option<usize> {
        self.elements.iter().position(|element| element.matches(alias))
    }

    pub(crate) fn get(&self, index: usize) -> Option<&CommandElement> {
        self.elements.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut CommandElement> {
        self.elements.get_mut(index)
    }
}

fn name_len(element: &CommandElement) -> usize {
    element.name().chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::element::Flow;

    fn element(aliases: &[&str]) -> CommandElement {
        CommandElement::builder(aliases.iter().copied())
            .callback(|_, _| Ok(Flow::Continue))
            .build()
            .unwrap()
    }

    #[test]
    fn conflict_is_pure_set_intersection() {
        let a = vec!["exit".to_string(), "ex".to_string()];
        let b = vec!["quit".to_string(), "ex".to_string()];
        let c = vec!["help".to_string()];
        assert_eq!(aliases_conflict(&a, &b), Some("ex"));
        assert_eq!(aliases_conflict(&a, &c), None);
    }

    #[test]
    fn register_rejects_shared_alias() {
        let mut registry = Registry::new();
        registry.register(element(&["make-derivative", "makeder"])).unwrap();

        let err = registry.register(element(&["makeder", "mkd"])).unwrap_err();
        assert!(matches!(
            err,
            CalbrError::AliasConflict { ref alias, ref existing }
                if alias == "makeder" && existing == "make-derivative"
        ));
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("mkd"));
        assert_eq!(
            registry.lookup("makeder").map(CommandElement::name),
            Some("make-derivative")
        );
    }

    #[test]
    fn max_name_len_tracks_longest_and_recomputes() {
        let mut registry = Registry::new();
        registry.register(element(&["abc"])).unwrap();
        registry.register(element(&["abcdefg"])).unwrap();
        registry.register(element(&["abcde"])).unwrap();
        assert_eq!(registry.max_name_len(), 7);

        let removed = registry.unregister("abcdefg").unwrap();
        assert_eq!(removed.name(), "abcdefg");
        assert_eq!(registry.max_name_len(), 5);

        registry.unregister("abc").unwrap();
        assert_eq!(registry.max_name_len(), 5);
        registry.unregister("abcde").unwrap();
        assert_eq!(registry.max_name_len(), 0);
    }

    #[test]
    fn unregister_unknown_alias_is_none() {
        let mut registry = Registry::new();
        registry.register(element(&["help"])).unwrap();
        assert!(registry.unregister("zzz").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn all_preserves_registration_order() {
        let mut registry = Registry::new();
        for name in ["exit", "quit", "help"] {
            registry.register(element(&[name])).unwrap();
        }
        let names: Vec<_> = registry.all().iter().map(CommandElement::name).collect();
        assert_eq!(names, vec!["exit", "quit", "help"]);
    }

    #[test]
    fn lookup_matches_any_alias_exactly() {
        let mut registry = Registry::new();
        registry.register(element(&["copy-linearfits", "copylfit"])).unwrap();
        assert!(registry.contains("copylfit"));
        assert!(registry.contains("copy-linearfits"));
        assert!(!registry.contains("copy"));
    }
}
