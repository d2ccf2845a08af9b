//! Per-session record of the joins already emitted.
//!
//! Each committed join is stored under its accumulated relation-name path
//! (`customer.profile`), together with the alias path (`customers.profiles`
//! or generated tokens) and the real table path. The alias path and the table
//! path are the pair the session reports through
//! [`JoinSelect::joined_paths`](crate::JoinSelect::joined_paths).

use std::collections::{HashMap, HashSet};

/// One join committed to a query session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedPath {
    /// Accumulated relation names, dot-separated
    pub relation_path: String,
    /// Accumulated aliases, dot-separated
    pub alias_path: String,
    /// Accumulated real table names, dot-separated
    pub table_path: String,
    /// Alias of the last joined table
    pub alias: String,
    /// Real name of the last joined table
    pub table: String,
}

#[derive(Debug, Clone)]
pub struct JoinRegistry {
    entries: Vec<JoinedPath>,
    by_relation_path: HashMap<String, usize>,
    aliases: HashSet<String>,
}

impl JoinRegistry {
    /// Create a registry for a query over `base_table`.
    ///
    /// The base table name is reserved so a self-referencing relation never
    /// joins the base table under its own name.
    pub fn new(base_table: &str) -> Self {
        Self {
            entries: Vec::new(),
            by_relation_path: HashMap::new(),
            aliases: HashSet::from([base_table.to_owned()]),
        }
    }

    pub fn lookup(&self, relation_path: &str) -> Option<&JoinedPath> {
        self.by_relation_path
            .get(relation_path)
            .map(|&idx| &self.entries[idx])
    }

    pub fn is_alias_taken(&self, alias: &str) -> bool {
        self.aliases.contains(alias)
    }

    /// Record a join. A relation path already present is left untouched.
    pub fn insert(&mut self, entry: JoinedPath) {
        if self.by_relation_path.contains_key(&entry.relation_path) {
            return;
        }
        let idx = self.entries.len();
        self.by_relation_path.insert(entry.relation_path.clone(), idx);
        self.aliases.insert(entry.alias.clone());
        self.entries.push(entry);
    }

    /// Joins in the order they were committed.
    pub fn iter(&self) -> impl Iterator<Item = &JoinedPath> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(relation_path: &str, alias_path: &str, table_path: &str) -> JoinedPath {
        JoinedPath {
            relation_path: relation_path.to_owned(),
            alias_path: alias_path.to_owned(),
            table_path: table_path.to_owned(),
            alias: alias_path.rsplit('.').next().unwrap().to_owned(),
            table: table_path.rsplit('.').next().unwrap().to_owned(),
        }
    }

    #[test]
    fn test_base_table_is_reserved() {
        let registry = JoinRegistry::new("orders");
        assert!(registry.is_alias_taken("orders"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_cloned_registry_keeps_base_reservation() {
        let mut registry = JoinRegistry::new("users");
        registry.insert(entry("manager", "manager", "users"));

        let scratch = registry.clone();
        assert!(scratch.is_alias_taken("users"));
        assert!(scratch.is_alias_taken("manager"));
        assert_eq!(scratch.len(), 1);
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = JoinRegistry::new("orders");
        registry.insert(entry("customer", "customers", "customers"));
        registry.insert(entry("customer.profile", "customers.profiles", "customers.profiles"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("customer.profile").unwrap().alias, "profiles");
        assert_eq!(registry.lookup("customer.profile").unwrap().table_path, "customers.profiles");
        assert!(registry.is_alias_taken("profiles"));
        assert!(registry.lookup("profile").is_none());
    }

    #[test]
    fn test_insert_keeps_first_entry_for_relation_path() {
        let mut registry = JoinRegistry::new("orders");
        registry.insert(entry("buyer", "users", "users"));
        registry.insert(entry("buyer", "buyer", "users"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("buyer").unwrap().alias, "users");
        assert!(!registry.is_alias_taken("buyer"));
    }

    #[test]
    fn test_iter_preserves_commit_order() {
        let mut registry = JoinRegistry::new("orders");
        registry.insert(entry("seller", "users", "users"));
        registry.insert(entry("buyer", "buyer", "users"));

        let aliases: Vec<_> = registry.iter().map(|j| j.alias.as_str()).collect();
        assert_eq!(aliases, vec!["users", "buyer"]);
    }
}
