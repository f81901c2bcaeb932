//! Generic scope stack: an ordered sequence of name → record maps.
//!
//! Grounded directly on `examples/original_source/scope.hh`'s
//! `ScopeManager<T>` (`enterScope`/`exitScope`/`add`/`addGlobal`/`get`/
//! `exists`/`update`/`getCurrentScopeDepth`), translated from its
//! shared-pointer-per-scope layout into a `Vec<HashMap<String, T>>`.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A stack of name→record maps; outermost (global) scope is index 0.
pub struct ScopeStack<T> {
    scopes: Vec<HashMap<String, T>>,
}

impl<T: Clone> ScopeStack<T> {
    pub fn new() -> Self {
        Self { scopes: vec![HashMap::new()] }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Fails if only the global scope remains.
    pub fn exit_scope(&mut self) -> Result<()> {
        if self.scopes.len() <= 1 {
            return Err(Error::GlobalScopeExit);
        }
        self.scopes.pop();
        Ok(())
    }

    /// Fails if `name` already exists in the innermost scope; shadowing an
    /// outer-scope name is allowed.
    pub fn add(&mut self, name: impl Into<String>, record: T) -> Result<()> {
        let name = name.into();
        if self.current_scope().contains_key(&name) {
            return Err(Error::RedeclaredVariable(name));
        }
        self.current_scope_mut().insert(name, record);
        Ok(())
    }

    pub fn add_global(&mut self, name: impl Into<String>, record: T) -> Result<()> {
        let name = name.into();
        if self.scopes[0].contains_key(&name) {
            return Err(Error::RedeclaredVariable(name));
        }
        self.scopes[0].insert(name, record);
        Ok(())
    }

    /// Search from innermost to outermost, returning the first match.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains_key(name))
    }

    /// Replace the record in the innermost scope where `name` exists.
    pub fn update(&mut self, name: &str, record: T) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if scope.contains_key(name) {
                scope.insert(name.to_string(), record);
                return true;
            }
        }
        false
    }

    /// Depth of nesting below the global scope (0 at global scope).
    pub fn current_scope_depth(&self) -> usize {
        self.scopes.len() - 1
    }

    fn current_scope(&self) -> &HashMap<String, T> {
        self.scopes.last().expect("global scope is never popped")
    }

    fn current_scope_mut(&mut self) -> &mut HashMap<String, T> {
        self.scopes.last_mut().expect("global scope is never popped")
    }
}

impl<T: Clone> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_get_round_trips() {
        let mut scopes: ScopeStack<i32> = ScopeStack::new();
        scopes.add("x", 1).unwrap();
        assert_eq!(scopes.get("x"), Some(&1));
    }

    #[test]
    fn redeclaring_in_same_scope_fails() {
        let mut scopes: ScopeStack<i32> = ScopeStack::new();
        scopes.add("x", 1).unwrap();
        assert!(scopes.add("x", 2).is_err());
    }

    #[test]
    fn shadowing_outer_scope_is_allowed() {
        let mut scopes: ScopeStack<i32> = ScopeStack::new();
        scopes.add("x", 1).unwrap();
        scopes.enter_scope();
        scopes.add("x", 2).unwrap();
        assert_eq!(scopes.get("x"), Some(&2));
    }

    #[test]
    fn exiting_global_scope_fails() {
        let mut scopes: ScopeStack<i32> = ScopeStack::new();
        assert!(scopes.exit_scope().is_err());
    }

    #[test]
    fn update_replaces_innermost_match() {
        let mut scopes: ScopeStack<i32> = ScopeStack::new();
        scopes.add("x", 1).unwrap();
        scopes.enter_scope();
        assert!(scopes.update("x", 9));
        assert_eq!(scopes.get("x"), Some(&9));
    }

    #[test]
    fn scope_depth_tracks_nesting() {
        let mut scopes: ScopeStack<i32> = ScopeStack::new();
        assert_eq!(scopes.current_scope_depth(), 0);
        scopes.enter_scope();
        assert_eq!(scopes.current_scope_depth(), 1);
    }
}
