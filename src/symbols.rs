//! Variables and Functions tables layered on [`ScopeStack`].
//!
//! Grounded on `examples/original_source/variable.hh`'s `Variables` class,
//! with one deliberate fix: the original assigns slots from a
//! `static std::atomic<uint32_t> nextMemoryLocation` shared across *every*
//! `Variables` instance in the process. `spec.md`'s DESIGN NOTES calls for
//! slot indices that are "globally monotonic" per program, not per process,
//! so the counter here is an instance field on [`SymbolTable`] instead of a
//! hidden global — the fix the spec asks for without changing the externally
//! observable slot-allocation order.

use crate::error::Result;
use crate::scope::ScopeStack;
use crate::types::Type;

/// `{ slot index, mutability flag, current Value, declared Type }`.
#[derive(Debug, Clone)]
pub struct SymbolRecord {
    pub slot: u32,
    pub mutable_: bool,
    pub declared_type: Type,
}

/// `{ parameter list (name, Type), return Type, entry address }`.
#[derive(Debug, Clone)]
pub struct FunctionRecord {
    pub params: Vec<(String, Type)>,
    pub return_type: Type,
    pub entry: u32,
}

/// The Variables table: scoped name → slot-index bindings, with a
/// monotonically increasing slot counter private to this table instance.
pub struct SymbolTable {
    scopes: ScopeStack<SymbolRecord>,
    next_slot: u32,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self { scopes: ScopeStack::new(), next_slot: 0 }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.enter_scope();
    }

    pub fn exit_scope(&mut self) -> Result<()> {
        self.scopes.exit_scope()
    }

    /// Declare `name` in the current scope, allocating the next slot index.
    pub fn declare(&mut self, name: impl Into<String>, mutable_: bool, declared_type: Type) -> Result<u32> {
        let slot = self.next_slot;
        self.next_slot += 1;
        let record = SymbolRecord { slot, mutable_, declared_type };
        self.scopes.add(name, record)?;
        Ok(slot)
    }

    pub fn declare_global(&mut self, name: impl Into<String>, mutable_: bool, declared_type: Type) -> Result<u32> {
        let slot = self.next_slot;
        self.next_slot += 1;
        let record = SymbolRecord { slot, mutable_, declared_type };
        self.scopes.add_global(name, record)?;
        Ok(slot)
    }

    pub fn resolve(&self, name: &str) -> Option<&SymbolRecord> {
        self.scopes.get(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.scopes.exists(name)
    }

    pub fn slot_count(&self) -> u32 {
        self.next_slot
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The Functions table: name → `FunctionRecord`, one global scope (function
/// declarations in Luminar are not nested).
pub struct FunctionTable {
    scopes: ScopeStack<FunctionRecord>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self { scopes: ScopeStack::new() }
    }

    pub fn declare(&mut self, name: impl Into<String>, record: FunctionRecord) -> Result<()> {
        self.scopes.add_global(name, record)
    }

    pub fn resolve(&self, name: &str) -> Option<&FunctionRecord> {
        self.scopes.get(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.scopes.exists(name)
    }
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeTag;

    #[test]
    fn slots_are_monotonic_within_one_table() {
        let mut table = SymbolTable::new();
        let a = table.declare("a", true, Type::simple(TypeTag::Int32)).unwrap();
        let b = table.declare("b", true, Type::simple(TypeTag::Int32)).unwrap();
        assert_eq!(b, a + 1);
    }

    #[test]
    fn two_tables_each_start_from_zero() {
        let mut t1 = SymbolTable::new();
        let mut t2 = SymbolTable::new();
        let s1 = t1.declare("a", true, Type::simple(TypeTag::Int32)).unwrap();
        let s2 = t2.declare("a", true, Type::simple(TypeTag::Int32)).unwrap();
        assert_eq!(s1, 0);
        assert_eq!(s2, 0);
    }

    #[test]
    fn redeclare_in_same_scope_fails() {
        let mut table = SymbolTable::new();
        table.declare("a", true, Type::simple(TypeTag::Int32)).unwrap();
        assert!(table.declare("a", true, Type::simple(TypeTag::Int32)).is_err());
    }

    #[test]
    fn function_table_resolves_declared_entries() {
        let mut functions = FunctionTable::new();
        functions
            .declare(
                "add",
                FunctionRecord {
                    params: vec![("a".into(), Type::simple(TypeTag::Int32))],
                    return_type: Type::simple(TypeTag::Int32),
                    entry: 10,
                },
            )
            .unwrap();
        assert_eq!(functions.resolve("add").unwrap().entry, 10);
        assert!(!functions.exists("missing"));
    }
}
