//! # Scope Module
//!
//! A chained symbol environment tracking which variables are declared and whether each has been
//! initialized yet. Scopes form a chain from the innermost block out to the program root; a
//! lookup walks the chain innermost-first and stops at the first binding with the requested
//! identifier.
//!
//! Rather than linking scopes with shared pointers, all scope records live in an arena owned by
//! [`ScopeArena`] and are addressed by index. The arena also keeps the stack of indices from the
//! root to the scope currently being parsed, so entering a block is a push, leaving it is a pop,
//! and unwinding after a failed parse is a truncation of the stack. Records are never removed
//! from the arena itself; a popped scope is simply unreachable from the stack.
//!
//! Updating a variable that lives in an outer scope mutates that outer scope's binding in place.
//! A new binding is only created when the identifier is not reachable at all, and it is created
//! in the innermost scope.
use indexmap::IndexMap;

use crate::parser::ast::Variable;


/// The state of one declared variable within a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub variable: Variable,
    pub initialized: bool
}


/// Index of a scope record within its [`ScopeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);


/// One lexical scope: its bindings keyed by identifier, and the scope enclosing it (`None` for
/// the root).
#[derive(Debug)]
struct Scope {
    bindings: IndexMap<String, Binding>,
    parent: Option<ScopeId>
}


/// Arena of scope records plus the stack of scopes currently open during a parse.
///
/// The stack always contains at least the root scope; the innermost scope is on top.
#[derive(Debug)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
    stack: Vec<ScopeId>
}


impl ScopeArena {
    /// Creates an arena holding a single root scope, which is the current scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope { bindings: IndexMap::new(), parent: None }],
            stack: vec![ScopeId(0)]
        }
    }


    /// Opens a new scope enclosed by the current one and makes it current.
    pub fn push(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            bindings: IndexMap::new(),
            parent: Some(self.current())
        });
        self.stack.push(id);
        id
    }


    /// Closes the current scope, returning to its parent. The root scope is never popped; doing
    /// so would mean a push/pop mismatch in the parser.
    pub fn pop(&mut self) {
        if self.stack.len() == 1 {
            panic!("scope stack underflow: attempted to pop the root scope");
        }
        self.stack.pop();
    }


    /// The number of scopes currently open, including the root.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }


    /// Discards open scopes until only `depth` remain. Used to unwind the stack after a failed
    /// parse so a partially opened block cannot leak bindings to the caller.
    pub fn unwind_to(&mut self, depth: usize) {
        debug_assert!(depth >= 1 && depth <= self.stack.len());
        self.stack.truncate(depth);
    }


    fn current(&self) -> ScopeId {
        *self.stack.last().unwrap()
    }


    /// If a binding for the variable's identifier is reachable from the current scope, sets that
    /// binding's initialized flag in the scope which owns it; otherwise declares the variable in
    /// the current scope. Reassignment therefore never shadows an outer declaration with a
    /// duplicate inner binding.
    pub fn declare_or_update(&mut self, variable: Variable, initialized: bool) {
        let mut next = Some(self.current());
        while let Some(ScopeId(idx)) = next {
            if let Some(binding) = self.scopes[idx].bindings.get_mut(&variable.name) {
                binding.initialized = initialized;
                return;
            }
            next = self.scopes[idx].parent;
        }

        let ScopeId(idx) = self.current();
        self.scopes[idx].bindings.insert(variable.name.clone(), Binding { variable, initialized });
    }


    /// Searches for the identifier from the innermost scope outward, returning the first matching
    /// declaration or `None` if it is not declared anywhere in the chain.
    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        let mut next = Some(self.current());
        while let Some(ScopeId(idx)) = next {
            if let Some(binding) = self.scopes[idx].bindings.get(name) {
                return Some(&binding.variable);
            }
            next = self.scopes[idx].parent;
        }

        None
    }


    /// Returns whether the variable's reachable binding has definitely been assigned a value.
    ///
    /// # Panics
    ///
    /// Panics if the variable is not reachable from the current scope. The parser only queries
    /// variables it has already resolved with [`ScopeArena::lookup`], so an unreachable variable
    /// here is a compiler defect, not a user error.
    pub fn is_initialized(&self, variable: &Variable) -> bool {
        let mut next = Some(self.current());
        while let Some(ScopeId(idx)) = next {
            if let Some(binding) = self.scopes[idx].bindings.get(&variable.name) {
                return binding.initialized;
            }
            next = self.scopes[idx].parent;
        }

        panic!("scope invariant violated: variable '{}' queried but not reachable", variable.name);
    }
}


impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}
