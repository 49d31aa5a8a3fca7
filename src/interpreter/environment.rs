use std::{cell::RefCell, collections::HashMap, rc::Rc};

use tracing::trace;

use crate::{error::ScopeError, interpreter::value::core::Binding};

/// One level of the scope chain.
struct Scope {
    values: RefCell<HashMap<String, Binding>>,
    parent: Option<Environment>,
    depth:  usize,
}

/// A handle to a scope and, through it, to every enclosing scope.
///
/// Cloning the handle is cheap and shares the scope: a function value keeps
/// the environment it was declared in alive by holding a clone. Bindings are
/// mutated through the handle; the chain itself never changes shape after a
/// scope is created.
///
/// # Example
/// ```
/// use finlite::interpreter::{environment::Environment, value::core::Value};
///
/// let globals = Environment::new();
/// globals.define("x", Some(Value::Number(1.0)));
///
/// let inner = globals.create_child();
/// inner.define("x", Some(Value::Number(2.0)));
///
/// assert_eq!(inner.get("x").unwrap(), Some(Value::Number(2.0)));
/// assert_eq!(globals.get("x").unwrap(), Some(Value::Number(1.0)));
/// ```
#[derive(Clone)]
pub struct Environment(Rc<Scope>);

impl Environment {
    /// Creates a root scope at depth 0.
    #[must_use]
    pub fn new() -> Self {
        Self(Rc::new(Scope { values: RefCell::new(HashMap::new()),
                             parent: None,
                             depth:  0, }))
    }

    /// Creates a scope whose parent is `self`, one level deeper.
    #[must_use]
    pub fn create_child(&self) -> Self {
        let depth = self.0.depth + 1;
        trace!(depth, "enter scope");
        Self(Rc::new(Scope { values: RefCell::new(HashMap::new()),
                             parent: Some(self.clone()),
                             depth }))
    }

    /// Distance from the root scope.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.depth
    }

    /// The enclosing scope, if this is not the root.
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.0.parent.as_ref()
    }

    /// Introduces `name` in this scope, replacing any binding of the same
    /// name here. Enclosing scopes are not consulted.
    pub fn define(&self, name: impl Into<String>, value: Binding) {
        self.0.values.borrow_mut().insert(name.into(), value);
    }

    /// Rebinds `name` in the nearest scope that defines it.
    ///
    /// # Errors
    /// Returns `ScopeError::Undefined` if no scope on the chain defines
    /// `name`; assignment never creates a binding.
    pub fn assign(&self, name: &str, value: Binding) -> Result<Binding, ScopeError> {
        let mut current = Some(self);
        while let Some(env) = current {
            if let Some(slot) = env.0.values.borrow_mut().get_mut(name) {
                slot.clone_from(&value);
                return Ok(value);
            }
            current = env.parent();
        }
        Err(self.undefined(name))
    }

    /// Looks `name` up in this scope, then outward.
    ///
    /// # Errors
    /// Returns `ScopeError::Undefined` if no scope on the chain defines
    /// `name`.
    pub fn get(&self, name: &str) -> Result<Binding, ScopeError> {
        let mut current = Some(self);
        while let Some(env) = current {
            if let Some(value) = env.0.values.borrow().get(name) {
                return Ok(value.clone());
            }
            current = env.parent();
        }
        Err(self.undefined(name))
    }

    /// Whether any scope on the chain defines `name`.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Reads `name` from the scope at exactly `depth`, without searching.
    ///
    /// # Errors
    /// - `ScopeError::DepthOutOfRange` if `depth` is deeper than this scope.
    /// - `ScopeError::Undefined` if the scope at `depth` does not bind `name`.
    pub fn get_at_depth(&self, depth: usize, name: &str) -> Result<Binding, ScopeError> {
        let scope = self.ancestor(depth)?;
        scope.0
             .values
             .borrow()
             .get(name)
             .cloned()
             .ok_or_else(|| ScopeError::Undefined { name:  name.to_string(),
                                                    depth: scope.depth(), })
    }

    /// Reads `name` from the root scope.
    ///
    /// # Errors
    /// Returns `ScopeError::Undefined` if the root does not bind `name`.
    pub fn get_global(&self, name: &str) -> Result<Binding, ScopeError> {
        self.get_at_depth(0, name)
    }

    /// Looks `name` up starting from the enclosing scope.
    ///
    /// # Errors
    /// Returns `ScopeError::NoParent` at the root, and
    /// `ScopeError::Undefined` if nothing above this scope binds `name`.
    pub fn get_parent(&self, name: &str) -> Result<Binding, ScopeError> {
        match self.parent() {
            Some(parent) => parent.get(name),
            None => Err(ScopeError::NoParent { name: name.to_string() }),
        }
    }

    fn ancestor(&self, depth: usize) -> Result<&Self, ScopeError> {
        if depth > self.depth() {
            return Err(ScopeError::DepthOutOfRange { requested: depth,
                                                     depth:     self.depth(), });
        }
        let mut scope = self;
        while scope.depth() > depth {
            match scope.parent() {
                Some(parent) => scope = parent,
                None => break,
            }
        }
        Ok(scope)
    }

    fn undefined(&self, name: &str) -> ScopeError {
        ScopeError::Undefined { name:  name.to_string(),
                                depth: self.depth(), }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

// Scopes reachable from closures can form cycles; print only this level.
impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.0.values.borrow();
        let mut names: Vec<&String> = values.keys().collect();
        names.sort();
        f.debug_struct("Environment")
         .field("depth", &self.0.depth)
         .field("names", &names)
         .finish()
    }
}
