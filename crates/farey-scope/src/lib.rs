//! A lexical scope chain shared by the interpreter and the IR translator.
//!
//! Scopes form a parent-linked tree: a child scope's bindings shadow its
//! parent's, and every scope descended from the same root shares one
//! monotonically increasing [`Counter`], so a binding's `counter` value is
//! unique across the whole chain regardless of which scope it lives in.
//! Bindings are stored in an [`indexmap::IndexMap`] so iteration (e.g. for
//! [`Scope::to_string_indented`]) reflects declaration order.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// A scope and every scope reachable through it are only ever referred to
/// through this handle -- `set`/`has`/`get` need to walk from a child up
/// through its ancestors, crossing `RefCell` borrows at each step.
pub type SharedScope<V> = Rc<RefCell<Scope<V>>>;

/// A counter shared by every scope in one chain, handed out via
/// [`Counter::next`]. Cloning a `Counter` (via [`Counter::share`]) shares
/// the same underlying cell rather than resetting to zero.
#[derive(Debug, Clone)]
pub struct Counter(Rc<Cell<u64>>);

impl Counter {
    pub fn new() -> Self {
        Counter(Rc::new(Cell::new(0)))
    }

    pub fn next(&self) -> u64 {
        let value = self.0.get();
        self.0.set(value + 1);
        value
    }

    pub fn share(&self) -> Counter {
        Counter(Rc::clone(&self.0))
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

/// A single binding: its value plus the flags that govern how it may be
/// reassigned or looked up.
#[derive(Debug, Clone)]
pub struct Item<V> {
    /// Builtins and other bindings the Language itself installs;
    /// reassignment is rejected regardless of `constant`.
    pub reserved: bool,
    /// Bound with `:=` rather than `=`; reassignment via [`set`] is
    /// rejected.
    pub constant: bool,
    /// Whether this binding lives in the type namespace (an uppercase
    /// identifier) rather than the variable namespace.
    pub is_type: bool,
    /// This binding's position in the chain-wide counter, assigned once
    /// at [`Scope::initialize`] time and never reused.
    pub counter: u64,
    pub value: V,
}

/// One frame of the lexical scope chain. Always accessed through a
/// [`SharedScope`].
pub struct Scope<V> {
    parent: Option<SharedScope<V>>,
    counter: Counter,
    bindings: IndexMap<String, Item<V>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    NotFound(String),
    AlreadyDefined(String),
    Reserved(String),
    Constant(String),
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::NotFound(name) => write!(f, "`{name}` is not defined in this scope"),
            ScopeError::AlreadyDefined(name) => write!(f, "`{name}` is already defined in this scope"),
            ScopeError::Reserved(name) => write!(f, "`{name}` is reserved and cannot be reassigned"),
            ScopeError::Constant(name) => write!(f, "`{name}` was bound with `:=` and cannot be reassigned"),
        }
    }
}

impl std::error::Error for ScopeError {}

impl<V> Scope<V> {
    /// Start a new, parentless scope chain with a fresh counter.
    pub fn root() -> SharedScope<V> {
        Rc::new(RefCell::new(Scope {
            parent: None,
            counter: Counter::new(),
            bindings: IndexMap::new(),
        }))
    }

    /// Open a child scope under `parent`, sharing its counter.
    pub fn child(parent: &SharedScope<V>) -> SharedScope<V> {
        let counter = parent.borrow().counter.share();
        Rc::new(RefCell::new(Scope {
            parent: Some(Rc::clone(parent)),
            counter,
            bindings: IndexMap::new(),
        }))
    }

    /// This scope's parent, if any.
    pub fn parent(&self) -> Option<SharedScope<V>> {
        self.parent.clone()
    }

    /// Declare `name` in this scope (not an ancestor). Fails if `name`
    /// already has a binding here, even if that binding isn't constant, or
    /// if any ancestor (including this scope) already holds `name` marked
    /// `reserved` -- a child scope may not shadow a reserved name.
    pub fn initialize(
        &mut self,
        name: impl Into<String>,
        value: V,
        reserved: bool,
        constant: bool,
        is_type: bool,
    ) -> Result<(), ScopeError> {
        let name = name.into();
        if self.bindings.contains_key(&name) {
            return Err(ScopeError::AlreadyDefined(name));
        }
        if self.reserved_on_chain(&name) {
            return Err(ScopeError::Reserved(name));
        }
        let counter = self.counter.next();
        self.bindings.insert(
            name,
            Item {
                reserved,
                constant,
                is_type,
                counter,
                value,
            },
        );
        Ok(())
    }

    /// Remove `name` from this scope only; does not search ancestors.
    pub fn uninitialize(&mut self, name: &str) -> Result<Item<V>, ScopeError> {
        match self.bindings.get(name) {
            Some(item) if item.reserved => return Err(ScopeError::Reserved(name.to_string())),
            Some(item) if item.constant => return Err(ScopeError::Constant(name.to_string())),
            Some(_) => {}
            None => return Err(ScopeError::NotFound(name.to_string())),
        }
        Ok(self.bindings.shift_remove(name).expect("just checked it's present"))
    }

    /// Whether this scope (not an ancestor) has a binding for `name`.
    pub fn has_local(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// All bindings declared directly in this scope, in declaration
    /// order.
    pub fn local_bindings(&self) -> impl Iterator<Item = (&str, &Item<V>)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether `name` is bound as `reserved` in this scope or any ancestor.
    fn reserved_on_chain(&self, name: &str) -> bool {
        if self.bindings.get(name).is_some_and(|item| item.reserved) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.borrow().reserved_on_chain(name),
            None => false,
        }
    }
}

/// Reassign `name`'s value, searching outward from `scope` through its
/// ancestors for the nearest existing binding.
pub fn set<V>(scope: &SharedScope<V>, name: &str, value: V) -> Result<(), ScopeError> {
    let mut current = Rc::clone(scope);
    loop {
        let next = {
            let mut frame = current.borrow_mut();
            if let Some(item) = frame.bindings.get_mut(name) {
                if item.reserved {
                    return Err(ScopeError::Reserved(name.to_string()));
                }
                if item.constant {
                    return Err(ScopeError::Constant(name.to_string()));
                }
                item.value = value;
                return Ok(());
            }
            frame.parent.clone()
        };
        match next {
            Some(parent) => current = parent,
            None => return Err(ScopeError::NotFound(name.to_string())),
        }
    }
}

/// Whether `name` is bound anywhere in `scope`'s chain.
pub fn has<V>(scope: &SharedScope<V>, name: &str) -> bool {
    get_full(scope, name, None).is_some()
}

/// The nearest binding for `name` in the variable namespace
/// (`is_type == false`), cloned out of the scope it lives in.
pub fn get_variable_full<V: Clone>(scope: &SharedScope<V>, name: &str) -> Option<Item<V>> {
    get_full(scope, name, Some(false))
}

/// The nearest binding for `name` in the type namespace
/// (`is_type == true`), cloned out of the scope it lives in.
pub fn get_type_full<V: Clone>(scope: &SharedScope<V>, name: &str) -> Option<Item<V>> {
    get_full(scope, name, Some(true))
}

/// The nearest binding for `name`, optionally filtered to one namespace.
/// `want_type = None` matches either namespace.
pub fn get_full<V: Clone>(scope: &SharedScope<V>, name: &str, want_type: Option<bool>) -> Option<Item<V>> {
    let mut current = Rc::clone(scope);
    loop {
        let found = {
            let frame = current.borrow();
            frame.bindings.get(name).and_then(|item| {
                let matches_namespace = match want_type {
                    Some(want) => item.is_type == want,
                    None => true,
                };
                if matches_namespace {
                    Some(item.clone())
                } else {
                    None
                }
            })
        };
        if found.is_some() {
            return found;
        }
        let parent = current.borrow().parent.clone();
        match parent {
            Some(p) => current = p,
            None => return None,
        }
    }
}

/// The value bound to `name` anywhere in the chain, searching either
/// namespace.
pub fn get<V: Clone>(scope: &SharedScope<V>, name: &str) -> Option<V> {
    get_full(scope, name, None).map(|item| item.value)
}

/// A debug rendering of this scope and its ancestors, most-local first,
/// each binding indented under its scope.
pub fn to_string_indented<V: fmt::Debug>(scope: &SharedScope<V>, depth: usize) -> String {
    let frame = scope.borrow();
    let indent = "  ".repeat(depth);
    let mut out = String::new();
    for (name, item) in frame.bindings.iter() {
        out.push_str(&format!(
            "{indent}{name} #{} [{}{}{}] = {:?}\n",
            item.counter,
            if item.reserved { "reserved " } else { "" },
            if item.constant { "const " } else { "" },
            if item.is_type { "type" } else { "var" },
            item.value
        ));
    }
    if let Some(parent) = &frame.parent {
        out.push_str(&to_string_indented(parent, depth + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_and_get_round_trip() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("x", 5, false, false, false).unwrap();
        assert_eq!(get(&root, "x"), Some(5));
    }

    #[test]
    fn initialize_twice_in_same_scope_fails() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("x", 5, false, false, false).unwrap();
        let err = root.borrow_mut().initialize("x", 6, false, false, false).unwrap_err();
        assert_eq!(err, ScopeError::AlreadyDefined("x".into()));
    }

    #[test]
    fn child_sees_parent_binding() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("x", 5, false, false, false).unwrap();
        let child = Scope::child(&root);
        assert_eq!(get(&child, "x"), Some(5));
    }

    #[test]
    fn child_shadows_parent_without_mutating_it() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("x", 5, false, false, false).unwrap();
        let child = Scope::child(&root);
        child.borrow_mut().initialize("x", 10, false, false, false).unwrap();
        assert_eq!(get(&child, "x"), Some(10));
        assert_eq!(get(&root, "x"), Some(5));
    }

    #[test]
    fn set_reassigns_in_defining_scope() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("x", 5, false, false, false).unwrap();
        let child = Scope::child(&root);
        set(&child, "x", 7).unwrap();
        assert_eq!(get(&root, "x"), Some(7));
    }

    #[test]
    fn set_on_constant_fails() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("x", 5, false, true, false).unwrap();
        assert_eq!(set(&root, "x", 7), Err(ScopeError::Constant("x".into())));
    }

    #[test]
    fn set_on_reserved_fails() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("x", 5, true, false, false).unwrap();
        assert_eq!(set(&root, "x", 7), Err(ScopeError::Reserved("x".into())));
    }

    #[test]
    fn set_unbound_name_fails() {
        let root: SharedScope<i64> = Scope::root();
        assert_eq!(set(&root, "x", 7), Err(ScopeError::NotFound("x".into())));
    }

    #[test]
    fn uninitialize_removes_only_local_binding() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("x", 5, false, false, false).unwrap();
        let child = Scope::child(&root);
        assert!(child.borrow_mut().uninitialize("x").is_err());
        assert!(root.borrow_mut().uninitialize("x").is_ok());
        assert!(!has(&root, "x"));
    }

    #[test]
    fn uninitialize_reserved_binding_fails() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("Int", 0, true, false, false).unwrap();
        assert_eq!(root.borrow_mut().uninitialize("Int"), Err(ScopeError::Reserved("Int".into())));
        assert!(has(&root, "Int"));
    }

    #[test]
    fn uninitialize_constant_binding_fails() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("x", 5, false, true, false).unwrap();
        assert_eq!(root.borrow_mut().uninitialize("x"), Err(ScopeError::Constant("x".into())));
        assert!(has(&root, "x"));
    }

    #[test]
    fn counter_is_shared_and_monotonic_across_chain() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("a", 1, false, false, false).unwrap();
        let child = Scope::child(&root);
        child.borrow_mut().initialize("b", 2, false, false, false).unwrap();
        let a_counter = get_variable_full(&root, "a").unwrap().counter;
        let b_counter = get_variable_full(&child, "b").unwrap().counter;
        assert!(b_counter > a_counter);
    }

    #[test]
    fn initialize_cannot_shadow_a_reserved_ancestor_binding() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("Int", 1, true, true, true).unwrap();
        let child = Scope::child(&root);
        let err = child.borrow_mut().initialize("Int", 2, false, false, true).unwrap_err();
        assert_eq!(err, ScopeError::Reserved("Int".into()));
    }

    #[test]
    fn variable_and_type_namespaces_are_distinct() {
        let root: SharedScope<i64> = Scope::root();
        root.borrow_mut().initialize("Int", 1, false, false, true).unwrap();
        assert!(get_type_full(&root, "Int").is_some());
        assert!(get_variable_full(&root, "Int").is_none());
    }
}
