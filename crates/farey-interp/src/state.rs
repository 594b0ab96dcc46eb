//! [`State`]: the interpreter's one piece of threaded context, a handle
//! onto the current lexical scope.

use farey_ops::Value;
use farey_scope::{Scope, SharedScope};

/// A snapshot of where in the scope chain evaluation currently sits.
/// Cheap to clone -- it's just an `Rc` handle, like every other
/// [`SharedScope`] consumer in this workspace.
#[derive(Clone)]
pub struct State {
    pub scope: SharedScope<Value>,
}

impl State {
    /// A fresh, parentless scope with no bindings.
    pub fn root() -> State {
        State { scope: Scope::root() }
    }

    /// Open a child scope under this state's own, for entering a block.
    pub fn child(&self) -> State {
        State { scope: Scope::child(&self.scope) }
    }
}
