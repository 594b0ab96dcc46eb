//! The runtime value type and the type-indexed operator dispatch table:
//! literal construction, multi-dispatch `+`/`-`/`*`/`/`/`//`
//! over `Int`/`Float`/`String`/`Fraction`, and the `SignatureError` +
//! substitution-suggestion machinery for proposing a single-argument
//! type fix when no overload matches.

mod builtins;
mod error;
mod table;
mod value;

pub use builtins::with_builtins;
pub use error::{Delta, SignatureError};
pub use table::{substitution_candidate, OpTable, OperatorFn};
pub use value::{Concrete, Value};
