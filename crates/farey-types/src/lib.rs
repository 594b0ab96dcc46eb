//! The Farey algebraic type model: the [`Type`] enum itself, structural
//! matching and intersection over it, and the [`TypeIndex`] dispatch
//! table every later stage (operator table, interpreter, IR translator)
//! keys its signatures by.

mod index;
mod matching;
mod ty;

pub use index::TypeIndex;
pub use matching::{apply_mappings, equals, get_return_type_for_args, intersect, match_types, Mapping, MatchResult};
pub use ty::Type;
