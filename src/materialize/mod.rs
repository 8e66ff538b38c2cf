//! Layer materialization strategies.
//!
//! - `local` evaluates the feature filter in-process over an in-memory collection
//!   and drives the renderer with a full clear-then-add replacement.
//! - `predicate` compiles the same decision into a CQL predicate for a remote map server.

mod local;
mod predicate;

pub use local::{apply_to, materialize, materialize_indices, MapRenderer};
pub use predicate::compile_predicate;
pub(crate) use predicate::bbox_clause;
