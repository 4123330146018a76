//! Variable model
//!
//! - [`value`]: type-tagged scalar values and the declared types
//! - [`store`]: the variable table of a run

pub mod store;
pub mod value;

pub use store::{StoreError, Variable, VariableStore};
pub use value::{Value, VarType};
