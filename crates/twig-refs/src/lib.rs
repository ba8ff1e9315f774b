//! Named references for twig.
//!
//! - **Branches** are mutable pointers to commits, kept in a [`BranchTable`].
//! - **HEAD** names the checked-out branch together with the commit it points
//!   at. Outside an operation `branches[head.branch] == head.commit`.
//!
//! # Modules
//!
//! - [`error`]: Error types for ref operations
//! - [`types`]: [`Head`] and [`BranchTable`]
//! - [`names`]: Branch name validation

pub mod error;
pub mod names;
pub mod types;

pub use error::{RefError, Result};
pub use names::validate_branch_name;
pub use types::{BranchTable, Head};
