//! colcontract engine - contract evaluation
//!
//! Checks every column of the selected catalog models against the
//! bidirectional name/type contract and reduces the result to a single
//! pass/fail status.

pub mod column_contract;

pub use column_contract::{ColumnContract, ColumnVerdict, ContractOutcome};
