//! Query functions over the decision schema.

pub mod decisions;
