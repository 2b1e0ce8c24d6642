//! # Integration Tests
//!
//! Full registry flows driven through the public API.

pub mod end_to_end;
pub mod persistence;
pub mod random_trees;
