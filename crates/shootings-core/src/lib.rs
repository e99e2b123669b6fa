//! Core types and the normalization pipeline for the shootings dataset.
//!
//! This crate is deliberately free of CSV and database dependencies. It turns
//! flat incident rows into a [`NormalizedModel`] of dimension, entity, fact,
//! and bridge tables, and records every row it had to drop in a [`Report`].

// Native `async fn` in traits; see `store`.
#![allow(async_fn_in_trait)]

pub mod assemble;
pub mod diagnostics;
pub mod dimension;
pub mod entity;
pub mod error;
pub mod key;
pub mod model;
pub mod normalize;
pub mod parse;
pub mod record;
pub mod store;
pub mod table;

#[cfg(test)]
mod testing;

pub use diagnostics::Report;
pub use error::{Error, Result};
pub use key::{KeyAssigner, SurrogateKey};
pub use model::NormalizedModel;
pub use normalize::{Normalized, normalize};
pub use table::Table;
