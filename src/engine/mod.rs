//! # Calculation Engine
//!
//! The point-budget and stat derivation engine. Everything in here is a pure
//! function of a character record; the only state the calculators carry is a
//! memoization cache keyed by character id and a structural hash of the
//! fields each calculation depends on.

pub mod cache;
pub mod effects;
pub mod pools;
pub mod stats;
pub mod tier;
