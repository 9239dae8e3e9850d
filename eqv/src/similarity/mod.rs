//! The equivalence and similarity engine.
//!
//! [`equivalence`] decides whether two expression trees denote the same object, trying a
//! symbolic proof first and falling back to deterministic numeric sampling. [`structure`]
//! scores how similar two trees look, independent of equivalence. [`scorer`] combines the two
//! into one score with a documented weighting policy.

pub mod equivalence;
pub mod scorer;
pub mod structure;
