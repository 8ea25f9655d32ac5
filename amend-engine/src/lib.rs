//! Engine for correctable checks: the amendment contract, pipeline
//! composition, and the executor that folds a pipeline over one value.
//!
//! This crate owns *how* amendments compose and run. It does not own any
//! concrete amendment; those live in `amend-builtins` (or in the caller's
//! own code) behind the [`Amendment`] trait.
//!
//! # Two failure classes
//!
//! - An amendment failure (bad input data) is returned as an
//!   [`AmendOutcome`](amend_types::AmendOutcome) with `conforms = false` and
//!   a structured reason. It is ordinary data.
//! - An implementation failure (a buggy amendment) propagates out of
//!   [`apply`] as an [`ApplyError`]. It is never downgraded to a
//!   non-conforming outcome.

mod amendment;
mod exec;
mod pipeline;
mod registry;

pub use amendment::{Amendment, Check, Correction};
pub use exec::{apply, apply_steps, ApplyError};
pub use pipeline::Pipeline;
pub use registry::Registry;
