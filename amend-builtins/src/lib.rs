//! Built-in amendment catalog for the amend pipeline engine.
//!
//! One stateless struct per correctable check, grouped by domain:
//!
//! - numbers: integer/real coercion, finiteness, rounding
//! - bounds: same-kind range windows (clamp or reject) shared by the
//!   numeric and temporal kinds
//! - text: text/binary coercion and truncate-and-pad length normalization
//! - containers: sequence, set, and mapping coercions plus size gates
//! - temporals: date/time/date-time/offset parsing and narrowing
//! - paths: lexical path coercion and cleanup
//!
//! [`Catalog`] ties the standard pipelines to intent descriptors; it is an
//! explicit value with no global state. Misconfigured amendments fail at
//! construction with [`CatalogError`], before any pipeline runs.

mod bounds;
mod catalog;
mod containers;
mod error;
pub mod normalize;
mod numbers;
mod paths;
mod temporals;
mod text;

pub use bounds::{Bounds, BoundsMode};
pub use catalog::Catalog;
pub use containers::{CoerceToMap, CoerceToSeq, CoerceToSet, SizeBounds};
pub use error::CatalogError;
pub use normalize::Side;
pub use numbers::{CoerceToInt, CoerceToReal, FiniteReal, Round};
pub use paths::{CoerceToPath, NormalizePath};
pub use temporals::{CoerceToDate, CoerceToDateTime, CoerceToOffset, CoerceToTime};
pub use text::{CoerceToBinary, CoerceToText, LengthPolicy, NormalizeLength};
