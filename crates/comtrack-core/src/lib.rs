//! # comtrack-core — Foundational Types for the Commission Engine
//!
//! This crate is the leaf of the workspace. It defines the data that flows
//! through the commission calculator and the monthly rollup engine. Every
//! other `comtrack-*` crate depends on it; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Pure data.** `Policy` and `Payment` carry no behaviour beyond
//!    accessors. All arithmetic lives in `comtrack-engine`.
//!
//! 2. **One canonical payment shape.** Upstream sources disagree on field
//!    names (`date` vs `paymentDate`, `receipts` vs `actualReceipts`) and
//!    sometimes send numbers as strings. [`RawPayment`] absorbs those
//!    variants once, at the boundary. Nothing downstream branches on them.
//!
//! 3. **`MonthKey` for bucketing.** A validated `YYYY-MM` value whose
//!    ordering is chronological and matches the ordering of its string form.
//!
//! 4. **Wire-compatible field names.** Externally visible shapes serialize
//!    with camelCase names (`productRatePct`, `advisorEmail`, ...).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `comtrack-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod month;
pub mod payment;
pub mod policy;
pub mod raw;

// Re-export primary types for ergonomic imports.
pub use error::ComtrackError;
pub use identity::{PaymentId, ProductId};
pub use month::MonthKey;
pub use payment::{Payment, PaymentStatus};
pub use policy::{Policy, PolicyBook, Split, SplitRole};
pub use raw::RawPayment;
