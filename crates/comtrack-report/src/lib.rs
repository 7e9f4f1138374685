//! # comtrack-report — Reporting Consumers of the Engine
//!
//! Thin layers over `comtrack-engine` output:
//!
//! - **CSV export** of any sequence of uniform serializable records, with
//!   the header taken from the first record's fields.
//! - **Export permission**: which roles may download CSV.
//! - **Audit trail**: append-only record of who priced what, behind a
//!   repository trait so storage can be swapped.
//! - **Report templates**: saved period and advisor selections that
//!   resolve to rollup options, behind their own repository trait.
//!
//! Nothing here performs I/O. Repositories are in-memory; durable storage
//! is provided by implementing the traits elsewhere.

pub mod audit;
pub mod error;
pub mod export;
pub mod permissions;
pub mod templates;

// Re-export primary types.
pub use audit::{normalize_action, AuditEntry, AuditRepository, AuditTrail};
pub use error::ReportError;
pub use export::{export_csv_as, to_csv};
pub use permissions::{can_export_csv, CSV_EXPORT_ROLES};
pub use templates::{InMemoryTemplates, ReportTemplate, TemplateRepository};
