//! Catobase Store - File Tagging Registry
//!
//! Catobase attaches category labels to files and records each registration
//! as one line in a flat, append-only registry file. Queries scan the registry
//! and select paths by regular expression and required categories.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Category   │     │  Registrar  │     │  Registry   │     │    Query    │
//! │  Listing    │────▶│ (validate → │────▶│ (append-only│────▶│   Engine    │
//! │ (reference) │     │  snapshot)  │     │    file)    │     │ (regex+cats)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Core Concepts
//!
//! - **Category Listing**: text file, one label per line; the reference vocabulary
//! - **Record**: `path|cat1,cat2|timestamp`, one per registry line
//! - **Registry**: the append-only file of records, created by an explicit setup step
//! - **Snapshot**: optional `<path>.copy` taken at registration time

pub mod config;
pub mod error;
pub mod listing;
pub mod query;
pub mod record;
pub mod register;
pub mod registry;

// Re-exports for convenience
pub use config::CatobaseConfig;
pub use error::{CatobaseError, Result};
pub use listing::{create_category_listing, delete_category_entry, read_listing};
pub use query::QueryEngine;
pub use record::{format, Record};
pub use register::{BulkFailure, BulkReport, Registrar};
pub use registry::Registry;
