//! Catalog API access for the sheetfill pipeline.
//!
//! The reporting catalog exposes a search index, a document store, and a
//! thesaurus. This crate wraps the three endpoints the filler needs behind
//! [`CatalogClient`] and turns thesaurus payloads into the
//! [`TermDirectory`](sheetfill_engine::TermDirectory) consumed by
//! normalization.

mod client;
mod countries;
mod error;

pub use client::{
    CatalogClient, DEFAULT_BASE, ReportHandle, TERM_DOMAINS, term_directory_from_slice,
};
pub use countries::country_term;
pub use error::CatalogError;
