//! Loan-Product Guide Catalog
//!
//! Converts between a normalized JSON corpus of loan-product guides and a
//! human-editable markdown tree (front matter + blockquote memo +
//! sectioned tables), and derives a search/filter index over the
//! collection.
//!
//! Module map:
//! - `model`: records, sections, fields, canonical section ordering
//! - `codec/`: text-cell, table, and document codecs (the round-trip core)
//! - `layout`: deterministic filesystem projection for guide documents
//! - `index`: derived catalog index (`_index.json`)
//! - `batch`: export/import drivers with per-record error accumulation
//! - `fetch` (feature `fetch`): acquisition from the upstream catalog
//!   service, producing the initial corpus

pub mod batch;
pub mod codec;
pub mod index;
pub mod layout;
pub mod model;

#[cfg(feature = "fetch")]
pub mod fetch;

// Re-export commonly used types
pub use batch::{
    export_tree, import_tree, reset_guide_tree, CatalogError, ExportReport, ImportReport,
};
pub use codec::{decode_document, encode_document, DecodedDocument, FrontMatter};
pub use index::{Index, IndexItem, IndexMeta};
pub use model::{Field, Record, Section};
