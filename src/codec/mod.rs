//! Codec layers for the guide document format
//!
//! Three layers, leaves first:
//! - `cell`: one textual value <-> one table-cell-safe line
//! - `table`: ordered (name, detail) pairs <-> a pipe-delimited table block
//! - `document`: a full record <-> a markdown guide document
//!
//! Each layer is applied whole or not at all: detail text is cell-encoded
//! immediately before it enters a row and cell-decoded immediately after
//! extraction, never partially.

pub mod cell;
pub mod document;
pub mod table;

pub use document::{decode_document, encode_document, DecodedDocument, FrontMatter};
