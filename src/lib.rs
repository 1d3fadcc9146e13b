//! Linked-data document processing: context-driven expansion, compaction, context
//! merging, and context URL resolution.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use self::{
    compact::compact,
    context::Context,
    error::{Error, ErrorCode, Result},
    expand::expand,
    processor::Processor,
    resolve::{resolve_urls, UrlResolver, UrlResolverKind},
};

mod coerce;
mod compact;
mod context;
mod double;
mod error;
mod expand;
mod iri;
mod json;
mod keyword;
mod processor;
mod resolve;
pub mod values;
