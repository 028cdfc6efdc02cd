//! The thesis preview/export pipeline.
//!
//! Turns stored rich-text section bodies into one assembled document:
//! footnote markers are renumbered continuously across sections, a
//! deduplicated Harvard reference list is generated from the linked research
//! items, and everything user-authored passes through an allow-list sanitizer
//! before it is ever injected as live markup.
//!
//! The pipeline is a strict single pass: loader output goes in
//! ([`uppsats_core::research::SectionWithResearch`] in ascending sort order),
//! a [`document::RenderedDocument`] comes out, and the print page, the
//! client-side PDF rasterization, and the server-side DOCX conversion all
//! reuse that one result.

// Native `async fn` in traits, as in the store trait.
#![allow(async_fn_in_trait)]

pub mod docx;
pub mod document;
pub mod error;
pub mod footnote;
pub mod page;
pub mod reference;
pub mod sanitize;

pub use error::{Error, Result};
