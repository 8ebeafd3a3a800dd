//! eduboost-report: human-readable renderings of eduboost reports.
//!
//! JSON output lives with the report types in `eduboost_core::report`; this
//! crate adds Markdown (for pasting into tickets and emails) and a
//! self-contained HTML page.

pub mod html;
pub mod markdown;

#[cfg(test)]
pub(crate) mod fixtures;
