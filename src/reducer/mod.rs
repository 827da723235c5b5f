//! Reducer Pipeline (spec §4.2): ten pure text transforms over an outline,
//! plus a Baseline variant that skips the pipeline entirely. Every reducer
//! honors the same contract: a line carrying `[ref=e<n>]` is either kept
//! verbatim, its reference relocated into a preserved summary line, or
//! dropped only as part of a subtree with no surviving reference at all.

pub mod attrs;
pub mod baseline;
pub mod chrome;
pub mod collapse;
pub mod compress;
pub mod dedup;
mod doc;
pub mod interactive_only;
pub mod noise;
pub mod pipeline;
pub mod smart_truncate;
pub mod truncate;
pub mod viewport;

pub use baseline::build_baseline_outline;
pub use compress::AirportTable;
pub use pipeline::{run, PipelineOptions};
