//! Transformation module.
//!
//! This module turns parsed CSV rows into dashboard artifacts:
//! - Normalize: region split, localized numbers, provisional markers
//! - Pivot: long rows to the wide table
//! - Pipeline: parse → normalize → pivot, with fetch caching

pub mod normalize;
pub mod pivot;
pub mod pipeline;

pub use normalize::{normalize, parse_localized_number, split_region, strip_provisional};
pub use pivot::{pivot, PivotOutcome};
pub use pipeline::*;
