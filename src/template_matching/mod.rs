/// Template matching module for locating a template in captured frames
///
/// This module provides:
/// - Template construction with optional alpha weight masks
/// - A masked sum-of-squared-differences matcher behind the `TemplateMatcher` trait
/// - The similarity normalization every matcher result goes through
pub mod matcher;
pub mod types;

pub use matcher::{DEGENERATE_LOCATION, MAX_DIFF, SqDiffMatcher, TemplateMatcher, normalize_similarity};
pub use types::{Location, Mask, MatchResult, RawMatch, Template};
