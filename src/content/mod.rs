//! Attraction and activity content
//!
//! - `llm`: chat completion and image generation client
//! - `curated`: model-written attractions and activities
//! - `places`: location-based attractions from a place search
//! - `merge`: combines both attraction sources

pub mod curated;
pub mod llm;
pub mod merge;
pub mod places;

pub use curated::Curator;
pub use llm::LanguageModel;
pub use merge::merge_attractions;
pub use places::PlaceSearch;
