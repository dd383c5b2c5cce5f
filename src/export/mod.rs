//! Downloadable itinerary formats

pub mod document;
pub mod text;

pub use document::{ImageEmbedder, build_document};
pub use text::render_text;

/// Fixed advice appended to every text export
pub const TRAVEL_TIPS: [&str; 6] = [
    "Book accommodations in advance for better prices",
    "Use public transportation to explore the city",
    "Try local restaurants for authentic cuisine",
    "Respect local customs and traditions",
    "Keep important documents and valuables safe",
    "Stay connected with travel insurance",
];
