// src/models/mod.rs

//! Domain models for the crawler application.

mod item;
mod listing;

// Re-export all public types
pub use item::{Item, ItemKind};
pub use listing::{ItemDetail, ItemListing};
