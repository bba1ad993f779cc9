//! Storage module for database access and rating persistence.

pub mod database;
pub mod schema;
pub mod vibe_store;

pub use database::{Database, DatabaseError};
pub use vibe_store::{
    ChangeReason, DomainVibeLevel, VibeLevelChange, VibeStore, VibeStoreError,
};
