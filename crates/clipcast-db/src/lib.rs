//! Database repositories for the record store.
//!
//! The record store is the single source of truth for media and account
//! state. Status and classification writes go through compare-and-set
//! methods keyed on the record's `version` column so concurrent writers are
//! detected instead of silently overwriting each other.

pub mod account;
pub mod media;
pub mod pool;

pub use account::AccountRepository;
pub use media::MediaRepository;
pub use pool::setup_database;
