//! Clipcast API
//!
//! HTTP surface for the video platform: upload intake, lifecycle pipeline,
//! live progress fanout, and range-addressable streaming.

pub mod api_doc;
pub mod auth;
pub mod error;
pub mod events;
pub mod handlers;
pub mod pipeline;
pub mod policy;
pub mod range;
pub mod setup;
pub mod state;
