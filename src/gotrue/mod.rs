//! Hosted auth service (GoTrue-compatible REST API) integration

mod client;
mod types;

pub use client::GoTrueSessionProvider;
pub use types::*;
