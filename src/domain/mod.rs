//! Domain models for Hireboard Core

pub mod audit;
pub mod common;
pub mod permission;
pub mod profile;
pub mod tenant;

pub use audit::*;
pub use common::StringUuid;
pub use permission::*;
pub use profile::*;
pub use tenant::*;
