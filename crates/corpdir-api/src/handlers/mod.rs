//! HTTP handlers for corpdir-api.

pub mod companies;
pub mod search;
pub mod system;
