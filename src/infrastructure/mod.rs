//! Infrastructure layer - Store implementation and process plumbing

pub mod logging;
pub mod user;
