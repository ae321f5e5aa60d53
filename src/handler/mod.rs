//! Request handler module
//!
//! Responsible for request dispatch and the per-verb filesystem operations.

pub mod files;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
