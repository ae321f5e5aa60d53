//! restdir — a minimal HTTP file server over a directory tree
//!
//! Exposes a served root as a REST-like resource space: `GET` reads a file,
//! `PUT` creates or overwrites one, `DELETE` removes one. Every request path
//! is resolved and confined to the root before any filesystem access.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod resolve;
