//! Bookshelf API model.
//!
//! Types shared between the service and its callers:
//!
//! - Author and Book entities and their relationship links
//! - Inputs of the mutation operations
//! - Domain errors raised by the service

pub mod model;
