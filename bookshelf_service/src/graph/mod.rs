//! Execution of parsed work items against the catalogue.
//!
//! A [`operation::WorkItem`] names one root field with its arguments and a
//! selection set. The [`executor::Executor`] runs it and renders the result
//! as JSON, resolving relationship fields only when they are selected.

/// Work item execution.
pub mod executor;

/// Root fields and their arguments.
pub mod operation;

/// Response envelope.
pub mod response;

/// Selection sets.
pub mod selection;
