//! Asynchronous evaluation of networks.
//!
//! This module keeps the interactive thread free while networks evaluate:
//! - [`Pending`] is the completion handle of one evaluation, with
//!   continuation chaining through [`Pending::then`]
//! - [`EvaluationDriver`] schedules evaluations on tokio's blocking pool
//! - [`Workspace`] holds the active network and discards stale results

pub mod driver;
pub mod pending;
pub mod workspace;
