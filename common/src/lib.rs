//! Shared model and editing core for the datasync mapping editor.
//!
//! Nothing in this crate touches the DOM or the network. The frontend drives
//! a [`session::MappingSession`] with user events and feeds it the results of
//! the caller's [`fetch::TableListFetcher`].

pub mod config;
pub mod fetch;
pub mod model;
pub mod schedule;
pub mod session;
