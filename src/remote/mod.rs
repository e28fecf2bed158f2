//! Remote collaborator subsystem.
//!
//! The inventory service is an opaque external dependency: it either
//! answers with a stock body or raises a classified [`RemoteFailure`].
//! Everything resilient about this crate happens in the layers wrapped
//! around this one.
//!
//! [`RemoteFailure`]: crate::failure::RemoteFailure

pub mod client;

pub use client::{HttpInventoryClient, InventoryCall};
