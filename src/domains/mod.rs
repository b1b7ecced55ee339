//! Domains module containing business logic organized by bounded contexts.
//!
//! - `resources`: what the node exposes over CoAP
//! - `hardware`: the devices those resources read and drive

pub mod hardware;
pub mod resources;
