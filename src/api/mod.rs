//! # API Layer
//!
//! External interfaces of the service.
//!
//! - [`rest`]: JSON over HTTP with bearer authentication

pub mod rest;
