//! Common library for the Handcrafted Haven marketplace
//!
//! This crate provides functionality shared by the auth and api services:
//! database connectivity and migrations, the Redis client, seller sessions,
//! input validation and listener configuration.

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod session;
pub mod validation;
