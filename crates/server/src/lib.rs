//! Stockroom server library.
//!
//! Inventory and order management backend: a product catalog with
//! filtered listings, session-based authentication with user and admin
//! roles, and an order placement workflow built on atomic conditional
//! stock decrements.
//!
//! The binary in `main.rs` wires these modules together; the CLI crate
//! reuses the database layer and auth primitives.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod services;
pub mod state;
