//! Infrastructure adapters. Implement outbound ports and drive the inbound one.
//!
//! HTTP backend, terminal UI. Map errors to DomainError.

pub mod http;
pub mod ui;
