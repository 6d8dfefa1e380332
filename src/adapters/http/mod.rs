//! Backend transport adapters. Implement TransportPort.
//!
//! Provides the reqwest adapter and a mock adapter for offline use and testing.

pub mod client;
pub mod mock;

pub use client::HttpTransport;
pub use mock::{MockTransport, TransportCall};
