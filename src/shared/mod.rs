//! Cross-cutting support code.

pub mod config;
