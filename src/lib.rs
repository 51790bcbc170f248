//! Geolocator - A rate-limited, caching IP geolocation resolver
//!
//! This library provides the core functionality for the Geolocator service:
//! classifying IP addresses, resolving public addresses through an external
//! geolocation API, and caching results with bounded memory.
//!
//! # Architecture
//! - `cache`: Bounded FIFO cache with lazy time-based expiry
//! - `resolver`: Resolution orchestration, rate limiting and external fetch
//! - `config`: Configuration management
//! - `system`: Logging and clock abstraction
//! - `utils`: IP address classification helpers

pub mod cache;
pub mod config;
pub mod errors;
pub mod resolver;
pub mod system;
pub mod utils;
