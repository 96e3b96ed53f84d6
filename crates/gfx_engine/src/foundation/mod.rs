//! Foundation module - Core utilities and types
//!
//! This module provides the fundamental building blocks used throughout the
//! engine:
//! - Generational resource pooling
//! - Handle types and validation

pub mod pool;

pub use pool::{PoolHandle, ResourcePool};
