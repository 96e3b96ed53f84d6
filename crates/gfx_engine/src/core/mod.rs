//! Core module - engine-wide configuration

pub mod config;
