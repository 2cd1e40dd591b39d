//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into caller-level APIs.
//! - Keep transports (CLI) decoupled from storage details.

pub mod vehicle_service;
