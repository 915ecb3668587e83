//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store mutations and persistence into user-level actions.
//! - Keep FFI/UI layers decoupled from storage details.

pub mod todo_service;
