// src/lib.rs

pub mod batch;
pub mod cache;
pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod preview;
pub mod queue;
pub mod remote;

pub use crate::batch::ChatMessage;
pub use crate::config::EngineConfig;
pub use crate::core::engine::TranslationEngine;
pub use crate::core::types::{Priority, TranslationResult};
pub use crate::error::{Result, TranslationError};
pub use crate::preview::{LivePreview, Preview};
