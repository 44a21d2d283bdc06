// src/core/mod.rs
pub mod converter;
pub mod detector;
pub mod dictionary;
pub mod engine;
pub mod languages;
pub mod pivot;
pub mod tables;
pub mod trie;
pub mod types;
