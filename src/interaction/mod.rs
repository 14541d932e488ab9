//! Pointer interaction with the foliage

pub mod pointer;

pub use pointer::{InteractionConfig, InteractionSample, PointerField};
