//! Tinsel - A particle and instance morphing engine for an interactive holiday tree

pub mod core;
pub mod math;
pub mod morph;
pub mod population;
pub mod interaction;
pub mod evaluate;
pub mod scene;
pub mod render;
