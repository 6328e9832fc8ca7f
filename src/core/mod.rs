// src/core/mod.rs

pub mod normalize;
pub mod patterns;

pub use normalize::{class_key, normalize, split_compound};
