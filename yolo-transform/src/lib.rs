//! Transform pipeline turning (image, boxes) samples into detector training input.
//!
//! A [`Sample`](sample::Sample) moves through the stages of a
//! [`Pipeline`](pipeline::Pipeline). Every stage checks the image layout and
//! the box format it receives, so a misordered pipeline fails at the first
//! stage that gets the wrong input.

pub mod augment;
mod common;
pub mod config;
pub mod convert;
pub mod io;
pub mod labels;
pub mod pipeline;
pub mod sample;
pub mod tensor;

pub use config::*;
pub use pipeline::*;
pub use sample::*;
