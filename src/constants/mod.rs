//! Tuning constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! Constants are split into submodules by domain for easier navigation.

mod grab;
mod hand;
mod survival;
mod time;

pub use grab::*;
pub use hand::*;
pub use survival::*;
pub use time::*;
