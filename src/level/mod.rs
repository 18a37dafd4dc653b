//! Level (map) persistence
//!
//! A level is a grid of block codes plus three tuning values, stored as a
//! line-oriented text file:
//!
//! ```text
//! 0,-1,-1,0
//! 2,-3,-3,2
//! ;
//! 1.5,0,0.02
//! ```
//!
//! Each line before `;` is one grid column; the line after it holds
//! `ball_velocity,theme,gravity`.

pub mod error;
pub mod format;
pub mod grid;

pub use error::{LevelError, OversizeAxis};
pub use format::{ParsedLevel, parse, serialize};
pub use grid::{LevelGrid, LevelTuning};
