//! Core types and schemas for the growth metrics pipeline.

pub mod error;
pub mod events;
pub mod rows;

pub use error::{Error, Result};
pub use events::*;
pub use rows::*;
