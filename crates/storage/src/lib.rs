//! File storage for the growth metrics pipeline.
//!
//! Reads the raw clickstream CSV and writes result tables as
//! `<output_dir>/<table>/part-00000.csv` directories with overwrite semantics.

pub mod config;
pub mod reader;
pub mod tables;
pub mod writer;

pub use config::*;
pub use reader::*;
pub use tables::*;
pub use writer::*;
