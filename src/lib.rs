//! Core library for the postcode-vehicles command line application.
//!
//! The library reshapes the vehicle registration export (counts by postcode,
//! make/model, year of manufacture, and fuel type) from its wide spreadsheet
//! layout into a long table. Reading and writing live under [`io`], the
//! table representation and source layout inside [`model`], the individual
//! table operations in [`reshape`], and the end-to-end pipeline under
//! [`reformat`].

pub mod error;
pub mod io;
pub mod model;
pub mod reformat;
pub mod reshape;

pub use error::{Result, ToolError};
