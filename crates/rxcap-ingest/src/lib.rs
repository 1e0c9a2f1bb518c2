#![deny(unsafe_code)]

pub mod codes;
pub mod csv_table;
mod error;

pub use codes::{CodeList, load_codes, read_codes_file};
pub use csv_table::read_raw_table;
pub use error::IngestError;
