#![deny(unsafe_code)]

pub mod error;
pub mod key;
pub mod mapping;
pub mod schema;
pub mod table;
pub mod text;

pub use error::{Result, RxcapError, SchemaError};
pub use key::{FullKey, PartialKey};
pub use mapping::{HeaderMapping, HeaderMatch, MatchVia, NormalizeWarning};
pub use schema::{FieldDef, FieldRole, Schema, cascade_schema, flat_schema};
pub use table::{NormalizedRow, RawTable, RowSet};
pub use text::{locale_cmp, normalize_text};
