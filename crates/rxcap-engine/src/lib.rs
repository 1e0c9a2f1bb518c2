#![deny(unsafe_code)]

pub mod filter;
pub mod index;
pub mod payload;
pub mod resolve;
pub mod selection;
pub mod session;

pub use filter::{SearchView, filter_values};
pub use index::distinct_values;
pub use payload::{MAX_FIELD_LEN, PayloadInput, SubmissionPayload, build_payload};
pub use resolve::{Resolution, resolve};
pub use selection::{SelectError, SelectOutcome, SelectionState};
pub use session::{LoadReport, Session, SessionError};
