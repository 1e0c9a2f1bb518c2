#![deny(unsafe_code)]

mod normalize;
mod rules;

pub use normalize::{Normalized, normalize};
pub use rules::match_field;
