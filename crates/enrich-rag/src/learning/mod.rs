//! User feedback on answers

mod ratings;

pub use ratings::{RatingRecord, RatingStore};
