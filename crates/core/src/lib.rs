#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod time;

pub use error::{CardError, QuizError};
pub use time::Clock;
