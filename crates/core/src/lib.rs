#![forbid(unsafe_code)]

pub mod bank;
pub mod error;
pub mod mastery;
pub mod model;
pub mod time;

pub use bank::QuestionBank;
pub use error::Error;
pub use time::Clock;
