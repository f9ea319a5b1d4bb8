pub mod catalog;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod names;
pub mod session;
pub mod stats;

pub use error::{QuizError, Result};
