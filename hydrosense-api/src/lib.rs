pub mod epoch;
pub mod models;
pub mod restful;
pub mod telegram;

pub use models::*;
pub use telegram::{ParseError, Telegram};
