mod aggregate;
mod query;
mod reading;

pub use aggregate::*;
pub use query::*;
pub use reading::*;
