mod aggregate;
mod reading;

pub use aggregate::{AggregateRow, AggregateTable};
pub use reading::{ReadingRow, ReadingTable};

pub trait Table {
    /// The name of the table
    fn name(&self) -> &'static str;

    /// The SQL statement to create the table
    fn create(&self) -> String;

    /// The SQL statement to dispose the table
    fn dispose(&self) -> String;
}
