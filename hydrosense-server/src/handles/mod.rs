mod aggregate_handle;
mod health_handle;
mod sensor_handle;

pub use aggregate_handle::*;
pub use health_handle::*;
pub use sensor_handle::*;
