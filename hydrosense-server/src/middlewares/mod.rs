mod status_middleware;

pub use status_middleware::*;
