//! Request execution: one authenticated GET per call

pub mod executor;
pub mod path;
pub mod ports;

pub use executor::RequestExecutor;
pub use path::ResourcePath;
pub use ports::{HttpRequest, HttpResponse, HttpTransport};
