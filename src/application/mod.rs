// Application layer - use cases consumed by the shell.
// The service owns all state; callers hold it explicitly.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
