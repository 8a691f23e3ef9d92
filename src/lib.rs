pub mod args;
pub mod create;
pub mod engines;
pub mod error;
pub mod finalize;
pub mod guard;
pub mod log;
pub mod manifest;
pub mod name;
pub mod template;

pub use create::{Created, Scaffold, TargetDescriptor};
pub use error::CreateError;
