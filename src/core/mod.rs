pub mod dataset;
pub mod error;
pub mod grouping;
pub mod operations;
pub mod storage;

pub use error::{HubError, HubResult};
