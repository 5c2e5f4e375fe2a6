//! Status page data: models, aggregation and classification.
//!
//! Nothing in this module performs I/O.

mod aggregate;
mod history;
mod models;
mod status;

pub use aggregate::*;
pub use history::*;
pub use models::*;
pub use status::*;
