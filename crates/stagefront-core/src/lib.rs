pub mod catalog;
pub mod errors;
pub mod model;
pub mod pipeline;
pub mod query;

pub use catalog::*;
pub use errors::*;
pub use model::*;
pub use pipeline::*;
pub use query::*;
