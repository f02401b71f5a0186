pub mod error;
pub mod geometry;
pub mod model;
pub mod result;
pub mod store;

pub use error::*;
pub use geometry::*;
pub use model::*;
pub use result::*;
pub use store::*;
