pub mod error;
pub mod ids;
pub mod result;
pub mod sync;

pub use error::*;
pub use ids::*;
pub use result::*;
pub use sync::*;
