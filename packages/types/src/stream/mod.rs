mod error;
mod stream;
mod totals;

pub use error::*;
pub use stream::*;
pub use totals::*;
