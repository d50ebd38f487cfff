// Application layer: the per-user pipeline and its driver.
// Components borrow the store from the caller; nothing here opens connections.

mod driver;
pub mod error;
mod loader;
mod writer;

pub use driver::*;
pub use error::*;
pub use loader::*;
pub use writer::*;
