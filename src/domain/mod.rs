mod forecast;
mod paths;
mod series;
mod transaction;

pub use forecast::*;
pub use paths::*;
pub use series::*;
pub use transaction::*;
