//! Request, result and tool types exchanged with a `LanguageModel`.

mod params;
mod response;
mod tools;

pub use params::*;
pub use response::*;
pub use tools::*;
