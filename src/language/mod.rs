// Types representing the Technique procedures language

mod error;
mod quantity;
mod resolve;
mod span;
mod types;

// Re-export all public symbols
pub use error::*;
pub use quantity::*;
pub use resolve::*;
pub use span::*;
pub use types::*;
