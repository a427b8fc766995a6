pub mod rule;
pub mod transcript;
pub mod translation;
pub mod verdict;

pub use rule::*;
pub use transcript::*;
pub use translation::*;
pub use verdict::*;
