pub mod client;
pub mod prompts;
pub mod translator;
pub mod validation;

pub use client::*;
pub use prompts::*;
pub use translator::*;
pub use validation::*;
