pub mod stage0_normalize;
pub mod stage1_translate;
pub mod stage2_match;
pub mod stage3_aggregate;

pub use stage0_normalize::*;
pub use stage1_translate::*;
pub use stage2_match::*;
pub use stage3_aggregate::*;
