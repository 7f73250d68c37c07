pub mod fuzzy;
pub mod text;

pub use fuzzy::*;
pub use text::*;
