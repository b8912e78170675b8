mod line;
pub use line::*;

mod volume;
pub use volume::*;
