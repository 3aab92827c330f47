mod interface;
mod varint;

pub use interface::*;
pub use varint::*;
