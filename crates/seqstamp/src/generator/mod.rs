mod interface;
mod mutex;
mod sequencer;
mod unique_id;

pub use interface::*;
pub(crate) use mutex::*;
pub use sequencer::*;
pub use unique_id::*;
