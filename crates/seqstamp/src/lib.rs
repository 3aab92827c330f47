#![doc = include_str!("../README.md")]

mod compact;
mod encoding;
mod error;
mod generator;
mod rand;
#[cfg(feature = "serde")]
mod serde;
mod time;
mod timestamp;

pub use crate::compact::*;
pub use crate::encoding::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::rand::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
pub use crate::timestamp::*;
