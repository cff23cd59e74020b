#![doc = include_str!("../README.md")]

mod buffer;
mod byte_size;
pub mod error;
mod reader;
mod shared;
mod traits;
mod view;
mod writer;

pub use buffer::*;
pub use byte_size::*;
pub use error::{Error, Result};
pub use reader::*;
pub use shared::*;
pub use traits::*;
pub use view::*;
pub use writer::*;
