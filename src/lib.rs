#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod bytes;
pub mod editor;
pub mod error;
pub mod pack;
pub mod pkdpx;
pub mod px;
pub mod rom;
pub mod sniffer;

pub use editor::PackEditor;
pub use error::{Error, Result};
pub use pack::Pack;
pub use rom::RomSource;
pub use sniffer::EntryType;
