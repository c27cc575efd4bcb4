//! The ROM collaborator contract.
//!
//! Mirrors [`Archive`](crate) in spirit: the core never implements the ROM
//! container format itself, it only speaks to one through this trait. An
//! implementer owns the internal layout; the editor only ever calls `get`,
//! `put`, and `write_to`.

use std::path::Path;

use crate::error::Result;

/// An opaque byte-level key-value store backed by a ROM image.
///
/// `get` must return [`crate::error::Error::NotFoundInRom`] when `name` is
/// not present. `put` mutates the in-memory image only; `write_to` is the
/// only operation that touches the filesystem.
pub trait RomSource {
    fn get(&self, name: &str) -> Result<Vec<u8>>;

    fn put(&mut self, name: &str, data: Vec<u8>);

    fn write_to(&self, path: &Path) -> Result<()>;
}
