use thiserror::Error;

/// The closed set of failures the core can produce.
#[derive(Debug, Error)]
pub enum Error {
    #[error("buffer is too small to be a pack ({len} bytes)")]
    TooSmall { len: usize },

    #[error("not a valid pack file")]
    InvalidPack,

    #[error("entry {index} is empty")]
    EmptyEntry { index: usize },

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no origin to save to")]
    NoOrigin,

    #[error("no ROM loaded")]
    NoRom,

    #[error("{name} not found in ROM")]
    NotFoundInRom { name: String },

    #[error("bad magic, expected {expected:?}, found {found:?}")]
    BadMagic { expected: &'static [u8], found: Vec<u8> },

    #[error("back-reference offset out of range")]
    BadOffset,

    #[error("decompressed size {actual} does not match declared size {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
