//! The raw PX opcode stream: a custom LZ77 variant with nibble-packed
//! literal/sequence opcodes and a runtime-selected control-flag alphabet.
//!
//! This module only speaks the bare opcode stream (no framing); see
//! [`crate::pkdpx`] for the `PKDPX` container that wraps it with a header.

mod compress;
mod decompress;

pub use compress::compress_px;
pub use decompress::decompress_px;

/// Number of control flags selecting which high nibbles decode as
/// four-nibble expansions rather than back-references.
pub const FLAG_COUNT: usize = 9;

/// Sliding window size, in bytes, for back-references.
pub const WINDOW_SIZE: usize = 4096;

/// Minimum and maximum run length for a sequence (back-reference) operation.
pub const MIN_RUN: usize = 3;
pub const MAX_RUN: usize = 18;
