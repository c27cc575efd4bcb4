//! The `PKDPX` container: a 20-byte header wrapped around a raw PX opcode
//! stream (see [`crate::px`]).

use byteorder::{ByteOrder, LittleEndian};

use crate::bytes::{read_u16_le, read_u32_le, write_u32_le};
use crate::error::{Error, Result};
use crate::px::{self, FLAG_COUNT};

const MAGIC: &[u8] = b"PKDPX";
const HEADER_LEN: usize = 20;

/// Decompresses a complete `PKDPX` file (header + payload) into the bytes it
/// represents.
pub fn decompress(file: &[u8]) -> Result<Vec<u8>> {
    if file.len() < HEADER_LEN || &file[0..5] != MAGIC {
        return Err(Error::BadMagic {
            expected: MAGIC,
            found: file[..file.len().min(5)].to_vec(),
        });
    }

    let container_len = read_u16_le(file, 5) as usize;
    let mut flags = [0u8; FLAG_COUNT];
    flags.copy_from_slice(&file[7..16]);
    let uncompressed_len = read_u32_le(file, 16) as usize;

    let payload_len = container_len.saturating_sub(HEADER_LEN);
    let payload = &file[HEADER_LEN..(HEADER_LEN + payload_len).min(file.len())];

    let out = px::decompress_px(payload, &flags)?;
    if out.len() != uncompressed_len {
        return Err(Error::SizeMismatch {
            expected: uncompressed_len,
            actual: out.len(),
        });
    }

    log::debug!(
        "pkdpx decompress: {} byte payload -> {} bytes",
        payload_len,
        out.len()
    );
    Ok(out)
}

/// Compresses `data` into a complete framed `PKDPX` file.
#[must_use]
pub fn compress(data: &[u8]) -> Vec<u8> {
    let (flags, payload) = px::compress_px(data);

    let mut out = vec![0u8; HEADER_LEN];
    out[0..5].copy_from_slice(MAGIC);
    let container_len = (HEADER_LEN + payload.len()) as u16;
    LittleEndian::write_u16(&mut out[5..7], container_len);
    out[7..16].copy_from_slice(&flags);
    write_u32_le(&mut out, 16, data.len() as u32);
    out.extend_from_slice(&payload);

    log::debug!(
        "pkdpx compress: {} bytes -> {} byte file",
        data.len(),
        out.len()
    );
    out
}
