//! zlib compression blocks.
//!
//! Payloads are written as one or more 9-byte-header blocks:
//! ```text
//! bytes 0-1:  algorithm tag ("ZL")
//! byte  2:    method (8 = deflate)
//! bytes 3-5:  compressed size   (3-byte little-endian)
//! bytes 6-8:  uncompressed size (3-byte little-endian)
//! ```
//! The compressed payload immediately follows the 9-byte header.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::{Result, RootError};

const HEADER_LEN: usize = 9;
/// Largest chunk a 3-byte size field can describe.
const MAX_BLOCK: usize = 0xFF_FFFF;

/// Compress `src` at `level` (1..=9).
///
/// Returns `None` when compression is disabled or would not shrink the payload;
/// the caller then stores the bytes raw.
pub fn compress(src: &[u8], level: u32) -> Result<Option<Vec<u8>>> {
    if level == 0 || src.is_empty() {
        return Ok(None);
    }
    let mut out = Vec::with_capacity(src.len() / 2 + HEADER_LEN);
    for chunk in src.chunks(MAX_BLOCK) {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::new(level.min(9)));
        enc.write_all(chunk).map_err(|e| RootError::Compression(format!("zlib: {e}")))?;
        let packed = enc.finish().map_err(|e| RootError::Compression(format!("zlib: {e}")))?;
        if packed.len() > MAX_BLOCK {
            return Ok(None);
        }
        out.extend_from_slice(b"ZL");
        out.push(8);
        out.extend_from_slice(&write_le24(packed.len()));
        out.extend_from_slice(&write_le24(chunk.len()));
        out.extend_from_slice(&packed);
    }
    if out.len() >= src.len() {
        return Ok(None);
    }
    Ok(Some(out))
}

/// Decompress block-framed data into `expected_len` bytes.
pub fn decompress(src: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected_len);
    let mut offset = 0;

    while out.len() < expected_len && offset + HEADER_LEN <= src.len() {
        let tag = &src[offset..offset + 2];
        let c_size = read_le24(&src[offset + 3..offset + 6]);
        let u_size = read_le24(&src[offset + 6..offset + 9]);
        offset += HEADER_LEN;

        let end = offset + c_size;
        if end > src.len() {
            return Err(RootError::Decompression(format!(
                "compressed block claims {} bytes but only {} remain",
                c_size,
                src.len() - offset
            )));
        }

        if tag != b"ZL" {
            return Err(RootError::Decompression(format!(
                "unsupported compression algorithm: {}",
                String::from_utf8_lossy(tag)
            )));
        }
        let block = decompress_zlib(&src[offset..end], u_size)?;
        if block.len() != u_size {
            return Err(RootError::Decompression(format!(
                "expected {} uncompressed bytes, got {}",
                u_size,
                block.len()
            )));
        }

        out.extend_from_slice(&block);
        offset = end;
    }

    if out.len() != expected_len {
        return Err(RootError::Decompression(format!(
            "total decompressed length {} != expected {}",
            out.len(),
            expected_len
        )));
    }
    Ok(out)
}

fn decompress_zlib(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::with_capacity(expected);
    decoder.read_to_end(&mut out).map_err(|e| RootError::Decompression(format!("zlib: {e}")))?;
    Ok(out)
}

fn read_le24(b: &[u8]) -> usize {
    b[0] as usize | ((b[1] as usize) << 8) | ((b[2] as usize) << 16)
}

fn write_le24(v: usize) -> [u8; 3] {
    [(v & 0xFF) as u8, ((v >> 8) & 0xFF) as u8, ((v >> 16) & 0xFF) as u8]
}
