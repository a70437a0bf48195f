//! In-memory PNG encoding.
//!
//! Images with at most 256 distinct colors are written as indexed PNG
//! (color type 3); anything busier falls back to RGBA (color type 6).

use crc32fast::Hasher;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::Write;

use radar_common::{RadarError, RadarResult};

/// Eight-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

const MAX_PALETTE_SIZE: usize = 256;

/// Encode RGBA pixels, picking the smaller representation automatically.
pub fn encode(pixels: &[u8], width: usize, height: usize) -> RadarResult<Vec<u8>> {
    if pixels.len() != width * height * 4 {
        return Err(RadarError::Render(format!(
            "pixel buffer is {} bytes, expected {} for {}x{}",
            pixels.len(),
            width * height * 4,
            width,
            height
        )));
    }

    match extract_palette(pixels) {
        Some((palette, indices)) => encode_indexed(width, height, &palette, &indices),
        None => encode_rgba(pixels, width, height),
    }
}

/// Map pixels to a palette of at most 256 colors, or None if there are more.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 4]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let packed = u32::from_le_bytes([px[0], px[1], px[2], px[3]]);
        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push([px[0], px[1], px[2], px[3]]);
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);

    let mut hasher = Hasher::new();
    hasher.update(kind);
    hasher.update(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
}

fn ihdr(width: usize, height: usize, color_type: u8) -> [u8; 13] {
    let mut data = [0u8; 13];
    data[..4].copy_from_slice(&(width as u32).to_be_bytes());
    data[4..8].copy_from_slice(&(height as u32).to_be_bytes());
    data[8] = 8; // bit depth
    data[9] = color_type;
    // compression, filter, interlace all zero
    data
}

fn deflate_scanlines(rows: &[&[u8]]) -> RadarResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    for row in rows {
        // Filter type 0 (None) per scanline
        encoder
            .write_all(&[0])
            .and_then(|_| encoder.write_all(row))
            .map_err(|e| RadarError::Render(format!("deflate failed: {}", e)))?;
    }
    encoder
        .finish()
        .map_err(|e| RadarError::Render(format!("deflate failed: {}", e)))
}

/// Indexed PNG (color type 3) with a tRNS chunk for palette alpha.
fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[[u8; 4]],
    indices: &[u8],
) -> RadarResult<Vec<u8>> {
    let mut plte = Vec::with_capacity(palette.len() * 3);
    let mut trns = Vec::with_capacity(palette.len());
    for color in palette {
        plte.extend_from_slice(&color[..3]);
        trns.push(color[3]);
    }

    let rows: Vec<&[u8]> = indices.chunks_exact(width).collect();
    if rows.len() != height {
        return Err(RadarError::Render("index buffer shape mismatch".into()));
    }
    let idat = deflate_scanlines(&rows)?;

    let mut out = Vec::with_capacity(idat.len() + plte.len() + 128);
    out.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut out, b"IHDR", &ihdr(width, height, 3));
    write_chunk(&mut out, b"PLTE", &plte);
    if trns.iter().any(|&a| a != 255) {
        write_chunk(&mut out, b"tRNS", &trns);
    }
    write_chunk(&mut out, b"IDAT", &idat);
    write_chunk(&mut out, b"IEND", &[]);
    Ok(out)
}

/// Full-color RGBA PNG (color type 6).
fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> RadarResult<Vec<u8>> {
    let rows: Vec<&[u8]> = pixels.chunks_exact(width * 4).collect();
    let idat = deflate_scanlines(&rows)?;

    let mut out = Vec::with_capacity(idat.len() + 64);
    out.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut out, b"IHDR", &ihdr(width, height, 6));
    write_chunk(&mut out, b"IDAT", &idat);
    write_chunk(&mut out, b"IEND", &[]);
    Ok(out)
}
