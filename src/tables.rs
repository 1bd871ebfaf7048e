//! Single-byte encoding tables.
//!
//! Each supported single-byte encoding is a 256-entry map from byte value
//! to Unicode scalar (`None` marks holes in the code page). Decoding is a
//! direct lookup; encoding goes through a reverse map built once when a
//! conversion context is opened.

use std::collections::HashMap;

use crate::codec::{Decoded, Decoder, Encoded, Encoder};

/// IBM EBCDIC code page 037 (US/Canada), expressed as a permutation of the
/// Latin-1 repertoire: entry `i` is the ISO-8859-1 byte for EBCDIC byte `i`.
#[rustfmt::skip]
const IBM037_TO_LATIN1: [u8; 256] = [
    0x00, 0x01, 0x02, 0x03, 0x9C, 0x09, 0x86, 0x7F, 0x97, 0x8D, 0x8E, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
    0x10, 0x11, 0x12, 0x13, 0x9D, 0x85, 0x08, 0x87, 0x18, 0x19, 0x92, 0x8F, 0x1C, 0x1D, 0x1E, 0x1F,
    0x80, 0x81, 0x82, 0x83, 0x84, 0x0A, 0x17, 0x1B, 0x88, 0x89, 0x8A, 0x8B, 0x8C, 0x05, 0x06, 0x07,
    0x90, 0x91, 0x16, 0x93, 0x94, 0x95, 0x96, 0x04, 0x98, 0x99, 0x9A, 0x9B, 0x14, 0x15, 0x9E, 0x1A,
    0x20, 0xA0, 0xE2, 0xE4, 0xE0, 0xE1, 0xE3, 0xE5, 0xE7, 0xF1, 0xA2, 0x2E, 0x3C, 0x28, 0x2B, 0x7C,
    0x26, 0xE9, 0xEA, 0xEB, 0xE8, 0xED, 0xEE, 0xEF, 0xEC, 0xDF, 0x21, 0x24, 0x2A, 0x29, 0x3B, 0xAC,
    0x2D, 0x2F, 0xC2, 0xC4, 0xC0, 0xC1, 0xC3, 0xC5, 0xC7, 0xD1, 0xA6, 0x2C, 0x25, 0x5F, 0x3E, 0x3F,
    0xF8, 0xC9, 0xCA, 0xCB, 0xC8, 0xCD, 0xCE, 0xCF, 0xCC, 0x60, 0x3A, 0x23, 0x40, 0x27, 0x3D, 0x22,
    0xD8, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0xAB, 0xBB, 0xF0, 0xFD, 0xFE, 0xB1,
    0xB0, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, 0x70, 0x71, 0x72, 0xAA, 0xBA, 0xE6, 0xB8, 0xC6, 0xA4,
    0xB5, 0x7E, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0xA1, 0xBF, 0xD0, 0xDD, 0xDE, 0xAE,
    0x5E, 0xA3, 0xA5, 0xB7, 0xA9, 0xA7, 0xB6, 0xBC, 0xBD, 0xBE, 0x5B, 0x5D, 0xAF, 0xA8, 0xB4, 0xD7,
    0x7B, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0xAD, 0xF4, 0xF6, 0xF2, 0xF3, 0xF5,
    0x7D, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0xB9, 0xFB, 0xFC, 0xF9, 0xFA, 0xFF,
    0x5C, 0xF7, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0xB2, 0xD4, 0xD6, 0xD2, 0xD3, 0xD5,
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0xB3, 0xDB, 0xDC, 0xD9, 0xDA, 0x9F,
];

/// Windows-1252 differs from Latin-1 only in 0x80..=0x9F; five positions
/// are unassigned.
#[rustfmt::skip]
const WINDOWS_1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None,             Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None,             Some('\u{017D}'), None,
    None,             Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None,             Some('\u{017E}'), Some('\u{0178}'),
];

const fn ascii_map() -> [Option<char>; 256] {
    let mut map = [None; 256];
    let mut i = 0;
    while i < 128 {
        map[i] = char::from_u32(i as u32);
        i += 1;
    }
    map
}

const fn latin1_map() -> [Option<char>; 256] {
    let mut map = [None; 256];
    let mut i = 0;
    while i < 256 {
        map[i] = char::from_u32(i as u32);
        i += 1;
    }
    map
}

const fn windows1252_map() -> [Option<char>; 256] {
    let mut map = latin1_map();
    let mut i = 0;
    while i < 32 {
        map[0x80 + i] = WINDOWS_1252_HIGH[i];
        i += 1;
    }
    map
}

const fn from_latin1_bytes(bytes: &[u8; 256]) -> [Option<char>; 256] {
    let mut map = [None; 256];
    let mut i = 0;
    while i < 256 {
        map[i] = char::from_u32(bytes[i] as u32);
        i += 1;
    }
    map
}

static US_ASCII: [Option<char>; 256] = ascii_map();
static ISO_8859_1: [Option<char>; 256] = latin1_map();
static WINDOWS_1252: [Option<char>; 256] = windows1252_map();
static IBM037: [Option<char>; 256] = from_latin1_bytes(&IBM037_TO_LATIN1);

/// Look up the charmap for a single-byte encoding. `name` must already be
/// uppercased; common aliases are accepted alongside the canonical name.
pub fn charmap(name: &str) -> Option<&'static [Option<char>; 256]> {
    match name {
        "US-ASCII" | "ASCII" | "ANSI_X3.4-1968" | "ISO646-US" => Some(&US_ASCII),
        "ISO-8859-1" | "ISO8859-1" | "LATIN1" | "L1" | "CP819" | "IBM819" => Some(&ISO_8859_1),
        "WINDOWS-1252" | "CP1252" | "MS-ANSI" => Some(&WINDOWS_1252),
        "IBM037" | "IBM-037" | "CP037" | "EBCDIC-CP-US" | "EBCDIC-CP-CA" => Some(&IBM037),
        _ => None,
    }
}

/// Decoder for any table-backed single-byte encoding.
pub struct TableDecoder {
    map: &'static [Option<char>; 256],
}

impl TableDecoder {
    pub fn new(map: &'static [Option<char>; 256]) -> Self {
        Self { map }
    }
}

impl Decoder for TableDecoder {
    fn decode(&mut self, input: &[u8]) -> Decoded {
        match self.map[input[0] as usize] {
            Some(ch) => Decoded::Scalar(ch, 1),
            None => Decoded::Illegal,
        }
    }
}

/// Encoder for any table-backed single-byte encoding. The reverse map is
/// built once per open context.
pub struct TableEncoder {
    reverse: HashMap<char, u8>,
}

impl TableEncoder {
    pub fn new(map: &'static [Option<char>; 256]) -> Self {
        let mut reverse = HashMap::with_capacity(256);
        for (byte, &ch) in map.iter().enumerate() {
            if let Some(ch) = ch {
                reverse.insert(ch, byte as u8);
            }
        }
        Self { reverse }
    }
}

impl Encoder for TableEncoder {
    fn encode(&mut self, ch: char, output: &mut [u8]) -> Encoded {
        match self.reverse.get(&ch) {
            Some(&byte) => {
                if output.is_empty() {
                    return Encoded::Full;
                }
                output[0] = byte;
                Encoded::Wrote(1)
            }
            None => Encoded::Unmappable,
        }
    }
}
