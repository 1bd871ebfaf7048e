//! # Recode - Stateful Character Encoding Conversion
//!
//! A character encoding conversion library built around a stateful,
//! shift-sequence-aware transcoding engine. A [`Converter`] is bound to one
//! (source, target) encoding pair for its lifetime and turns whole byte
//! buffers into whole byte buffers: output sizing, partial multi-byte
//! sequences, and trailing shift sequences are handled internally, and a
//! failed conversion never yields partial output.
//!
//! ## Features
//!
//! - **Exact-size output** — the engine grows its buffer geometrically and
//!   trims it to the bytes actually produced
//! - **Shift-state finalization** — stateful targets (such as UTF-7) get
//!   their trailing shift-out sequence flushed on every conversion
//! - **Classified failures** — incomplete input, illegal input, exhausted
//!   memory, and unsupported pairs are distinct [`Error`] variants
//! - **Name normalization** — common non-hyphenated Unicode format
//!   spellings ("UTF8", "utf16le") are repaired before lookup
//!
//! ## Quick Start
//!
//! ```rust
//! use recode::Converter;
//!
//! let mut converter = Converter::new("UTF-8", "UTF-16LE").unwrap();
//! let utf16 = converter.convert("hi").unwrap();
//! assert_eq!(utf16, [0x68, 0x00, 0x69, 0x00]);
//! ```
//!
//! A converter owns one conversion context, which is not reentrant:
//! conversion takes `&mut self`, so the borrow checker enforces the
//! one-caller-at-a-time contract. Converters are `Send` — use one per
//! thread for parallel throughput. The context is released when the
//! converter drops; a process that terminates abruptly skips destructors,
//! which the backend tolerates.

#![deny(missing_docs)]

use std::fmt;

use serde::Serialize;

mod codec;
mod engine;
mod multibyte;
pub mod names;
mod tables;

use codec::Status;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening a converter or converting data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Error {
    /// Input ends in the middle of a multi-byte sequence. The data is
    /// truncated, not wrong; supplying the rest of the sequence would fix it.
    IncompleteSequence,
    /// A byte sequence is not valid in the source encoding, or a decoded
    /// character has no representation in the target encoding.
    IllegalSequence,
    /// The allocator refused to grow the output buffer. Hosts that track
    /// memory pressure should treat this as a low-memory signal.
    OutOfMemory,
    /// No converter exists for the requested encoding pair.
    Unsupported {
        /// Source encoding name as given (after normalization).
        source: String,
        /// Target encoding name as given (after normalization).
        target: String,
        /// Backend diagnostic naming the side that failed to resolve.
        detail: String,
    },
    /// Any other backend-reported failure, with its raw code.
    Other(i32),
}

impl Error {
    pub(crate) fn unsupported(source: &str, target: &str, detail: String) -> Self {
        Error::Unsupported {
            source: source.to_string(),
            target: target.to_string(),
            detail,
        }
    }

    pub(crate) fn from_status(status: Status) -> Self {
        match status {
            Status::Incomplete => Error::IncompleteSequence,
            Status::Illegal => Error::IllegalSequence,
            Status::Other(code) => Error::Other(code),
            // a backend still reporting a full buffer after the engine grew
            // it is misbehaving; surface that as an opaque failure
            Status::OutputFull => Error::Other(-1),
            Status::Done => unreachable!("success is not an error"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IncompleteSequence => write!(f, "incomplete character sequence"),
            Error::IllegalSequence => write!(f, "illegal character sequence"),
            Error::OutOfMemory => write!(f, "out of memory while growing output buffer"),
            Error::Unsupported {
                source,
                target,
                detail,
            } => {
                write!(
                    f,
                    "conversion from {} to {} not supported: {}",
                    source, target, detail
                )
            }
            Error::Other(code) => write!(f, "conversion failed with backend code {}", code),
        }
    }
}

impl std::error::Error for Error {}

/// Input shapes accepted at the conversion boundary.
///
/// Text converts from its UTF-8 representation and byte buffers convert
/// as-is. The [`Input::Nothing`] shape — anything a caller passes that is
/// neither — deliberately produces an empty buffer instead of an error;
/// callers rely on that permissiveness.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    /// Text, converted from its UTF-8 bytes.
    Text(&'a str),
    /// A raw byte buffer, assumed to be in the source encoding.
    Bytes(&'a [u8]),
    /// An unsupported shape; converts to an empty buffer.
    Nothing,
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(text: &'a String) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Input::Bytes(bytes)
    }
}

impl From<()> for Input<'static> {
    fn from(_: ()) -> Self {
        Input::Nothing
    }
}

/// A converter bound to one (source, target) encoding pair.
///
/// Construction normalizes both names, then opens the conversion context
/// that [`convert`](Converter::convert) drives. The context is stateful and
/// owned exclusively by this value; it is reset at the start of every
/// conversion, so one converter can serve any number of independent calls,
/// and it is released exactly once when the converter drops.
pub struct Converter {
    context: Box<dyn codec::Context>,
    source: String,
    target: String,
}

impl Converter {
    /// Open a converter from `source` to `target`.
    ///
    /// Both names pass through [`names::normalize`] first. Fails with
    /// [`Error::Unsupported`] when no converter exists for the pair.
    ///
    /// ```rust
    /// use recode::Converter;
    ///
    /// // the non-hyphenated spellings work too
    /// let converter = Converter::new("utf8", "UTF16BE").unwrap();
    /// assert_eq!(converter.source_encoding(), "UTF-8");
    /// assert_eq!(converter.target_encoding(), "UTF-16BE");
    /// ```
    pub fn new(source: &str, target: &str) -> Result<Self> {
        let source = names::normalize(source).to_string();
        let target = names::normalize(target).to_string();
        // the backend expects (target, source), the reverse of our public
        // argument order
        let context = codec::open(&target, &source)?;
        Ok(Self {
            context,
            source,
            target,
        })
    }

    /// Normalized source encoding name.
    pub fn source_encoding(&self) -> &str {
        &self.source
    }

    /// Normalized target encoding name.
    pub fn target_encoding(&self) -> &str {
        &self.target
    }

    /// Convert `input` to the target encoding, returning a buffer sized to
    /// exactly the bytes produced.
    ///
    /// On failure no output is returned and every intermediate allocation
    /// has been released; the conversion either happens in full or not at
    /// all. See [`Error`] for the failure classification.
    ///
    /// ```rust
    /// use recode::{Converter, Error};
    ///
    /// let mut converter = Converter::new("UTF-8", "US-ASCII").unwrap();
    /// assert_eq!(converter.convert("plain").unwrap(), b"plain");
    /// assert_eq!(converter.convert("café").unwrap_err(), Error::IllegalSequence);
    /// ```
    pub fn convert<'a>(&mut self, input: impl Into<Input<'a>>) -> Result<Vec<u8>> {
        match input.into() {
            Input::Text(text) => engine::run(self.context.as_mut(), text.as_bytes()),
            Input::Bytes(bytes) => engine::run(self.context.as_mut(), bytes),
            Input::Nothing => Ok(Vec::new()),
        }
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_pair(source: &str, target: &str, input: &[u8]) -> Result<Vec<u8>> {
        Converter::new(source, target)?.convert(input)
    }

    #[test]
    fn test_ebcdic_to_utf8() {
        // "HELLO" in EBCDIC
        let input = &[0xC8, 0xC5, 0xD3, 0xD3, 0xD6];
        let output = convert_pair("IBM037", "UTF-8", input).unwrap();
        assert_eq!(std::str::from_utf8(&output).unwrap(), "HELLO");
    }

    #[test]
    fn test_utf8_to_utf16le_roundtrip() {
        let text = "Hello 🌍!";
        let mut to = Converter::new("UTF-8", "UTF-16LE").unwrap();
        let mut back = Converter::new("UTF-16LE", "UTF-8").unwrap();
        let utf16 = to.convert(text).unwrap();
        // 7 BMP chars at two bytes each plus one surrogate pair
        assert_eq!(utf16.len(), 18);
        let roundtrip = back.convert(&utf16).unwrap();
        assert_eq!(text.as_bytes(), &roundtrip[..]);
    }

    #[test]
    fn test_windows_1252_special_chars() {
        let mut converter = Converter::new("WINDOWS-1252", "UTF-8").unwrap();

        // Euro symbol (0x80 in Windows-1252)
        let output = converter.convert(&[0x80]).unwrap();
        assert_eq!(std::str::from_utf8(&output).unwrap(), "€");

        // trademark symbol (0x99 in Windows-1252)
        let output = converter.convert(&[0x99]).unwrap();
        assert_eq!(std::str::from_utf8(&output).unwrap(), "™");
    }

    #[test]
    fn test_utf7_shift_sequence_is_flushed() {
        let mut converter = Converter::new("UTF-8", "UTF-7").unwrap();
        assert_eq!(converter.convert("Hi ☺").unwrap(), b"Hi +Jjo-");

        let mut back = Converter::new("UTF-7", "UTF-8").unwrap();
        assert_eq!(back.convert(b"Hi +Jjo-").unwrap(), "Hi ☺".as_bytes());
    }

    #[test]
    fn test_same_encoding_pair_is_identity() {
        let bytes: Vec<u8> = (0..=255).collect();
        let output = convert_pair("ISO-8859-1", "ISO-8859-1", &bytes).unwrap();
        assert_eq!(output, bytes);

        let text = "Grüße 🌍";
        let output = convert_pair("UTF-8", "UTF-8", text.as_bytes()).unwrap();
        assert_eq!(output, text.as_bytes());
    }

    #[test]
    fn test_output_length_spans_growth_doublings() {
        let mut converter = Converter::new("UTF-8", "UTF-8").unwrap();
        for n in [1usize, 15, 16, 17, 10000] {
            let input = "a".repeat(n);
            let output = converter.convert(input.as_str()).unwrap();
            assert_eq!(output.len(), n);
            assert_eq!(output, input.as_bytes());
        }

        // doubling ratio: every ASCII byte becomes two UTF-16 bytes
        let mut widening = Converter::new("UTF-8", "UTF-16LE").unwrap();
        let input = "x".repeat(10000);
        let output = widening.convert(input.as_str()).unwrap();
        assert_eq!(output.len(), 20000);
    }

    #[test]
    fn test_names_are_normalized_at_creation() {
        let converter = Converter::new("utf8", "utf16le").unwrap();
        assert_eq!(converter.source_encoding(), "UTF-8");
        assert_eq!(converter.target_encoding(), "UTF-16LE");
    }

    #[test]
    fn test_incomplete_sequence() {
        // first byte only of the 3-byte € sequence
        let err = convert_pair("UTF-8", "UTF-16LE", &[0xE2]).unwrap_err();
        assert_eq!(err, Error::IncompleteSequence);

        let err = convert_pair("UTF-8", "UTF-16LE", &[0xE2, 0x82]).unwrap_err();
        assert_eq!(err, Error::IncompleteSequence);

        // odd trailing byte of a UTF-16 unit
        let err = convert_pair("UTF-16LE", "UTF-8", &[0x41, 0x00, 0x42]).unwrap_err();
        assert_eq!(err, Error::IncompleteSequence);
    }

    #[test]
    fn test_illegal_sequence() {
        // invalid in the source encoding
        let err = convert_pair("UTF-8", "UTF-16LE", &[0xFF, 0xFF]).unwrap_err();
        assert_eq!(err, Error::IllegalSequence);

        // valid source, unrepresentable in the target
        let err = convert_pair("UTF-8", "US-ASCII", "€".as_bytes()).unwrap_err();
        assert_eq!(err, Error::IllegalSequence);
    }

    #[test]
    fn test_unsupported_pair() {
        let err = Converter::new("EBCDIC-MARTIAN", "UTF-8").unwrap_err();
        match err {
            Error::Unsupported { source, target, .. } => {
                assert_eq!(source, "EBCDIC-MARTIAN");
                assert_eq!(target, "UTF-8");
            }
            other => panic!("expected Unsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_then_success_on_same_handle() {
        // a failed conversion must not poison the context for the next one
        let mut converter = Converter::new("UTF-8", "UTF-16LE").unwrap();
        assert!(converter.convert(&[0xE2]).is_err());
        let output = converter.convert("ok").unwrap();
        assert_eq!(output, [0x6F, 0x00, 0x6B, 0x00]);
    }

    #[test]
    fn test_input_shapes() {
        let mut converter = Converter::new("UTF-8", "UTF-8").unwrap();

        // text and bytes convert
        assert_eq!(converter.convert("abc").unwrap(), b"abc");
        assert_eq!(converter.convert(b"abc").unwrap(), b"abc");
        let owned = String::from("abc");
        assert_eq!(converter.convert(&owned).unwrap(), b"abc");
        let vec = vec![b'a', b'b', b'c'];
        assert_eq!(converter.convert(&vec).unwrap(), b"abc");

        // anything else converts to nothing, not an error
        assert_eq!(converter.convert(()).unwrap(), Vec::<u8>::new());
        assert_eq!(converter.convert(Input::Nothing).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_empty_input() {
        let mut converter = Converter::new("UTF-8", "UTF-16BE").unwrap();
        assert_eq!(converter.convert("").unwrap(), Vec::<u8>::new());
        assert_eq!(converter.convert(b"").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_converter_moves_across_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<Converter>();

        let mut converter = Converter::new("UTF-8", "IBM037").unwrap();
        let handle = std::thread::spawn(move || converter.convert("HELLO").unwrap());
        let output = handle.join().unwrap();
        assert_eq!(output, [0xC8, 0xC5, 0xD3, 0xD3, 0xD6]);
    }

    #[test]
    fn test_error_display() {
        let err = convert_pair("UTF-8", "US-ASCII", "€".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "illegal character sequence");

        let err = Converter::new("UTF-8", "KLINGON").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("not supported"));
        assert!(message.contains("KLINGON"));
    }
}
