//! The converter-primitive boundary.
//!
//! The transcode engine drives a [`Context`]: an opaque, stateful
//! conversion handle bound to one (source, target) pair. Status is threaded
//! explicitly through every call, so classification happens at the point of
//! detection rather than via shared error state.
//!
//! The built-in backend implements a context as a decoder → scalar →
//! encoder pipeline over the coders in `multibyte` and `tables`.

use crate::{Error, multibyte, tables};

/// Outcome of a single converter-primitive call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// All supplied input was consumed and encoded.
    Done,
    /// The output buffer has no room for the next character; grow and retry.
    OutputFull,
    /// Input ends in the middle of a multi-byte sequence.
    Incomplete,
    /// Input is invalid in the source encoding, or has no representation in
    /// the target encoding.
    Illegal,
    /// Backend-specific failure code outside the classified set.
    Other(i32),
}

/// Progress report from one converter-primitive call.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    /// Input bytes consumed by this call.
    pub consumed: usize,
    /// Output bytes written by this call.
    pub written: usize,
    pub status: Status,
}

impl Step {
    fn new(consumed: usize, written: usize, status: Status) -> Self {
        Self {
            consumed,
            written,
            status,
        }
    }
}

/// A stateful conversion context. Not reentrant: exactly one caller may
/// drive it at a time, which the engine guarantees by holding it behind an
/// exclusive borrow.
pub trait Context: Send + std::fmt::Debug {
    /// Return the internal shift state to its initial value so the context
    /// can be reused for an independent conversion.
    fn reset(&mut self);

    /// Convert as much of `input` as fits into `output`.
    fn convert(&mut self, input: &[u8], output: &mut [u8]) -> Step;

    /// Flush any trailing shift/reset sequence the target encoding requires.
    fn finish(&mut self, output: &mut [u8]) -> Step;
}

/// One step of decoding: a scalar plus the bytes it occupied, bytes
/// absorbed into coder state without producing a scalar yet, or a
/// classified failure. `decode` is never called with empty input.
#[derive(Debug)]
pub enum Decoded {
    Scalar(char, usize),
    Consumed(usize),
    Incomplete,
    Illegal,
}

pub trait Decoder: Send {
    fn decode(&mut self, input: &[u8]) -> Decoded;

    /// True when the coder holds material that cannot form a complete
    /// character without further input (used at end of input).
    fn pending(&self) -> bool {
        false
    }

    fn reset(&mut self) {}
}

/// One step of encoding a scalar into the output buffer.
#[derive(Debug)]
pub enum Encoded {
    Wrote(usize),
    Full,
    Unmappable,
}

pub trait Encoder: Send {
    fn encode(&mut self, ch: char, output: &mut [u8]) -> Encoded;

    /// Emit whatever the encoding requires to return to its neutral state.
    fn flush(&mut self, output: &mut [u8]) -> Encoded {
        let _ = output;
        Encoded::Wrote(0)
    }

    fn reset(&mut self) {}
}

/// Built-in context: routes every conversion through Unicode scalars.
///
/// A scalar whose encoded form does not fit the remaining output space is
/// parked in `pending` — its input bytes count as consumed because the
/// context state carries them — and drained first on the next call.
struct Pipeline {
    decoder: Box<dyn Decoder>,
    encoder: Box<dyn Encoder>,
    pending: Option<char>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl Context for Pipeline {
    fn reset(&mut self) {
        self.decoder.reset();
        self.encoder.reset();
        self.pending = None;
    }

    fn convert(&mut self, input: &[u8], output: &mut [u8]) -> Step {
        let mut read = 0;
        let mut wrote = 0;

        if let Some(ch) = self.pending {
            match self.encoder.encode(ch, output) {
                Encoded::Wrote(n) => {
                    wrote += n;
                    self.pending = None;
                }
                Encoded::Full => return Step::new(0, 0, Status::OutputFull),
                Encoded::Unmappable => return Step::new(0, 0, Status::Illegal),
            }
        }

        while read < input.len() {
            match self.decoder.decode(&input[read..]) {
                Decoded::Scalar(ch, len) => match self.encoder.encode(ch, &mut output[wrote..]) {
                    Encoded::Wrote(n) => {
                        read += len;
                        wrote += n;
                    }
                    Encoded::Full => {
                        self.pending = Some(ch);
                        read += len;
                        return Step::new(read, wrote, Status::OutputFull);
                    }
                    Encoded::Unmappable => return Step::new(read, wrote, Status::Illegal),
                },
                Decoded::Consumed(len) => read += len,
                Decoded::Incomplete => return Step::new(read, wrote, Status::Incomplete),
                Decoded::Illegal => return Step::new(read, wrote, Status::Illegal),
            }
        }

        if self.decoder.pending() {
            return Step::new(read, wrote, Status::Incomplete);
        }
        Step::new(read, wrote, Status::Done)
    }

    fn finish(&mut self, output: &mut [u8]) -> Step {
        match self.encoder.flush(output) {
            Encoded::Wrote(n) => Step::new(0, n, Status::Done),
            Encoded::Full => Step::new(0, 0, Status::OutputFull),
            Encoded::Unmappable => Step::new(0, 0, Status::Illegal),
        }
    }
}

fn decoder_for(name: &str) -> Option<Box<dyn Decoder>> {
    let upper = name.to_ascii_uppercase();
    match upper.as_str() {
        "UTF-8" => Some(Box::new(multibyte::Utf8Decoder)),
        "UTF-16" | "UTF-16BE" => Some(Box::new(multibyte::Utf16Decoder { big: true })),
        "UTF-16LE" => Some(Box::new(multibyte::Utf16Decoder { big: false })),
        "UTF-32" | "UTF-32BE" => Some(Box::new(multibyte::Utf32Decoder { big: true })),
        "UTF-32LE" => Some(Box::new(multibyte::Utf32Decoder { big: false })),
        "UTF-7" => Some(Box::new(multibyte::Utf7Decoder::new())),
        _ => tables::charmap(&upper).map(|map| Box::new(tables::TableDecoder::new(map)) as _),
    }
}

fn encoder_for(name: &str) -> Option<Box<dyn Encoder>> {
    let upper = name.to_ascii_uppercase();
    match upper.as_str() {
        "UTF-8" => Some(Box::new(multibyte::Utf8Encoder)),
        "UTF-16" | "UTF-16BE" => Some(Box::new(multibyte::Utf16Encoder { big: true })),
        "UTF-16LE" => Some(Box::new(multibyte::Utf16Encoder { big: false })),
        "UTF-32" | "UTF-32BE" => Some(Box::new(multibyte::Utf32Encoder { big: true })),
        "UTF-32LE" => Some(Box::new(multibyte::Utf32Encoder { big: false })),
        "UTF-7" => Some(Box::new(multibyte::Utf7Encoder::new())),
        _ => tables::charmap(&upper).map(|map| Box::new(tables::TableEncoder::new(map)) as _),
    }
}

/// Open a conversion context. The argument order is (target, source) — the
/// converter-primitive convention, reversed from the public API's
/// (source, target).
pub fn open(target: &str, source: &str) -> Result<Box<dyn Context>, Error> {
    let decoder = decoder_for(source).ok_or_else(|| {
        Error::unsupported(
            source,
            target,
            format!("no converter reads \"{}\"", source),
        )
    })?;
    let encoder = encoder_for(target).ok_or_else(|| {
        Error::unsupported(
            source,
            target,
            format!("no converter writes \"{}\"", target),
        )
    })?;
    Ok(Box::new(Pipeline {
        decoder,
        encoder,
        pending: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_known_pairs() {
        assert!(open("UTF-16LE", "UTF-8").is_ok());
        assert!(open("IBM037", "WINDOWS-1252").is_ok());
        assert!(open("utf-8", "latin1").is_ok());
    }

    #[test]
    fn test_open_unknown_pair_is_unsupported() {
        let err = open("UTF-8", "KLINGON").unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
        let err = open("KLINGON", "UTF-8").unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
    }

    #[test]
    fn test_pipeline_reports_progress() {
        let mut ctx = open("UTF-16LE", "UTF-8").unwrap();
        let mut out = [0u8; 64];
        let step = ctx.convert(b"hi", &mut out);
        assert_eq!(step.consumed, 2);
        assert_eq!(step.written, 4);
        assert_eq!(step.status, Status::Done);
        assert_eq!(&out[..4], &[0x68, 0x00, 0x69, 0x00]);
    }

    #[test]
    fn test_pipeline_parks_scalar_when_output_fills() {
        let mut ctx = open("UTF-16LE", "UTF-8").unwrap();
        let mut tiny = [0u8; 3];
        let step = ctx.convert(b"hi", &mut tiny);
        assert_eq!(step.status, Status::OutputFull);
        assert_eq!(step.consumed, 2);
        assert_eq!(step.written, 2);
        // the parked scalar drains into the next buffer
        let mut rest = [0u8; 4];
        let step = ctx.convert(b"", &mut rest);
        assert_eq!(step.status, Status::Done);
        assert_eq!(step.written, 2);
        assert_eq!(&rest[..2], &[0x69, 0x00]);
    }

    #[test]
    fn test_pipeline_finish_flushes_shift_state() {
        let mut ctx = open("UTF-7", "UTF-8").unwrap();
        let mut out = [0u8; 64];
        let step = ctx.convert("\u{263A}".as_bytes(), &mut out);
        assert_eq!(step.status, Status::Done);
        let flushed = ctx.finish(&mut out[step.written..]);
        assert_eq!(flushed.status, Status::Done);
        assert_eq!(&out[..step.written + flushed.written], b"+Jjo-");
    }

    #[test]
    fn test_pipeline_classifies_decoder_errors() {
        let mut ctx = open("UTF-8", "UTF-8").unwrap();
        let mut out = [0u8; 16];
        assert_eq!(ctx.convert(&[0xE2], &mut out).status, Status::Incomplete);
        ctx.reset();
        assert_eq!(ctx.convert(&[0xFF], &mut out).status, Status::Illegal);
    }

    #[test]
    fn test_reset_clears_carried_state() {
        let mut ctx = open("UTF-8", "UTF-7").unwrap();
        let mut out = [0u8; 16];
        // leave the decoder mid-run with unconsumed bits
        assert_eq!(ctx.convert(b"+J", &mut out).status, Status::Incomplete);
        ctx.reset();
        // after a reset the same context decodes cleanly from direct mode
        let step = ctx.convert(b"ok", &mut out);
        assert_eq!(step.status, Status::Done);
        assert_eq!(&out[..2], b"ok");
    }
}
