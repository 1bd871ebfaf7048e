//! The transcoding loop and its output-buffer growth strategy.
//!
//! `run` drives a conversion context over the whole input, growing the
//! output buffer geometrically whenever the context reports it full and
//! flushing the target encoding's trailing shift sequence at the end. On
//! success the returned buffer is trimmed to exactly the bytes produced;
//! on any failure every intermediate allocation is dropped before the
//! error reaches the caller, so no partial output ever escapes.

use crate::Error;
use crate::codec::{Context, Status};

const GROW_MIN: usize = 16;

/// Owned growable output region. `data.len()` is the allocated length; the
/// write cursor `used` never exceeds it. Grown space past the cursor is
/// handed to the converter as free room.
struct OutputBuffer {
    data: Vec<u8>,
    used: usize,
}

impl OutputBuffer {
    fn new() -> Self {
        Self {
            data: Vec::new(),
            used: 0,
        }
    }

    /// Enlarge to `max(GROW_MIN, length * 2)`, keeping written bytes and the
    /// cursor in place. Doubling keeps the reallocation count logarithmic in
    /// the final output size; the transient overshoot is trimmed at the end.
    fn grow(&mut self) -> Result<(), Error> {
        let target = (self.data.len() * 2).max(GROW_MIN);
        self.data
            .try_reserve_exact(target - self.data.len())
            .map_err(|_| Error::OutOfMemory)?;
        self.data.resize(target, 0);
        Ok(())
    }

    fn free(&mut self) -> &mut [u8] {
        &mut self.data[self.used..]
    }

    fn commit(&mut self, written: usize) {
        debug_assert!(self.used + written <= self.data.len());
        self.used += written;
    }

    /// Trim to exactly the bytes written. The shrink half is best-effort by
    /// nature: `used` is already correct, so an allocator that keeps the
    /// larger block changes nothing for the caller.
    fn into_bytes(mut self) -> Vec<u8> {
        self.data.truncate(self.used);
        self.data.shrink_to_fit();
        self.data
    }
}

/// Convert all of `input` through `context`, returning an exactly-sized
/// buffer or the first classified failure.
pub fn run(context: &mut dyn Context, input: &[u8]) -> Result<Vec<u8>, Error> {
    // a context may be reused across independent conversions; start clean
    context.reset();

    let mut out = OutputBuffer::new();
    let mut read = 0;

    loop {
        out.grow()?;
        let step = context.convert(&input[read..], out.free());
        read += step.consumed;
        out.commit(step.written);
        match step.status {
            Status::Done => break,
            Status::OutputFull => continue,
            status => return Err(Error::from_status(status)),
        }
    }

    // flush the trailing shift sequence; one grow-and-retry is all a
    // sane backend can need for it
    let mut step = context.finish(out.free());
    out.commit(step.written);
    if step.status == Status::OutputFull {
        out.grow()?;
        step = context.finish(out.free());
        out.commit(step.written);
    }
    match step.status {
        Status::Done => Ok(out.into_bytes()),
        status => Err(Error::from_status(status)),
    }
}
