//! Decoded-character sources.
//!
//! Samplers never see bytes. They pull `char`s from a [`CharSource`], which
//! signals end of stream with `Ok(0)` and surfaces read failures unchanged.
//!
//! [`Utf8Chars`] adapts any `Read`/`BufRead` into a source. Both sampling
//! algorithms go through it, so decoding never depends on the platform.

use std::io::{self, BufRead, BufReader, Read};

/// Characters handed to a sampler per read.
pub const DEFAULT_CHUNK_CHARS: usize = 1000;

/// A pull-based stream of decoded characters.
pub trait CharSource {
    /// Read up to `buf.len()` characters into `buf`.
    ///
    /// Returns the number written. `Ok(0)` for a non-empty `buf` means the
    /// stream is exhausted.
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize>;

    /// Pull a single character, `None` once the stream is exhausted.
    fn next_char(&mut self) -> io::Result<Option<char>> {
        let mut one = ['\0'];
        Ok(match self.read_chars(&mut one)? {
            0 => None,
            _ => Some(one[0]),
        })
    }
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        (**self).read_chars(buf)
    }
}

impl CharSource for std::str::Chars<'_> {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        Ok(fill_from_iter(self, buf))
    }
}

/// Infallible source over any character iterator.
#[derive(Debug, Clone)]
pub struct CharIter<I> {
    iter: I,
}

impl<I: Iterator<Item = char>> CharIter<I> {
    /// Wrap anything that yields characters.
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            iter: iter.into_iter(),
        }
    }
}

impl<I: Iterator<Item = char>> CharSource for CharIter<I> {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        Ok(fill_from_iter(&mut self.iter, buf))
    }
}

fn fill_from_iter(iter: &mut impl Iterator<Item = char>, buf: &mut [char]) -> usize {
    let mut n = 0;
    for (slot, ch) in buf.iter_mut().zip(iter) {
        *slot = ch;
        n += 1;
    }
    n
}

/// UTF-8 decoding adapter over a byte reader.
///
/// Sequences split across underlying reads are reassembled. Malformed or
/// truncated sequences decode to U+FFFD rather than failing the run.
#[derive(Debug)]
pub struct Utf8Chars<R> {
    inner: R,
}

impl<R: Read> Utf8Chars<BufReader<R>> {
    /// Wrap an unbuffered reader.
    pub fn new(reader: R) -> Self {
        Self::from_buf_read(BufReader::new(reader))
    }
}

impl<R: BufRead> Utf8Chars<R> {
    /// Wrap an already buffered reader as is.
    pub fn from_buf_read(inner: R) -> Self {
        Self { inner }
    }

    /// Give back the reader, with any undecoded bytes still buffered.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Ensure bytes are buffered, retrying interrupted reads. `false` once exhausted.
    fn fill(&mut self) -> io::Result<bool> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(!buf.is_empty()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        if !self.fill()? {
            return Ok(None);
        }
        Ok(self.inner.fill_buf()?.first().copied())
    }

    /// Decode whatever complete, valid characters sit at the front of the
    /// buffered bytes, up to `buf.len()`.
    fn decode_buffered(&mut self, buf: &mut [char]) -> io::Result<(usize, bool)> {
        if !self.fill()? {
            return Ok((0, true));
        }
        let available = self.inner.fill_buf()?;
        // A char is at most four bytes; don't validate more than can be used.
        let window = &available[..available.len().min(buf.len().saturating_mul(4))];
        let valid = match std::str::from_utf8(window) {
            Ok(s) => s,
            Err(e) => std::str::from_utf8(&window[..e.valid_up_to()]).unwrap_or_default(),
        };

        let mut n = 0;
        let mut used = 0;
        for (slot, ch) in buf.iter_mut().zip(valid.chars()) {
            *slot = ch;
            n += 1;
            used += ch.len_utf8();
        }
        self.inner.consume(used);
        Ok((n, false))
    }

    /// Byte-at-a-time decode of one character: a sequence straddling the
    /// buffer boundary, or a malformed one.
    ///
    /// Each maximal invalid subpart becomes one U+FFFD, the same split
    /// `String::from_utf8_lossy` makes.
    fn decode_one(&mut self) -> io::Result<Option<char>> {
        let Some(lead) = self.peek_byte()? else {
            return Ok(None);
        };
        self.inner.consume(1);

        // Width, and the range the second byte must fall in. The narrowed
        // ranges exclude overlong forms, surrogates and code points past U+10FFFF.
        let (width, second) = match lead {
            0x00..=0x7F => return Ok(Some(lead as char)),
            0xC2..=0xDF => (2, 0x80..=0xBF),
            0xE0 => (3, 0xA0..=0xBF),
            0xE1..=0xEC | 0xEE..=0xEF => (3, 0x80..=0xBF),
            0xED => (3, 0x80..=0x9F),
            0xF0 => (4, 0x90..=0xBF),
            0xF1..=0xF3 => (4, 0x80..=0xBF),
            0xF4 => (4, 0x80..=0x8F),
            _ => return Ok(Some(char::REPLACEMENT_CHARACTER)),
        };

        let mut seq = [lead, 0, 0, 0];
        for i in 1..width {
            let accepted = match self.peek_byte()? {
                Some(b) if i == 1 && second.contains(&b) => Some(b),
                Some(b @ 0x80..=0xBF) if i > 1 => Some(b),
                _ => None,
            };
            let Some(b) = accepted else {
                // Leave the offending byte for the next character.
                return Ok(Some(char::REPLACEMENT_CHARACTER));
            };
            seq[i] = b;
            self.inner.consume(1);
        }

        Ok(Some(
            std::str::from_utf8(&seq[..width])
                .ok()
                .and_then(|s| s.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER),
        ))
    }
}

impl<R: BufRead> CharSource for Utf8Chars<R> {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            let (decoded, eof) = self.decode_buffered(&mut buf[n..])?;
            if eof {
                break;
            }
            if decoded > 0 {
                n += decoded;
                continue;
            }
            match self.decode_one()? {
                Some(ch) => {
                    buf[n] = ch;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}
