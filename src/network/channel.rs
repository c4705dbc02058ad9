//! Line Channel
//!
//! Line-oriented reads and writes over a control stream, plus the two reply
//! framing rules.

use std::io::{BufRead, BufReader, Write};

use crate::error::{ControlError, Result};
use crate::protocol::HEADER_VERSION;
use super::ControlStream;

/// A handshaken control connection
///
/// Not synchronized: one command and its reply must be fully processed
/// before the next command is written.
pub struct LineChannel<S: ControlStream> {
    /// Stream, buffered for line reads (writes go to the inner stream)
    stream: BufReader<S>,
}

impl<S: ControlStream> LineChannel<S> {
    /// Take ownership of an open stream and send the version handshake
    ///
    /// The server does not acknowledge the handshake.
    pub fn open(mut stream: S) -> Result<Self> {
        stream.write_all(HEADER_VERSION.as_bytes())?;
        stream.flush()?;
        tracing::debug!("Sent control protocol handshake {:?}", HEADER_VERSION);

        Ok(Self {
            stream: BufReader::new(stream),
        })
    }

    /// Write one line, appending `\n`
    ///
    /// Line and terminator go out in a single write.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        let stream = self.stream.get_mut();
        stream.write_all(&buf)?;
        stream.flush()?;
        Ok(())
    }

    /// Read the next raw line, or `None` at end of stream
    ///
    /// The `\n` (and a `\r` before it) is not part of the returned bytes. A
    /// final line without terminator is still returned.
    fn next_raw_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        if self.stream.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }

    /// Read the next line, or `None` at end of stream
    ///
    /// A line that is not UTF-8 is consumed and reported as
    /// [`ControlError::MalformedLine`] carrying a lossy copy of its bytes.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        match self.next_raw_line()? {
            Some(bytes) => decode_line(bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Read the next line; end of stream is an error
    pub fn read_line(&mut self) -> Result<String> {
        self.next_line()?
            .ok_or(ControlError::ConnectionClosed { received: Vec::new() })
    }

    /// Read lines up to the terminating blank line
    ///
    /// The blank line is consumed but not returned. End of stream before it
    /// fails with [`ControlError::ConnectionClosed`]. A line that is not
    /// UTF-8 fails the reply only once the whole reply has been read.
    pub fn read_framed_reply(&mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        let mut malformed = None;
        loop {
            match self.next_raw_line()? {
                Some(bytes) if bytes.is_empty() => break,
                Some(bytes) => match decode_line(bytes) {
                    Ok(line) => lines.push(line),
                    Err(e) => {
                        malformed.get_or_insert(e);
                    }
                },
                None => {
                    tracing::warn!(
                        "Connection closed inside a reply after {} line(s)",
                        lines.len()
                    );
                    return Err(ControlError::ConnectionClosed { received: lines });
                }
            }
        }

        match malformed {
            Some(e) => Err(e),
            None => Ok(lines),
        }
    }

    /// Read lines up to a blank line or end of stream
    ///
    /// Used for replies the server never terminates; running out of input
    /// is the normal way for these to end.
    pub fn read_until_blank_or_close(&mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        let mut malformed = None;
        while let Some(bytes) = self.next_raw_line()? {
            if bytes.is_empty() {
                break;
            }
            match decode_line(bytes) {
                Ok(line) => lines.push(line),
                Err(e) => {
                    malformed.get_or_insert(e);
                }
            }
        }

        match malformed {
            Some(e) => Err(e),
            None => Ok(lines),
        }
    }

    /// Access the underlying stream
    pub fn get_ref(&self) -> &S {
        self.stream.get_ref()
    }

    /// Close the underlying stream
    ///
    /// Any unread buffered input is discarded.
    pub fn close(self) -> Result<()> {
        let mut stream = self.stream.into_inner();
        stream.close()?;
        Ok(())
    }
}

/// Convert a raw reply line to text
fn decode_line(bytes: Vec<u8>) -> Result<String> {
    match String::from_utf8(bytes) {
        Ok(line) => {
            tracing::trace!("Read reply line {:?}", line);
            Ok(line)
        }
        Err(e) => {
            let line = String::from_utf8_lossy(e.as_bytes()).into_owned();
            tracing::warn!("Reply line is not UTF-8: {:?}", line);
            Err(ControlError::MalformedLine(line))
        }
    }
}
