//! `Content-Length` message framing.
//!
//! The transport is the base-protocol framing used by language servers:
//! `Header: value` lines terminated by an empty line, then exactly
//! `Content-Length` payload bytes. Header names are case-insensitive
//! and a trailing `\r` on header lines is tolerated.

use crate::error::{LspError, LspResult};
use std::io::{BufRead, Read, Write};

/// Reads framed messages from a buffered stream.
#[derive(Debug, Default)]
pub struct MessageReader;

impl MessageReader {
    pub fn new() -> Self {
        Self
    }

    /// Reads the next message payload.
    ///
    /// Returns `Ok(None)` at a clean end of stream. A stream that ends
    /// mid-payload is an error, not an EOF.
    pub fn read_message(&mut self, input: &mut impl BufRead) -> LspResult<Option<String>> {
        let mut content_length: Option<usize> = None;
        let mut saw_any_header = false;

        loop {
            let mut line = String::new();
            let bytes = input.read_line(&mut line)?;
            if bytes == 0 {
                if saw_any_header {
                    return Err(LspError::MissingContentLength);
                }
                return Ok(None);
            }

            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                break;
            }
            saw_any_header = true;

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            if key.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse::<usize>().ok();
            }
        }

        let length = match content_length {
            Some(length) if length > 0 => length,
            _ => return Err(LspError::MissingContentLength),
        };

        let mut payload = vec![0u8; length];
        let mut filled = 0;
        while filled < length {
            let read = input.read(&mut payload[filled..])?;
            if read == 0 {
                return Err(LspError::TruncatedPayload {
                    expected: length,
                    actual: filled,
                });
            }
            filled += read;
        }

        // Some peers terminate the payload with an extra CRLF.
        consume_optional_crlf(input)?;

        Ok(Some(String::from_utf8_lossy(&payload).into_owned()))
    }
}

fn consume_optional_crlf(input: &mut impl BufRead) -> LspResult<()> {
    for expected in [b'\r', b'\n'] {
        let buffered = input.fill_buf()?;
        if buffered.first() == Some(&expected) {
            input.consume(1);
        } else {
            break;
        }
    }
    Ok(())
}

/// Writes framed messages.
#[derive(Debug, Default)]
pub struct MessageWriter;

impl MessageWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_message(&mut self, output: &mut impl Write, payload: &str) -> LspResult<()> {
        write!(output, "Content-Length: {}\r\n\r\n{payload}", payload.len())?;
        output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frame(body: &str) -> String {
        format!("Content-Length: {}\r\n\r\n{body}", body.len())
    }

    #[test]
    fn reader_extracts_the_payload() {
        let body = r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#;
        let mut input = Cursor::new(frame(body));
        let mut reader = MessageReader::new();
        assert_eq!(reader.read_message(&mut input).unwrap().as_deref(), Some(body));
        assert!(reader.read_message(&mut input).unwrap().is_none());
    }

    #[test]
    fn header_name_is_case_insensitive() {
        let mut input = Cursor::new("content-LENGTH: 2\r\n\r\nhi");
        let mut reader = MessageReader::new();
        assert_eq!(reader.read_message(&mut input).unwrap().as_deref(), Some("hi"));
    }

    #[test]
    fn unknown_headers_are_skipped() {
        let mut input = Cursor::new(
            "Content-Type: application/vscode-jsonrpc\r\nContent-Length: 4\r\n\r\nbody",
        );
        let mut reader = MessageReader::new();
        assert_eq!(
            reader.read_message(&mut input).unwrap().as_deref(),
            Some("body")
        );
    }

    #[test]
    fn trailing_crlf_between_messages_is_tolerated() {
        let mut input = Cursor::new(format!("{}\r\n{}", frame("one"), frame("two")));
        let mut reader = MessageReader::new();
        assert_eq!(reader.read_message(&mut input).unwrap().as_deref(), Some("one"));
        assert_eq!(reader.read_message(&mut input).unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn missing_content_length_is_an_error() {
        let mut input = Cursor::new("Content-Type: text/plain\r\n\r\nbody");
        let mut reader = MessageReader::new();
        assert!(matches!(
            reader.read_message(&mut input),
            Err(LspError::MissingContentLength)
        ));
    }

    #[test]
    fn zero_length_is_rejected() {
        let mut input = Cursor::new("Content-Length: 0\r\n\r\n");
        let mut reader = MessageReader::new();
        assert!(matches!(
            reader.read_message(&mut input),
            Err(LspError::MissingContentLength)
        ));
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let mut input = Cursor::new("Content-Length: 10\r\n\r\nshort");
        let mut reader = MessageReader::new();
        assert!(matches!(
            reader.read_message(&mut input),
            Err(LspError::TruncatedPayload {
                expected: 10,
                actual: 5
            })
        ));
    }

    #[test]
    fn clean_eof_returns_none() {
        let mut input = Cursor::new("");
        let mut reader = MessageReader::new();
        assert!(reader.read_message(&mut input).unwrap().is_none());
    }

    #[test]
    fn writer_frames_and_flushes() {
        let mut output = Vec::new();
        let mut writer = MessageWriter::new();
        writer.write_message(&mut output, "hello").unwrap();
        assert_eq!(output, b"Content-Length: 5\r\n\r\nhello");
    }

    #[test]
    fn writer_output_round_trips_through_the_reader() {
        let mut buffer = Vec::new();
        let mut writer = MessageWriter::new();
        writer.write_message(&mut buffer, r#"{"jsonrpc":"2.0"}"#).unwrap();

        let mut input = Cursor::new(buffer);
        let mut reader = MessageReader::new();
        assert_eq!(
            reader.read_message(&mut input).unwrap().as_deref(),
            Some(r#"{"jsonrpc":"2.0"}"#)
        );
    }
}
