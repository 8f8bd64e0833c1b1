//! RESP (Redis Serialization Protocol) encoder and decoder
//!
//! Commands are always sent as arrays of bulk strings; replies are decoded
//! one value at a time from a buffered stream.

use std::io::{self, BufRead};

/// Largest bulk string a server may send (`proto-max-bulk-len` default)
pub const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Upper bound on array slots reserved before any element is read
const MAX_ARRAY_PREALLOC: i64 = 1024;

/// RESP value types
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// Simple string (+OK\r\n)
    SimpleString(String),
    /// Error (-ERR message\r\n)
    Error(String),
    /// Integer (:1000\r\n)
    Integer(i64),
    /// Bulk string ($6\r\nfoobar\r\n)
    BulkString(Vec<u8>),
    /// Null bulk string or null array ($-1\r\n, *-1\r\n)
    Null,
    /// Array (*2\r\n...)
    Array(Vec<RespValue>),
}

/// RESP encoder with a reusable buffer
pub struct RespEncoder {
    buf: Vec<u8>,
}

impl RespEncoder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Encode a command as an array of bulk strings
    pub fn encode_command(&mut self, args: &[&[u8]]) {
        self.write_header(b'*', args.len());
        for arg in args {
            self.write_header(b'$', arg.len());
            self.buf.extend_from_slice(arg);
            self.buf.extend_from_slice(b"\r\n");
        }
    }

    /// Encode a command from string slices
    pub fn encode_command_str(&mut self, args: &[&str]) {
        let byte_args: Vec<&[u8]> = args.iter().map(|s| s.as_bytes()).collect();
        self.encode_command(&byte_args);
    }

    #[inline]
    fn write_header(&mut self, marker: u8, len: usize) {
        let mut buffer = itoa::Buffer::new();
        self.buf.push(marker);
        self.buf.extend_from_slice(buffer.format(len).as_bytes());
        self.buf.extend_from_slice(b"\r\n");
    }
}

fn invalid_data(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

/// RESP decoder for streaming reads
pub struct RespDecoder<R> {
    reader: R,
    line_buf: String,
}

impl<R: BufRead> RespDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buf: String::with_capacity(256),
        }
    }

    /// Read one header line, without the trailing CRLF
    fn read_header(&mut self) -> io::Result<(u8, String)> {
        self.line_buf.clear();
        if self.reader.read_line(&mut self.line_buf)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Connection closed",
            ));
        }

        let line = self.line_buf.trim_end_matches(['\r', '\n']);
        let (&type_byte, _) = line
            .as_bytes()
            .split_first()
            .ok_or_else(|| invalid_data("Empty RESP line"))?;
        if !type_byte.is_ascii() {
            return Err(invalid_data("Non-ASCII RESP type byte"));
        }
        Ok((type_byte, line[1..].to_string()))
    }

    /// Decode next RESP value from stream
    pub fn decode(&mut self) -> io::Result<RespValue> {
        let (type_byte, content) = self.read_header()?;

        match type_byte {
            b'+' => Ok(RespValue::SimpleString(content)),
            b'-' => Ok(RespValue::Error(content)),
            b':' => content
                .parse()
                .map(RespValue::Integer)
                .map_err(|_| invalid_data(format!("Invalid integer: {}", content))),
            b'$' => {
                let len: i64 = content
                    .parse()
                    .map_err(|_| invalid_data("Invalid bulk string length"))?;
                if len < 0 {
                    return Ok(RespValue::Null);
                }
                if len > MAX_BULK_LEN {
                    return Err(invalid_data(format!("Bulk string length {} too large", len)));
                }

                let mut data = vec![0u8; len as usize];
                self.reader.read_exact(&mut data)?;
                let mut crlf = [0u8; 2];
                self.reader.read_exact(&mut crlf)?;
                if &crlf != b"\r\n" {
                    return Err(invalid_data("Bulk string not terminated by CRLF"));
                }

                Ok(RespValue::BulkString(data))
            }
            b'*' => {
                let count: i64 = content
                    .parse()
                    .map_err(|_| invalid_data("Invalid array length"))?;
                if count < 0 {
                    return Ok(RespValue::Null);
                }

                let mut elements = Vec::with_capacity(count.min(MAX_ARRAY_PREALLOC) as usize);
                for _ in 0..count {
                    elements.push(self.decode()?);
                }
                Ok(RespValue::Array(elements))
            }
            other => Err(invalid_data(format!(
                "Invalid RESP type byte: {}",
                other as char
            ))),
        }
    }
}
