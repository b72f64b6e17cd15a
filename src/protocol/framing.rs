//! Data connection framing
//!
//! Listings are sequences of fixed-width name records closed by a short
//! sentinel. File payloads are raw bytes closed by a sentinel (v1) or
//! preceded by their big-endian length (v2).

use crate::error::ProtocolError;

/// Width of one listing record, NUL padding included
pub const LISTING_RECORD_LENGTH: usize = 100;

/// Closes a listing stream
pub const LISTING_SENTINEL: &[u8] = b"complete\0";

/// Closes a v1 file payload
pub const FILE_SENTINEL: &[u8] = b"__complete__\0";

/// Size of the v2 file length header
pub const LENGTH_HEADER_LENGTH: usize = 8;

/// Encodes one directory entry name as a NUL-padded listing record.
///
/// Names that would not leave room for a terminating NUL are truncated.
pub fn encode_listing_record(name: &[u8]) -> [u8; LISTING_RECORD_LENGTH] {
    let mut record = [0u8; LISTING_RECORD_LENGTH];
    let len = name.len().min(LISTING_RECORD_LENGTH - 1);
    record[..len].copy_from_slice(&name[..len]);
    record
}

/// Decodes a complete listing stream into entry names.
///
/// The stream must consist of whole records followed by exactly the
/// sentinel. A record holding the name `complete` is still a full record,
/// so record width is what tells the two apart.
pub fn decode_listing(mut stream: &[u8]) -> Result<Vec<String>, ProtocolError> {
    let mut names = Vec::new();

    loop {
        if stream == LISTING_SENTINEL {
            return Ok(names);
        }
        if stream.len() < LISTING_RECORD_LENGTH {
            return Err(ProtocolError::MalformedListing(format!(
                "{} trailing bytes after {} records",
                stream.len(),
                names.len()
            )));
        }

        let (record, rest) = stream.split_at(LISTING_RECORD_LENGTH);
        let end = record.iter().position(|&b| b == 0).unwrap_or(record.len());
        names.push(String::from_utf8_lossy(&record[..end]).into_owned());
        stream = rest;
    }
}

/// Splits the v1 sentinel off a received file payload.
///
/// Returns `None` when the payload never reached its sentinel.
pub fn strip_file_sentinel(payload: &[u8]) -> Option<&[u8]> {
    payload.strip_suffix(FILE_SENTINEL)
}

pub fn encode_length_header(len: u64) -> [u8; LENGTH_HEADER_LENGTH] {
    len.to_be_bytes()
}

pub fn decode_length_header(header: [u8; LENGTH_HEADER_LENGTH]) -> u64 {
    u64::from_be_bytes(header)
}
