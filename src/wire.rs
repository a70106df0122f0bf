//! The 16-byte registration record peers send us: a virtual address, a
//! remote key and a queue-pair id, all big-endian, no framing, no checksum.

use byteorder::{BigEndian, ByteOrder};

use crate::error::RelayError;

/// Exact wire size of one record.
pub const RECORD_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireRecord {
    /// Memory address the peer exposes for remote access, bytes [0:8).
    pub virtual_address: u64,
    /// Access token for the peer's registered memory region, bytes [8:12).
    pub remote_key: u32,
    /// Identifier of the peer's send/receive channel pair, bytes [12:16).
    pub queue_pair_id: u32,
}

impl WireRecord {
    /// Decodes the first [`RECORD_LEN`] bytes of `buf`. Anything after
    /// those 16 bytes is ignored here; the listener still echoes it back.
    ///
    /// Fails fast on short buffers rather than zero-filling the
    /// missing trailing bytes.
    pub fn decode(buf: &[u8]) -> Result<Self, RelayError> {
        if buf.len() < RECORD_LEN {
            return Err(RelayError::ShortRecord { actual: buf.len() });
        }
        Ok(Self {
            virtual_address: BigEndian::read_u64(&buf[0..8]),
            remote_key: BigEndian::read_u32(&buf[8..12]),
            queue_pair_id: BigEndian::read_u32(&buf[12..16]),
        })
    }

    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut buf = [0u8; RECORD_LEN];
        BigEndian::write_u64(&mut buf[0..8], self.virtual_address);
        BigEndian::write_u32(&mut buf[8..12], self.remote_key);
        BigEndian::write_u32(&mut buf[12..16], self.queue_pair_id);
        buf
    }
}
