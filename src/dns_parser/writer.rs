use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::{Error, MAX_PACKET_SIZE};

/// Sequential writer for an outgoing message
///
/// Refuses to grow past `MAX_PACKET_SIZE` instead of truncating: a write
/// that would not fit fails with `Error::TooManyBytes` and leaves the
/// buffer as it was.
#[derive(Debug, Default)]
pub struct PacketWriter {
    buf: Vec<u8>,
}

impl PacketWriter {
    pub fn new() -> PacketWriter {
        PacketWriter {
            buf: Vec::with_capacity(MAX_PACKET_SIZE),
        }
    }

    /// Offset at which the next byte will be written
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.reserve(1)?;
        self.buf.write_u8(value).map_err(|_| Error::TooManyBytes)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), Error> {
        self.reserve(2)?;
        self.buf
            .write_u16::<BigEndian>(value)
            .map_err(|_| Error::TooManyBytes)
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), Error> {
        self.reserve(4)?;
        self.buf
            .write_u32::<BigEndian>(value)
            .map_err(|_| Error::TooManyBytes)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.reserve(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Overwrites two already written bytes, used for length prefixes
    pub fn patch_u16(&mut self, pos: usize, value: u16) -> Result<(), Error> {
        let slot = self
            .buf
            .get_mut(pos..pos + 2)
            .ok_or(Error::NotEnoughBytes)?;
        BigEndian::write_u16(slot, value);
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    fn reserve(&self, n: usize) -> Result<(), Error> {
        if self.buf.len() + n > MAX_PACKET_SIZE {
            return Err(Error::TooManyBytes);
        }
        Ok(())
    }
}
