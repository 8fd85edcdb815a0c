use byteorder::{BigEndian, ByteOrder};

use super::Error;

/// Sequential, bounds-checked cursor over a received message
///
/// Every read either returns the requested bytes and advances the cursor,
/// or fails with `Error::NotEnoughBytes` leaving the position untouched.
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    pub fn new(buf: &'a [u8]) -> PacketReader<'a> {
        PacketReader { buf: buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Moves the cursor to an absolute offset within the message
    pub fn seek(&mut self, pos: usize) -> Result<(), Error> {
        if pos > self.buf.len() {
            return Err(Error::NotEnoughBytes);
        }
        self.pos = pos;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let byte = *self.buf.get(self.pos).ok_or(Error::NotEnoughBytes)?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        let value = BigEndian::read_u16(self.peek_bytes(2)?);
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        let value = BigEndian::read_u32(self.peek_bytes(4)?);
        self.pos += 4;
        Ok(value)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let bytes = self.peek_bytes(n)?;
        self.pos += n;
        Ok(bytes)
    }

    fn peek_bytes(&self, n: usize) -> Result<&'a [u8], Error> {
        let end = self.pos.checked_add(n).ok_or(Error::NotEnoughBytes)?;
        self.buf.get(self.pos..end).ok_or(Error::NotEnoughBytes)
    }
}
