//! Forward-only walk over the local entries of a ZIP stream
//!
//! Entries whose sizes are in the local header go through
//! `zip::read::read_zipfile_from_stream`. Streaming writers set general
//! purpose bit 3 instead and put the sizes in a data descriptor after the
//! data; those entries are inflated here until the deflate stream ends,
//! then checked against the descriptor.

use std::io::{self, BufReader, Cursor, Read};

use flate2::bufread::DeflateDecoder;
use zip::result::ZipError;

use crate::error::{StreamError, StreamResult};

const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4b50;
const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x0807_4b50;
const LOCAL_HEADER_LEN: usize = 30;
const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;
const METHOD_DEFLATED: u16 = 8;
const ZIP64_EXTRA_ID: u16 = 0x0001;

/// Local entries of an archive, in stream order
pub(crate) struct EntryStream<R> {
    inner: BufReader<R>,
}

impl<R: Read> EntryStream<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
        }
    }

    /// Hand the next entry to `handle`
    ///
    /// Returns `false` once the central directory is reached. `handle` must
    /// read the entry to its end before returning `Ok`.
    pub(crate) fn next_entry<F>(&mut self, handle: F) -> StreamResult<bool>
    where
        F: FnOnce(&str, &mut dyn Read) -> StreamResult<()>,
    {
        let mut header = [0u8; LOCAL_HEADER_LEN];
        self.inner
            .read_exact(&mut header)
            .map_err(|e| StreamError::Archive(ZipError::Io(e)))?;

        if le_u32(&header, 0) == LOCAL_HEADER_SIGNATURE
            && le_u16(&header, 6) & FLAG_DATA_DESCRIPTOR != 0
        {
            self.described_entry(&header, handle)?;
            return Ok(true);
        }

        let mut chained = Cursor::new(header).chain(&mut self.inner);
        let result = match zip::read::read_zipfile_from_stream(&mut chained)? {
            Some(mut entry) => {
                let name = entry.name().to_string();
                handle(&name, &mut entry)?;
                Ok(true)
            }
            None => Ok(false),
        };
        result
    }

    fn described_entry<F>(&mut self, header: &[u8; LOCAL_HEADER_LEN], handle: F) -> StreamResult<()>
    where
        F: FnOnce(&str, &mut dyn Read) -> StreamResult<()>,
    {
        let mut name = vec![0u8; le_u16(header, 26) as usize];
        self.inner.read_exact(&mut name)?;
        let mut extra = vec![0u8; le_u16(header, 28) as usize];
        self.inner.read_exact(&mut extra)?;
        let name = String::from_utf8_lossy(&name).into_owned();

        // A stored entry has no end marker of its own
        if le_u16(header, 8) != METHOD_DEFLATED {
            return Err(StreamError::Archive(ZipError::UnsupportedArchive(
                "entry sizes are only in its data descriptor and the entry is not deflated",
            )));
        }

        let mut data = Checksummed::new(DeflateDecoder::new(&mut self.inner));
        handle(&name, &mut data)?;
        io::copy(&mut data, &mut io::sink())?;
        let (crc32, size) = data.finish();

        let descriptor = self.read_descriptor(has_zip64_extra(&extra))?;
        log::trace!(
            "{}: data descriptor crc {:08x}, {} -> {} bytes",
            name,
            descriptor.crc32,
            descriptor.compressed_size,
            descriptor.size
        );
        if descriptor.crc32 != crc32 || descriptor.size != size {
            return Err(StreamError::Archive(ZipError::InvalidArchive(
                "data descriptor does not match the inflated entry",
            )));
        }
        Ok(())
    }

    fn read_descriptor(&mut self, zip64: bool) -> io::Result<DataDescriptor> {
        // The signature is optional
        let mut crc32 = self.read_u32()?;
        if crc32 == DATA_DESCRIPTOR_SIGNATURE {
            crc32 = self.read_u32()?;
        }
        let (compressed_size, size) = if zip64 {
            (self.read_u64()?, self.read_u64()?)
        } else {
            (u64::from(self.read_u32()?), u64::from(self.read_u32()?))
        };
        Ok(DataDescriptor {
            crc32,
            compressed_size,
            size,
        })
    }

    fn read_u32(&mut self) -> io::Result<u32> {
        let mut bytes = [0u8; 4];
        self.inner.read_exact(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    fn read_u64(&mut self) -> io::Result<u64> {
        let mut bytes = [0u8; 8];
        self.inner.read_exact(&mut bytes)?;
        Ok(u64::from_le_bytes(bytes))
    }
}

struct DataDescriptor {
    crc32: u32,
    compressed_size: u64,
    size: u64,
}

/// Reader that keeps a running CRC-32 and length of what passed through
struct Checksummed<R> {
    inner: R,
    hasher: crc32fast::Hasher,
    len: u64,
}

impl<R: Read> Checksummed<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: crc32fast::Hasher::new(),
            len: 0,
        }
    }

    fn finish(self) -> (u32, u64) {
        (self.hasher.finalize(), self.len)
    }
}

impl<R: Read> Read for Checksummed<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.len += n as u64;
        Ok(n)
    }
}

fn has_zip64_extra(mut extra: &[u8]) -> bool {
    while extra.len() >= 4 {
        let id = le_u16(extra, 0);
        let len = le_u16(extra, 2) as usize;
        if id == ZIP64_EXTRA_ID {
            return true;
        }
        extra = extra.get(4 + len..).unwrap_or_default();
    }
    false
}

fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
