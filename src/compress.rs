use std::{
    fmt,
    io::{self, Cursor, Read, Write},
};

use crate::err::{Error, Result};

/// Streams `input` through `encoder`, then lets `finish` flush its trailer.
fn encode_with<W: Write>(
    input: &mut impl Read,
    mut encoder: W,
    finish: impl FnOnce(W) -> io::Result<()>,
) -> io::Result<()> {
    io::copy(input, &mut encoder)?;
    finish(encoder)
}

/// Compression of binary scripts. A packed script is the magic byte followed
/// by the compressed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CompressionType {
    /// GZip (RFC1952)
    Gzip,
    /// Zlib (RFC1950)
    Zlib,
    /// Uncompressed
    No,
    /// LZ4
    LZ4,
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Gzip => "GZip",
                Self::Zlib => "Zlib",
                Self::No => "No",
                Self::LZ4 => "LZ4",
            }
        )
    }
}

impl CompressionType {
    pub fn to_magic(&self) -> u8 {
        match self {
            CompressionType::Gzip => 1,
            CompressionType::Zlib => 2,
            CompressionType::No => 3,
            CompressionType::LZ4 => 4,
        }
    }

    pub fn from_magic(magic: u8) -> Result<Self> {
        match magic {
            1 => Ok(CompressionType::Gzip),
            2 => Ok(CompressionType::Zlib),
            3 => Ok(CompressionType::No),
            4 => Ok(CompressionType::LZ4),
            _ => Err(Error::UnknownCompression(magic)),
        }
    }

    pub fn compress(&self, input: &mut impl Read, output: &mut impl Write) -> io::Result<()> {
        let level = flate2::Compression::default();
        match self {
            Self::Gzip => encode_with(input, flate2::write::GzEncoder::new(output, level), |e| {
                e.finish().map(drop)
            }),
            Self::Zlib => encode_with(input, flate2::write::ZlibEncoder::new(output, level), |e| {
                e.finish().map(drop)
            }),
            Self::No => io::copy(input, output).map(drop),
            Self::LZ4 => encode_with(input, lz4_flex::frame::FrameEncoder::new(output), |e| {
                e.finish().map(drop).map_err(io::Error::other)
            }),
        }
    }

    pub fn decompress(&self, input: &mut impl Read, output: &mut impl Write) -> io::Result<()> {
        let mut decoder: Box<dyn Read + '_> = match self {
            Self::Gzip => Box::new(flate2::read::GzDecoder::new(input)),
            Self::Zlib => Box::new(flate2::read::ZlibDecoder::new(input)),
            Self::No => Box::new(input),
            Self::LZ4 => Box::new(lz4_flex::frame::FrameDecoder::new(input)),
        };
        io::copy(&mut decoder, output).map(drop)
    }

    pub fn pack(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let mut packed = vec![self.to_magic()];
        self.compress(&mut Cursor::new(payload), &mut packed)
            .map_err(|e| Error::io(format!("cannot compress with {}", self), e))?;
        Ok(packed)
    }

    pub fn unpack(packed: &[u8]) -> Result<Vec<u8>> {
        let (&magic, payload) = packed
            .split_first()
            .ok_or_else(|| Error::parse(0, "empty binary script"))?;
        let compression = Self::from_magic(magic)?;
        let mut unpacked = Vec::new();
        compression
            .decompress(&mut Cursor::new(payload), &mut unpacked)
            .map_err(|e| Error::io(format!("cannot decompress {}", compression), e))?;
        Ok(unpacked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let payload = b"@0,0:+5:hello\n@5,10:-5:world\n".repeat(64);
        for compression in [
            CompressionType::Gzip,
            CompressionType::Zlib,
            CompressionType::No,
            CompressionType::LZ4,
        ] {
            let packed = compression.pack(&payload).unwrap();
            assert_eq!(packed[0], compression.to_magic());
            assert_eq!(CompressionType::unpack(&packed).unwrap(), payload);
        }
    }

    #[test]
    fn test_truncated_gzip_fails() {
        let payload = b"@0,0:+5:hello\n".repeat(64);
        let packed = CompressionType::Gzip.pack(&payload).unwrap();
        let truncated = &packed[..packed.len() - 4];
        assert!(matches!(
            CompressionType::unpack(truncated),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_unknown_magic() {
        assert!(matches!(
            CompressionType::unpack(b"@0,0:+1:x\n"),
            Err(Error::UnknownCompression(b'@'))
        ));
        assert!(CompressionType::unpack(b"").is_err());
    }
}
