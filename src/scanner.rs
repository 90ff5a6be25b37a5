use crate::error::QualityError;
use crate::marker::{Marker, MarkerType};
use std::io::{self, BufReader, Read, Seek, SeekFrom};

/// A marker and the length of the payload that follows it. The scanner that produced it
/// is left positioned at the first payload byte.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Segment {
    pub marker: Marker,

    /// Declared length minus the two bytes of the length field. Zero for stand-alone markers.
    pub length: usize,
}

/// SegmentScanner walks a seekable JPEG byte stream marker by marker.
pub struct SegmentScanner<R> {
    reader: BufReader<R>,
    stream_len: u64,
}

impl<R: Read + Seek> SegmentScanner<R> {
    /// Wraps `source` and rewinds it to the first byte.
    pub fn new(mut source: R) -> io::Result<Self> {
        let stream_len = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(0))?;

        Ok(SegmentScanner {
            reader: BufReader::new(source),
            stream_len,
        })
    }

    pub fn check_start_of_image(&mut self) -> Result<(), QualityError> {
        let mut signature = [0u8; Marker::SIZE];
        match self.reader.read_exact(&mut signature) {
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(QualityError::InvalidFormat)
            }
            result => result?,
        }

        if signature != Marker::SOI.to_u16().to_be_bytes() {
            log::debug!(
                "expected the SOI marker, found {:02x}{:02x}",
                signature[0],
                signature[1]
            );
            return Err(QualityError::InvalidFormat);
        }

        Ok(())
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.reader.read_exact(&mut byte) {
            Ok(()) => Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Finds the next marker, skipping any byte that is not part of one. `None` means the
    /// data ran out first.
    pub fn read_marker(&mut self) -> Result<Option<Marker>, QualityError> {
        loop {
            let Some(byte) = self.read_byte()? else {
                return Ok(None);
            };
            if byte != Marker::GLOBAL {
                continue;
            }

            // Any number of 0xFF fill bytes may precede the marker code.
            let mut code = Marker::GLOBAL;
            while code == Marker::GLOBAL {
                let Some(next) = self.read_byte()? else {
                    return Ok(None);
                };
                code = next;
            }

            // 0xFF00 is a stuffed data byte, not a marker.
            if let Some(marker) = Marker::from_u8(code) {
                log::trace!("marker {:04x}", marker.to_u16());
                return Ok(Some(marker));
            }
        }
    }

    /// Reads the big-endian length field that follows a segment marker and returns the
    /// payload length, the field counting its own two bytes.
    pub fn read_segment_length(&mut self) -> Result<usize, QualityError> {
        let mut length = [0u8; 2];
        self.reader.read_exact(&mut length)?;

        let declared = u16::from_be_bytes(length) as usize;
        declared.checked_sub(2).ok_or_else(|| {
            log::debug!("short segment length {}", declared);
            QualityError::MalformedSegment
        })
    }

    /// Moves past `length` payload bytes without reading them.
    pub fn skip(&mut self, length: usize) -> Result<(), QualityError> {
        let position = self.reader.stream_position()?;
        if position + length as u64 > self.stream_len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "cannot seek {} bytes from offset {}, stream holds {}",
                    length, position, self.stream_len
                ),
            )
            .into());
        }

        self.reader.seek_relative(length as i64)?;
        Ok(())
    }

    pub fn read_payload(&mut self, length: usize) -> Result<Vec<u8>, QualityError> {
        let mut payload = vec![0u8; length];
        self.reader.read_exact(&mut payload)?;
        Ok(payload)
    }

    pub fn next_segment(&mut self) -> Result<Option<Segment>, QualityError> {
        let Some(marker) = self.read_marker()? else {
            return Ok(None);
        };

        let length = match marker.is_segment() {
            MarkerType::Segment => self.read_segment_length()?,
            MarkerType::StandAlone => 0,
        };
        log::trace!("segment {:?}, {} payload bytes", marker, length);

        Ok(Some(Segment { marker, length }))
    }
}
