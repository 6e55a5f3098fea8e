//! Wire codecs: length-prefixed frames and fixed-width ASCII coordinates.
//!
//! Both codecs are stateless and round-trip exact. The async entry points
//! read or write exactly one message and map a mid-message EOF to
//! [`ProtocolError::IncompleteFrame`]; an EOF on a message boundary is the
//! peer hanging up cleanly and maps to [`ProtocolError::ConnectionClosed`].

use crate::error::ProtocolError;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on a frame payload. The length field itself allows 4 GiB,
/// which would let a hostile or corrupt header exhaust memory; a JPEG of the
/// 800x600 arena is well under 1 MiB, so 8 MiB leaves generous headroom.
pub const MAX_FRAME_LEN: usize = 8 * 1024 * 1024;

/// Wire size of one encoded coordinate: `"XXXX,YYYY"`.
pub const COORD_WIRE_LEN: usize = 9;

/// Largest value a four-digit field can carry.
pub const COORD_MAX: u16 = 9999;

/// Encodes one frame into a standalone buffer: 4-byte big-endian length
/// prefix followed by the raw payload.
pub fn encode_frame(payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    if payload.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(payload.len()));
    }
    let mut out = Vec::with_capacity(4 + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Writes one length-prefixed frame to the stream.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(payload.len()));
    }
    writer.write_all(&(payload.len() as u32).to_be_bytes()).await?;
    writer.write_all(payload).await?;
    Ok(())
}

/// Reads one length-prefixed frame from the stream.
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    let first = reader.read(&mut header).await?;
    if first == 0 {
        return Err(ProtocolError::ConnectionClosed);
    }
    if first < header.len() {
        reader
            .read_exact(&mut header[first..])
            .await
            .map_err(truncated)?;
    }

    let len = u32::from_be_bytes(header) as usize;
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(len));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await.map_err(truncated)?;
    Ok(payload)
}

/// A detected or actual ball position, both axes in `[0, 9999]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coordinate {
    pub x: u16,
    pub y: u16,
}

impl Coordinate {
    /// Builds a coordinate, rejecting values that cannot be encoded in four
    /// decimal digits.
    pub fn new(x: u16, y: u16) -> Result<Self, ProtocolError> {
        if x > COORD_MAX {
            return Err(ProtocolError::OutOfRange(x));
        }
        if y > COORD_MAX {
            return Err(ProtocolError::OutOfRange(y));
        }
        Ok(Self { x, y })
    }

    /// Clamps arbitrary pixel positions into the encodable range. Detection
    /// results always sit inside the frame, so clamping only matters for
    /// frames larger than 9999 pixels on a side.
    pub fn saturating(x: u32, y: u32) -> Self {
        Self {
            x: x.min(COORD_MAX as u32) as u16,
            y: y.min(COORD_MAX as u32) as u16,
        }
    }

    /// Encodes as `"XXXX,YYYY"`.
    pub fn to_wire(self) -> [u8; COORD_WIRE_LEN] {
        let mut out = [0u8; COORD_WIRE_LEN];
        let text = format!("{:04},{:04}", self.x, self.y);
        out.copy_from_slice(text.as_bytes());
        out
    }

    /// Decodes exactly [`COORD_WIRE_LEN`] bytes of `"XXXX,YYYY"`.
    pub fn from_wire(bytes: &[u8; COORD_WIRE_LEN]) -> Result<Self, ProtocolError> {
        if bytes[4] != b',' {
            return Err(malformed(bytes));
        }
        let x = parse_four_digits(&bytes[..4]).ok_or_else(|| malformed(bytes))?;
        let y = parse_four_digits(&bytes[5..]).ok_or_else(|| malformed(bytes))?;
        // Four digits cannot exceed COORD_MAX, so no range check is needed.
        Ok(Self { x, y })
    }
}

/// Writes one encoded coordinate to the stream.
pub async fn write_coordinate<W>(writer: &mut W, coord: Coordinate) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&coord.to_wire()).await?;
    Ok(())
}

/// Reads exactly one coordinate from the stream.
pub async fn read_coordinate<R>(reader: &mut R) -> Result<Coordinate, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; COORD_WIRE_LEN];
    let first = reader.read(&mut buf).await?;
    if first == 0 {
        return Err(ProtocolError::ConnectionClosed);
    }
    if first < buf.len() {
        reader
            .read_exact(&mut buf[first..])
            .await
            .map_err(truncated)?;
    }
    Coordinate::from_wire(&buf)
}

fn parse_four_digits(digits: &[u8]) -> Option<u16> {
    let mut value = 0u16;
    for &d in digits {
        if !d.is_ascii_digit() {
            return None;
        }
        value = value * 10 + (d - b'0') as u16;
    }
    Some(value)
}

fn malformed(bytes: &[u8]) -> ProtocolError {
    ProtocolError::MalformedCoordinate(String::from_utf8_lossy(bytes).into_owned())
}

fn truncated(err: std::io::Error) -> ProtocolError {
    if err.kind() == ErrorKind::UnexpectedEof {
        ProtocolError::IncompleteFrame
    } else {
        ProtocolError::Io(err)
    }
}
