//! Text signaling codec for the WebRTC transport variant.
//!
//! The negotiation phase frames SDP offer/answer text with a four-byte ASCII
//! *decimal* length header, a deliberately separate format from the binary
//! frame prefix in [`crate::codec`]. Only the signaling exchange lives here;
//! the peer connection itself belongs to an external WebRTC stack.

use crate::error::ProtocolError;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// A four-digit decimal header caps the message length.
pub const MAX_SIGNAL_LEN: usize = 9999;

/// Encodes one signaling message: `"NNNN"` decimal length + UTF-8 bytes.
pub fn encode_signal(text: &str) -> Result<Vec<u8>, ProtocolError> {
    if text.len() > MAX_SIGNAL_LEN {
        return Err(ProtocolError::SignalTooLarge(text.len()));
    }
    let mut out = Vec::with_capacity(4 + text.len());
    out.extend_from_slice(format!("{:04}", text.len()).as_bytes());
    out.extend_from_slice(text.as_bytes());
    Ok(out)
}

/// Writes one signaling message to the stream.
pub async fn write_signal<W>(writer: &mut W, text: &str) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&encode_signal(text)?).await?;
    Ok(())
}

/// Reads one signaling message from the stream.
pub async fn read_signal<R>(reader: &mut R) -> Result<String, ProtocolError>
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

    let len = parse_decimal_header(&header).ok_or(ProtocolError::MalformedSignal)?;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.map_err(truncated)?;
    String::from_utf8(body).map_err(|_| ProtocolError::MalformedSignal)
}

fn parse_decimal_header(header: &[u8; 4]) -> Option<usize> {
    let mut len = 0usize;
    for &d in header {
        if !d.is_ascii_digit() {
            return None;
        }
        len = len * 10 + (d - b'0') as usize;
    }
    Some(len)
}

fn truncated(err: std::io::Error) -> ProtocolError {
    if err.kind() == ErrorKind::UnexpectedEof {
        ProtocolError::IncompleteFrame
    } else {
        ProtocolError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_zero_padded_decimal() {
        let encoded = encode_signal("v=0\r\n").unwrap();
        assert_eq!(&encoded[..4], b"0005");
        assert_eq!(&encoded[4..], b"v=0\r\n");
    }

    #[test]
    fn rejects_oversized_message() {
        let text = "a".repeat(MAX_SIGNAL_LEN + 1);
        match encode_signal(&text) {
            Err(ProtocolError::SignalTooLarge(len)) => assert_eq!(len, MAX_SIGNAL_LEN + 1),
            other => panic!("expected SignalTooLarge, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn roundtrip_over_stream() {
        let offer = "v=0\r\no=- 0 0 IN IP4 127.0.0.1\r\ns=-\r\n";
        let mut wire = Vec::new();
        write_signal(&mut wire, offer).await.unwrap();
        let decoded = read_signal(&mut wire.as_slice()).await.unwrap();
        assert_eq!(decoded, offer);
    }

    #[tokio::test]
    async fn rejects_non_decimal_header() {
        let mut wire: &[u8] = b"12ab-rest";
        match read_signal(&mut wire).await {
            Err(ProtocolError::MalformedSignal) => {}
            other => panic!("expected MalformedSignal, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn truncated_body_is_incomplete() {
        let mut wire: &[u8] = b"0010abc";
        match read_signal(&mut wire).await {
            Err(ProtocolError::IncompleteFrame) => {}
            other => panic!("expected IncompleteFrame, got {:?}", other),
        }
    }
}
