//! Length-prefixed JSON framing.
//!
//! Each frame is a big-endian u32 byte length followed by exactly that many
//! bytes of JSON. The prefix keeps message boundaries intact over TCP's
//! byte stream; the size cap bounds memory per connection.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on a single frame's payload.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Transport and framing errors.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame of {0} bytes exceeds the {MAX_FRAME_LEN}-byte limit")]
    FrameTooLarge(usize),

    #[error("connection closed")]
    Closed,
}

/// Write one message as a length-prefixed JSON frame.
pub async fn write_message<W, T>(writer: &mut W, msg: &T) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = serde_json::to_vec(msg)?;
    if payload.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(payload.len()));
    }
    writer.write_u32(payload.len() as u32).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed JSON frame. A clean EOF before the prefix
/// reads as `ProtocolError::Closed`.
pub async fn read_message<R, T>(reader: &mut R) -> Result<T, ProtocolError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let len = match reader.read_u32().await {
        Ok(len) => len as usize,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::Closed)
        }
        Err(e) => return Err(e.into()),
    };
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(len));
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(serde_json::from_slice(&payload)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::messages::{ClientMessage, ServerMessage};

    #[tokio::test]
    async fn round_trip_single_message() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        let msg = ClientMessage::JoinMatch {
            match_id: "abc123".into(),
        };
        write_message(&mut client, &msg).await.unwrap();
        let received: ClientMessage = read_message(&mut server).await.unwrap();
        assert_eq!(received, msg);
    }

    #[tokio::test]
    async fn frames_preserve_boundaries() {
        let (mut client, mut server) = tokio::io::duplex(4096);
        let first = ServerMessage::heartbeat("m1");
        let second = ServerMessage::OpponentConnected;
        write_message(&mut client, &first).await.unwrap();
        write_message(&mut client, &second).await.unwrap();

        let got1: ServerMessage = read_message(&mut server).await.unwrap();
        let got2: ServerMessage = read_message(&mut server).await.unwrap();
        assert_eq!(got1, first);
        assert_eq!(got2, second);
    }

    #[tokio::test]
    async fn eof_reads_as_closed() {
        let (client, mut server) = tokio::io::duplex(64);
        drop(client);
        let result: Result<ClientMessage, _> = read_message(&mut server).await;
        assert!(matches!(result, Err(ProtocolError::Closed)));
    }

    #[tokio::test]
    async fn oversized_prefix_is_rejected() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_u32(u32::MAX).await.unwrap();
        let result: Result<ClientMessage, _> = read_message(&mut server).await;
        assert!(matches!(result, Err(ProtocolError::FrameTooLarge(_))));
    }

    #[tokio::test]
    async fn garbage_payload_is_a_json_error() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_u32(4).await.unwrap();
        client.write_all(b"@@@@").await.unwrap();
        let result: Result<ClientMessage, _> = read_message(&mut server).await;
        assert!(matches!(result, Err(ProtocolError::Json(_))));
    }
}
