//! Length-prefixed bincode framing over any `AsyncRead + AsyncWrite`.
//!
//! Grounded in `harborgrid-justin-rusty-db/src/network/server.rs` and
//! `src/cli.rs`, which serialize `Request`/`Response` with `bincode` and
//! push the bytes straight onto a `TcpStream`. That code reads one `n`-byte
//! chunk per message and assumes it is a whole message; this crate adds an
//! explicit 4-byte big-endian length prefix so a `GetSnapshot` response (or
//! any message split across TCP segments) is framed unambiguously.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::RpcError;

/// Messages larger than this are rejected rather than trusted blindly —
/// mirrors rusty-db's own `MAX_BINCODE_SIZE` guard against a corrupt or
/// hostile length prefix causing an unbounded allocation.
pub const MAX_FRAME_BYTES: u32 = 64 * 1024 * 1024;

pub async fn write_frame<W, T>(writer: &mut W, value: &T) -> Result<(), RpcError>
where
    W: AsyncWrite + Unpin,
    T: serde::Serialize,
{
    let bytes = bincode::serialize(value).map_err(|e| RpcError::Serialization(e.to_string()))?;
    let len = u32::try_from(bytes.len()).map_err(|_| RpcError::FrameTooLarge(bytes.len()))?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_frame<R, T>(reader: &mut R) -> Result<T, RpcError>
where
    R: AsyncRead + Unpin,
    T: serde::de::DeserializeOwned,
{
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_FRAME_BYTES {
        return Err(RpcError::FrameTooLarge(len as usize));
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf).await?;
    bincode::deserialize(&buf).map_err(|e| RpcError::Serialization(e.to_string()))
}
