//! Async RPC client: one TCP connection per call, with a per-call deadline.
//!
//! Grounded in `src/cli.rs`'s `TcpStream::connect` + write/read pair
//! (harborgrid-justin-rusty-db) and in spec.md §4.4/§4.5's "open a channel
//! ... with a 5s deadline" contract for forwards, and §4.3's per-attempt
//! deadline for replication fan-out.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::codec::{read_frame, write_frame};
use crate::error::RpcError;
use crate::message::{Request, Response};

/// Default per-call deadline for client-facing forwards (spec.md §4.4).
pub const FORWARD_DEADLINE: Duration = Duration::from_secs(5);

/// Default per-attempt deadline for replication fan-out (spec.md §4.3).
pub const REPLICATE_DEADLINE: Duration = Duration::from_secs(5);

/// Opens a connection to `address`, sends `request`, and waits for a
/// response, the whole exchange bounded by `deadline`. A connect, write, or
/// read that does not finish in time is a transport failure
/// (`RpcError::Timeout`), the only kind the replication coordinator retries.
pub async fn call(address: &str, request: Request, deadline: Duration) -> Result<Response, RpcError> {
    timeout(deadline, call_inner(address, request))
        .await
        .map_err(|_| RpcError::Timeout)?
}

async fn call_inner(address: &str, request: Request) -> Result<Response, RpcError> {
    let mut stream = TcpStream::connect(address).await?;
    write_frame(&mut stream, &request).await?;
    read_frame(&mut stream).await
}

/// Sends a `Replicate` call with the fan-out deadline and unwraps the
/// `Replicate` response variant, or an `RpcError` for anything else
/// (a mismatched variant is a protocol bug, not a retryable transport
/// failure, so it is surfaced distinctly via `UnexpectedResponse`).
pub async fn replicate(
    address: &str,
    req: crate::message::ReplicateRequest,
    deadline: Duration,
) -> Result<crate::message::ReplicateResponse, RpcError> {
    match call(address, Request::Replicate(req), deadline).await? {
        Response::Replicate(r) => Ok(r),
        _ => Err(RpcError::UnexpectedResponse),
    }
}

pub async fn forward_put(
    address: &str,
    req: crate::message::PutRequest,
    deadline: Duration,
) -> Result<crate::message::PutResponse, RpcError> {
    match call(address, Request::ForwardPut(req), deadline).await? {
        Response::Put(r) => Ok(r),
        _ => Err(RpcError::UnexpectedResponse),
    }
}

pub async fn forward_get(
    address: &str,
    req: crate::message::GetRequest,
    deadline: Duration,
) -> Result<crate::message::GetResponse, RpcError> {
    match call(address, Request::ForwardGet(req), deadline).await? {
        Response::Get(r) => Ok(r),
        _ => Err(RpcError::UnexpectedResponse),
    }
}

pub async fn forward_delete(
    address: &str,
    req: crate::message::DeleteRequest,
    deadline: Duration,
) -> Result<crate::message::DeleteResponse, RpcError> {
    match call(address, Request::ForwardDelete(req), deadline).await? {
        Response::Delete(r) => Ok(r),
        _ => Err(RpcError::UnexpectedResponse),
    }
}
