//! RPC-layer error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("frame too large: {0} bytes")]
    FrameTooLarge(usize),

    #[error("call timed out after deadline")]
    Timeout,

    #[error("unexpected response variant for this call")]
    UnexpectedResponse,
}

impl From<RpcError> for corelib::Error {
    fn from(e: RpcError) -> Self {
        corelib::Error::RouteFailure(e.to_string())
    }
}
