use core::fmt;
use std::io;

use crate::buffer::SinkError;
use crate::types::StatusCode;

/// Which configured limit an operation ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitKind {
    Array,
    String,
    ByteString,
    /// A bounded sink (record sub-buffer or fixed message buffer) ran out of room.
    Buffer,
    /// Nested variants, records or diagnostic chains went deeper than allowed.
    Nesting,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Array => "MaxArrayLength",
            Self::String => "MaxStringLength",
            Self::ByteString => "MaxByteStringLength",
            Self::Buffer => "MaxBufferSize",
            Self::Nesting => "MaxNestingDepth",
        };
        f.write_str(name)
    }
}

/// Classification of a failed write on the underlying sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoFailure {
    ConnectionClosed,
    EndOfStream,
    ConnectionRejected,
    CommunicationError,
    Unexpected,
}

impl IoFailure {
    pub fn classify(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::BrokenPipe | io::ErrorKind::NotConnected => Self::ConnectionClosed,
            io::ErrorKind::UnexpectedEof | io::ErrorKind::WriteZero => Self::EndOfStream,
            io::ErrorKind::ConnectionRefused => Self::ConnectionRejected,
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::AddrNotAvailable
            | io::ErrorKind::AddrInUse
            | io::ErrorKind::TimedOut => Self::CommunicationError,
            _ => Self::Unexpected,
        }
    }

    pub fn status_code(self) -> StatusCode {
        match self {
            Self::ConnectionClosed => StatusCode::BAD_CONNECTION_CLOSED,
            Self::EndOfStream => StatusCode::BAD_END_OF_STREAM,
            Self::ConnectionRejected => StatusCode::BAD_CONNECTION_REJECTED,
            Self::CommunicationError => StatusCode::BAD_COMMUNICATION_ERROR,
            Self::Unexpected => StatusCode::BAD_UNEXPECTED_ERROR,
        }
    }
}

impl fmt::Display for IoFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ConnectionClosed => "connection closed",
            Self::EndOfStream => "end of stream",
            Self::ConnectionRejected => "connection rejected",
            Self::CommunicationError => "communication error",
            Self::Unexpected => "unexpected i/o error",
        };
        f.write_str(text)
    }
}

/// Errors raised by every `put*` operation of the encoder.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodingError {
    #[error("cannot encode null {type_name} in strict mode")]
    NullValue { type_name: &'static str },

    #[error("{kind} {limit} < {length}")]
    LimitsExceeded { kind: LimitKind, length: usize, limit: usize },

    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("ragged matrix: {0}")]
    RaggedMatrix(String),

    #[error("cannot resolve type identifier {type_id}: {reason}")]
    TypeResolution { type_id: String, reason: String },

    #[error("decimal scale {0} does not fit a 16-bit signed integer")]
    ScaleOverflow(i64),

    #[error("{failure}: {source}")]
    Io {
        failure: IoFailure,
        #[source]
        source: SinkError,
    },
}

impl EncodingError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedType(message.into())
    }

    pub fn type_resolution(type_id: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::TypeResolution { type_id: type_id.to_string(), reason: reason.into() }
    }

    /// Protocol status code reported to the peer for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::LimitsExceeded { .. } => StatusCode::BAD_ENCODING_LIMITS_EXCEEDED,
            Self::Io { failure, .. } => failure.status_code(),
            Self::NullValue { .. }
            | Self::UnsupportedType(_)
            | Self::RaggedMatrix(_)
            | Self::TypeResolution { .. }
            | Self::ScaleOverflow(_) => StatusCode::BAD_ENCODING_ERROR,
        }
    }
}

impl From<SinkError> for EncodingError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::LimitExceeded { attempted, limit } => {
                Self::LimitsExceeded { kind: LimitKind::Buffer, length: attempted, limit }
            }
            SinkError::OutOfSpace { .. } => {
                Self::Io { failure: IoFailure::EndOfStream, source: err }
            }
            SinkError::Io(ref io_err) => {
                let failure = IoFailure::classify(io_err.kind());
                Self::Io { failure, source: err }
            }
        }
    }
}
