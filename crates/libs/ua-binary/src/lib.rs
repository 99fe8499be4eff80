//! Binary wire-format encoder for the OPC UA builtin type system.
//!
//! A [`BinaryEncoder`] writes values to a [`BinaryWrite`] sink in the
//! little-endian form defined for UA binary messages. Limits, namespace
//! and record type registrations live in a shared [`EncodingContext`],
//! which may be loaded from TOML through [`EncodingConfig`].
//!
//! Values with a static type are written with the typed `put_*` methods.
//! Values only known at runtime go through [`BinaryEncoder::put`] with a
//! [`TypeDescriptor`], or [`BinaryEncoder::put_value`] which infers one.

pub mod buffer;
pub mod config;
pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod matrix;
pub mod types;

pub use buffer::{BinaryWrite, ByteOrder, LimitedBuffer, OutputBuffer, SinkError, StreamWriter};
pub use config::{EncodingConfig, EncodingContext, EncodingLimits, NamespaceTable, TypeTable};
pub use encoder::{BinaryEncoder, EncoderMode};
pub use error::{EncodingError, IoFailure, LimitKind};
pub use types::*;
