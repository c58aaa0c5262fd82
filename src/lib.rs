#![warn(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    clippy::uninlined_format_args
)]

//! A crate for decoding the SAE J1939-73 diagnostic messages used by heavy duty
//! OBD (HD-OBD) compliance tooling, and for merging the readiness status reported by
//! every module on a vehicle into a single vehicle level verdict.
//!
//! ## Message support
//!
//! | PGN   | Message | Decoded into |
//! |-------|---------|--------------|
//! | 65226 | DM1  | [j1939::TroubleCodePacket] |
//! | 65227 | DM2  | [j1939::TroubleCodePacket] |
//! | 65230 | DM5  | [j1939::DiagnosticReadinessPacket] |
//! | 65231 | DM6  | [j1939::TroubleCodePacket] |
//! | 65236 | DM12 | [j1939::TroubleCodePacket] |
//! | 54016 | DM19 | [j1939::CalibrationInformationPacket] |
//! | 49664 | DM20 | [j1939::MonitorPerformanceRatioPacket] |
//! | 49408 | DM21 | [j1939::DiagnosticReadiness2Packet] |
//! | 64949 | DM23 | [j1939::TroubleCodePacket] |
//! | 64950 | DM24 | [j1939::SpnSupportPacket] |
//! | 64952 | DM26 | [j1939::Dm26TripReadiness] |
//! | 64896 | DM28 | [j1939::TroubleCodePacket] |
//! | 41984 | DM30 | [j1939::ScaledTestResultsPacket] |
//! | 65259 | Component identification | [j1939::ComponentIdentification] |
//!
//! Every decoder is a pure function of the message bytes, so packets can be decoded on
//! any number of threads at once. The only shared state is [monitored_system::VehicleReadiness]
//! (and the [monitored_system::CompositeMonitoredSystem]s it owns), which serializes its own
//! updates.
//!
//! ## Sentinel values
//!
//! J1939 reserves the top of every value range. `0xFE` / `0xFExx` means *error* and
//! `0xFF` / `0xFFxx` means *not available*. These are valid decoded states and are kept
//! as such ([codec::ScaledValue]), they are never folded into a numeric default.
//!
//! ## Bus access
//!
//! This crate does not talk to a CAN adapter. Frames are handed in as [j1939::RawMessage]
//! by whatever transport layer the application uses.

pub mod codec;
pub mod dtc;
pub mod j1939;
pub mod lamp;
pub mod monitored_system;
pub mod readiness;
pub mod slot;
pub mod units;

pub use j1939::{Packet, RawMessage};

/// Decoder result
pub type DecodeResult<T> = Result<T, DecodeError>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
/// Decoder error
pub enum DecodeError {
    /// Message was shorter than the fixed layout of its PGN requires
    #[error(
        "PGN {pgn} message too short. Required {required} bytes, but got {actual} bytes"
    )]
    InvalidLength {
        /// PGN of the message
        pgn: u32,
        /// Number of bytes the layout requires
        required: usize,
        /// Number of bytes in the message
        actual: usize,
    },
    /// Message body is not a whole number of fixed size records
    #[error(
        "PGN {pgn} body of {actual} bytes is not a whole number of {record_size} byte records"
    )]
    InvalidRecordLength {
        /// PGN of the message
        pgn: u32,
        /// Size of one record in bytes
        record_size: usize,
        /// Size of the record body in bytes
        actual: usize,
    },
    /// No decoder exists for the PGN
    #[error("No decoder for PGN {0}")]
    UnsupportedPgn(u32),
    /// A typed decoder was given a message for a different PGN
    #[error("Expected PGN {want}, but received PGN {received}")]
    MismatchedPgn {
        /// PGN the decoder handles
        want: u32,
        /// PGN of the message
        received: u32,
    },
}
