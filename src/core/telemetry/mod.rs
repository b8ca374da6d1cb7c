//! Transfer telemetry assembly and derived metrics

pub mod assembler;
pub mod metrics;

pub use assembler::{JoinedTransferRow, TransferAssembler};
pub use metrics::{
    duration_seconds, format_duration, megabytes, round3, transfer_speed_mbps, BYTES_PER_MEGABYTE,
};
