use std::io;
use std::net::SocketAddr;
use std::process::ExitStatus;

use thiserror::Error;

/// Everything here is fatal: nothing is caught or retried anywhere,
/// every failure propagates to a non-zero process exit.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The listen address/port could not be bound.
    #[error("could not bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    /// Network failure during the accept/recv/send cycle.
    #[error("connection failed during {stage}: {source}")]
    Connection { stage: &'static str, source: io::Error },

    /// The peer sent fewer bytes than one full wire record.
    #[error("short record: expected 16 bytes, got {actual}")]
    ShortRecord { actual: usize },

    /// The control-plane tool could not be launched at all.
    #[error("could not spawn `{}`: {source}", .command.join(" "))]
    Spawn { command: Vec<String>, source: io::Error },

    /// The control-plane tool ran but exited with a non-zero status.
    #[error("`{}` failed with {status}: {output}", .command.join(" "))]
    Execution {
        command: Vec<String>,
        status: ExitStatus,
        output: String,
    },
}
