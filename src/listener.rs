//! Single-shot record listener: one accept, one receive, one table
//! entry, one echo, then everything is torn down.

use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket};

use crate::error::RelayError;
use crate::table::{TableProgrammer, ACTION_SELECTOR};
use crate::wire::WireRecord;

pub const LISTEN_BACKLOG: u32 = 5;
pub const RECV_BUFFER_LEN: usize = 1024;

pub struct RecordListener {
    listener: TcpListener,
}

impl RecordListener {
    /// Binds the listening socket. Must be called from within a tokio
    /// runtime. Binding port 0 and reading back [`Self::local_addr`]
    /// gives tests a free port.
    pub fn bind(addr: SocketAddr) -> Result<Self, RelayError> {
        let bind_err = |source: io::Error| RelayError::Bind { addr, source };
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(bind_err)?;
        socket.bind(addr).map_err(bind_err)?;
        let listener = socket.listen(LISTEN_BACKLOG).map_err(bind_err)?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves exactly one client: blocks until a peer connects (no
    /// timeout), reads one chunk of up to [`RECV_BUFFER_LEN`] bytes,
    /// decodes the leading [`WireRecord`], installs it into the switch
    /// table, and echoes the received bytes back unmodified.
    ///
    /// Consumes `self`: the listening socket and the connection are
    /// both released on every exit path, and any further clients in
    /// the backlog are never served.
    pub async fn accept_once<P: TableProgrammer>(
        self,
        programmer: &mut P,
    ) -> Result<WireRecord, RelayError> {
        let (mut conn, peer) = self
            .listener
            .accept()
            .await
            .map_err(|source| RelayError::Connection { stage: "accept", source })?;
        tracing::info!("{peer} connected");

        let mut buf = vec![0u8; RECV_BUFFER_LEN];
        let received = conn
            .read(&mut buf)
            .await
            .map_err(|source| RelayError::Connection { stage: "recv", source })?;
        buf.truncate(received);

        let record = WireRecord::decode(&buf)?;
        tracing::info!(
            "qp {:#x} va {:#x} rkey {:#x}",
            record.queue_pair_id,
            record.virtual_address,
            record.remote_key
        );

        programmer.add_entry(
            ACTION_SELECTOR,
            record.queue_pair_id,
            record.virtual_address,
            record.remote_key,
        )?;

        // reply with the buffer we received, not a re-encode: bytes
        // past the record go back to the peer too
        conn.write_all(&buf)
            .await
            .map_err(|source| RelayError::Connection { stage: "send", source })?;
        Ok(record)
    }
}
