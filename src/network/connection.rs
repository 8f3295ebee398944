use crate::{
    Error, Result,
    client::Config,
    network::{TcpStreamReader, TcpStreamWriter, tcp_connect},
    resp::{Command, CommandEncoder, Value, ValueDecoder, cmd},
};
#[cfg(feature = "tls")]
use crate::network::{TcpTlsStreamReader, TcpTlsStreamWriter, tcp_tls_connect};
use futures_util::{SinkExt, StreamExt};
use log::{Level, debug, log_enabled};
use tokio_util::codec::{FramedRead, FramedWrite};

pub(crate) enum Streams {
    Tcp(
        FramedRead<TcpStreamReader, ValueDecoder>,
        FramedWrite<TcpStreamWriter, CommandEncoder>,
    ),
    #[cfg(feature = "tls")]
    TcpTls(
        FramedRead<TcpTlsStreamReader, ValueDecoder>,
        FramedWrite<TcpTlsStreamWriter, CommandEncoder>,
    ),
}

impl Streams {
    async fn connect(host: &str, port: u16, config: &Config) -> Result<Self> {
        #[cfg(feature = "tls")]
        if let Some(tls_config) = &config.tls_config {
            let (reader, writer) = tcp_tls_connect(host, port, tls_config).await?;
            let framed_read = FramedRead::new(reader, ValueDecoder);
            let framed_write = FramedWrite::new(writer, CommandEncoder);
            return Ok(Streams::TcpTls(framed_read, framed_write));
        }

        let (reader, writer) = tcp_connect(host, port).await?;
        let framed_read = FramedRead::new(reader, ValueDecoder);
        let framed_write = FramedWrite::new(writer, CommandEncoder);
        Ok(Streams::Tcp(framed_read, framed_write))
    }
}

/// A short-lived connection this crate opens on its own behalf to probe a cluster node:
/// dial, `HELLO`, optional `SELECT`, then issue `CLUSTER NODES`/`CLUSTER INFO`/`PING`.
///
/// This is not a user-facing client: it has no retry policy, no pipelining, no pub/sub.
pub(crate) struct ProbeConnection {
    streams: Streams,
    tag: String,
    active: bool,
}

impl ProbeConnection {
    pub(crate) async fn connect(host: &str, port: u16, config: &Config) -> Result<Self> {
        let streams = Streams::connect(host, port, config).await?;

        let mut connection = Self {
            streams,
            tag: format!("{host}:{port}"),
            active: true,
        };

        connection.post_connect(config).await?;

        Ok(connection)
    }

    async fn post_connect(&mut self, config: &Config) -> Result<()> {
        let mut hello = cmd("HELLO").arg(3);

        if let Some(password) = &config.password {
            let username = config
                .username
                .clone()
                .unwrap_or_else(|| "default".to_owned());
            hello = hello.arg("AUTH").arg(username).arg(password.clone());
        }

        self.send(&hello).await?;

        if config.database != 0 {
            self.send(&cmd("SELECT").arg(config.database as i64)).await?;
        }

        Ok(())
    }

    /// Sends a command and awaits its single reply. Blocking request/response, matching
    /// the probe connection's only usage pattern: one command, one answer, no pipelining.
    pub(crate) async fn send(&mut self, command: &Command) -> Result<Value> {
        if log_enabled!(Level::Debug) {
            debug!("[{}] sending {command}", self.tag);
        }

        let write_result = match &mut self.streams {
            Streams::Tcp(_, framed_write) => framed_write.send(command).await,
            #[cfg(feature = "tls")]
            Streams::TcpTls(_, framed_write) => framed_write.send(command).await,
        };

        if let Err(e) = write_result {
            self.active = false;
            return Err(e);
        }

        let next = match &mut self.streams {
            Streams::Tcp(framed_read, _) => framed_read.next().await,
            #[cfg(feature = "tls")]
            Streams::TcpTls(framed_read, _) => framed_read.next().await,
        };

        match next {
            Some(Ok(value)) => Ok(value),
            Some(Err(e)) => {
                self.active = false;
                Err(e)
            }
            None => {
                self.active = false;
                Err(Error::Client(format!("[{}] disconnected by peer", self.tag)))
            }
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    /// Closes the underlying socket. The probe connection cache never reuses a connection
    /// after this, so there is nothing to await beyond letting the streams drop.
    pub(crate) async fn close_async(self) {
        debug!("[{}] closing", self.tag);
    }
}
