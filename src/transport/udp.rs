//! UDP transport over a tokio socket.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio_util::udp::UdpFramed;
use tracing::{debug, instrument, warn};

use crate::config::{TransportConfig, MAX_UDP_PAYLOAD};
use crate::error::{constants, NetError, Result};
use crate::registry::Registry;
use crate::transport::{Address, BufferCodec, Datagram};
use crate::utils::metrics::{Timer, TransportMetrics};
use crate::utils::timeout::maybe_timeout;

/// A bound UDP socket, optionally connected to a default peer
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    peer: Option<Address>,
    max_datagram_size: usize,
    recv_timeout: Option<Duration>,
    metrics: Arc<TransportMetrics>,
}

impl UdpTransport {
    /// Bind a socket to `addr`
    #[instrument(skip(addr), fields(addr = %addr))]
    pub async fn bind(addr: &Address) -> Result<Self> {
        let socket = UdpSocket::bind(addr.resolve().await?).await?;
        debug!(local = ?socket.local_addr().ok(), "Bound UDP socket");
        Ok(Self {
            socket,
            peer: None,
            max_datagram_size: MAX_UDP_PAYLOAD,
            recv_timeout: None,
            metrics: Arc::new(TransportMetrics::new()),
        })
    }

    /// Bind, and connect when a peer is configured
    #[instrument(skip(config), fields(bind = %config.bind_address))]
    pub async fn from_config(config: &TransportConfig) -> Result<Self> {
        let bind: Address = config.bind_address.parse()?;
        let mut transport = Self::bind(&bind).await?;
        transport.set_max_datagram_size(config.max_datagram_size);
        transport.recv_timeout = config.recv_timeout;
        if let Some(ref peer) = config.peer_address {
            transport.connect(&peer.parse()?).await?;
        }
        Ok(transport)
    }

    /// Set the default peer for [`UdpTransport::send`] and restrict receiving to it
    #[instrument(skip(self, peer), fields(peer = %peer))]
    pub async fn connect(&mut self, peer: &Address) -> Result<()> {
        self.socket.connect(peer.resolve().await?).await?;
        self.peer = Some(peer.clone());
        debug!("Connected UDP socket");
        Ok(())
    }

    pub fn local_address(&self) -> Result<Address> {
        Ok(self.socket.local_addr()?.into())
    }

    pub fn peer_address(&self) -> Option<&Address> {
        self.peer.as_ref()
    }

    pub fn max_datagram_size(&self) -> usize {
        self.max_datagram_size
    }

    pub fn set_max_datagram_size(&mut self, size: usize) {
        self.max_datagram_size = size.clamp(1, MAX_UDP_PAYLOAD);
    }

    pub fn recv_timeout(&self) -> Option<Duration> {
        self.recv_timeout
    }

    pub fn set_recv_timeout(&mut self, timeout: Option<Duration>) {
        self.recv_timeout = timeout;
    }

    pub fn metrics(&self) -> Arc<TransportMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Send to the connected peer
    #[instrument(skip(self, payload), fields(len = payload.len()))]
    pub async fn send(&self, payload: &[u8]) -> Result<usize> {
        if self.peer.is_none() {
            return Err(NetError::TransportError(constants::ERR_NOT_CONNECTED.to_string()));
        }
        let sent = self.socket.send(payload).await.inspect_err(|_| self.metrics.send_error())?;
        self.metrics.datagram_sent(sent as u64);
        Ok(sent)
    }

    /// Send to an explicit destination
    #[instrument(skip(self, payload, dst), fields(len = payload.len(), dst = %dst))]
    pub async fn send_to(&self, payload: &[u8], dst: &Address) -> Result<usize> {
        let target = dst.resolve().await?;
        let sent = self
            .socket
            .send_to(payload, target)
            .await
            .inspect_err(|_| self.metrics.send_error())?;
        self.metrics.datagram_sent(sent as u64);
        Ok(sent)
    }

    /// Send to the datagram's destination, or the connected peer without one
    pub async fn send_datagram(&self, datagram: &Datagram) -> Result<usize> {
        match (&datagram.dst, &self.peer) {
            (Some(dst), _) => self.send_to(&datagram.payload, dst).await,
            (None, Some(_)) => self.send(&datagram.payload).await,
            (None, None) => Err(NetError::TransportError(
                constants::ERR_NO_DESTINATION.to_string(),
            )),
        }
    }

    /// Receive one datagram.
    ///
    /// `src` is the sender and `dst` this socket's local address. Payloads
    /// longer than the configured maximum are truncated.
    #[instrument(skip(self))]
    pub async fn recv(&self) -> Result<Datagram> {
        let _timer = Timer::start("udp_recv");
        // one spare byte detects truncation
        let mut buf = vec![0u8; self.max_datagram_size.saturating_add(1)];
        let received = maybe_timeout(self.recv_timeout, async {
            Ok::<_, NetError>(self.socket.recv_from(&mut buf).await?)
        })
        .await;
        let (len, src) = received.inspect_err(|_| self.metrics.recv_error())?;

        let mut len = len;
        if len > self.max_datagram_size {
            warn!(len, max = self.max_datagram_size, "Truncating oversized datagram");
            self.metrics.datagram_truncated();
            len = self.max_datagram_size;
        }
        buf.truncate(len);
        self.metrics.datagram_received(len as u64);

        let mut datagram = Datagram::new(buf).with_src(src.into());
        if let Ok(local) = self.socket.local_addr() {
            datagram = datagram.with_dst(local.into());
        }
        Ok(datagram)
    }

    /// Hand the socket to a `UdpFramed` that yields one buffer per datagram
    pub fn into_framed(self, registry: Registry) -> UdpFramed<BufferCodec> {
        UdpFramed::new(self.socket, BufferCodec::new(registry))
    }

    pub fn into_socket(self) -> UdpSocket {
        self.socket
    }
}
