//! UDP receive loop for hub broadcasts.
//!
//! The hub broadcasts one JSON message per datagram on port 50222. The
//! listener reads datagrams one at a time and hands each one to a
//! [`WeatherFlow`] decoder inline, so no two messages are processed
//! concurrently. Decode failures are counted and logged, never propagated.

use std::{
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::{error::DecodeError, Kind, WeatherFlow};

/// Port the hub broadcasts on.
pub const WEATHERFLOW_UDP_PORT: u16 = 50222;

/// Default receive buffer size. Hub messages are well under this.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 1024;

/// Environment variable overriding the bind address.
pub const BIND_ADDR_ENV: &str = "TEMPEST_BIND_ADDR";

/// Environment variable overriding the port.
pub const PORT_ENV: &str = "TEMPEST_PORT";

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Datagrams longer than this are truncated and will fail to parse.
    pub max_datagram_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: WEATHERFLOW_UDP_PORT,
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
        }
    }
}

impl ListenerConfig {
    /// Builds a config from `TEMPEST_BIND_ADDR` and `TEMPEST_PORT`.
    ///
    /// Unset or unparseable variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup(BIND_ADDR_ENV)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.bind_addr),
            port: lookup(PORT_ENV)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            max_datagram_size: defaults.max_datagram_size,
        }
    }

    /// Returns the socket address to bind.
    #[inline]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

/// Errors raised by the socket, as opposed to the messages on it.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// The socket could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Reading from the socket failed.
    #[error("Socket error: {0}")]
    Io(#[from] io::Error),
}

/// Running counters of datagram outcomes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListenerStats {
    pub received: u64,
    pub decoded: u64,
    pub malformed: u64,
    pub unknown: u64,
}

impl ListenerStats {
    fn record(&mut self, outcome: &Result<Kind, DecodeError>) {
        self.received += 1;
        match outcome {
            Ok(_) => self.decoded += 1,
            Err(DecodeError::Malformed(_)) => self.malformed += 1,
            Err(DecodeError::UnknownKind { .. }) => self.unknown += 1,
        }
    }
}

/// A bound UDP socket that feeds datagrams to a decoder.
#[derive(Debug)]
pub struct UdpListener {
    socket: UdpSocket,
    buffer: Vec<u8>,
    stats: ListenerStats,
}

impl UdpListener {
    /// Binds the socket described by `config`.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let addr = config.socket_addr();
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| ListenerError::Bind { addr, source })?;
        info!(%addr, "listening for hub broadcasts");

        Ok(Self {
            socket,
            buffer: vec![0; config.max_datagram_size.max(1)],
            stats: ListenerStats::default(),
        })
    }

    /// Returns the address the socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ListenerError> {
        Ok(self.socket.local_addr()?)
    }

    /// Returns the outcome counters so far.
    #[inline]
    pub fn stats(&self) -> ListenerStats {
        self.stats
    }

    /// Waits for one datagram and decodes it.
    ///
    /// The inner result is the decode outcome; the outer one is a socket
    /// failure.
    pub async fn receive(
        &mut self,
        decoder: &mut WeatherFlow,
    ) -> Result<Result<Kind, DecodeError>, ListenerError> {
        let (len, peer) = self.socket.recv_from(&mut self.buffer).await?;
        Ok(self.decode(len, peer, decoder))
    }

    /// Waits until datagrams arrive, then decodes every one already queued.
    ///
    /// Returns the number of datagrams processed, which is at least one.
    pub async fn drain(&mut self, decoder: &mut WeatherFlow) -> Result<usize, ListenerError> {
        loop {
            self.socket.readable().await?;

            let mut processed = 0;
            loop {
                match self.socket.try_recv_from(&mut self.buffer) {
                    Ok((len, peer)) => {
                        let _ = self.decode(len, peer, decoder);
                        processed += 1;
                    }
                    Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                    Err(err) => return Err(err.into()),
                }
            }

            if processed > 0 {
                return Ok(processed);
            }
        }
    }

    /// Decodes datagrams until the socket fails.
    pub async fn run(&mut self, decoder: &mut WeatherFlow) -> Result<(), ListenerError> {
        loop {
            let _ = self.receive(decoder).await?;
        }
    }

    fn decode(
        &mut self,
        len: usize,
        peer: SocketAddr,
        decoder: &mut WeatherFlow,
    ) -> Result<Kind, DecodeError> {
        let outcome = decoder.process_message(&self.buffer[..len]);
        if let Err(err) = &outcome {
            debug!(%peer, len, error = %err, "dropped datagram");
        }
        self.stats.record(&outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use tokio::time::timeout;

    use super::*;

    fn loopback() -> ListenerConfig {
        ListenerConfig {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            ..ListenerConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = ListenerConfig::default();
        assert_eq!(config.port, 50222);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:50222");
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> =
            [(BIND_ADDR_ENV, "127.0.0.1"), (PORT_ENV, " 50223 ")].into_iter().collect();
        let config = ListenerConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:50223");
    }

    #[test]
    fn test_config_ignores_bad_values() {
        let config = ListenerConfig::from_lookup(|name| match name {
            PORT_ENV => Some("not-a-port".to_string()),
            _ => Some("::nope".to_string()),
        });
        assert_eq!(config, ListenerConfig::default());
    }

    #[tokio::test]
    async fn test_receive_decodes_datagram() {
        let mut listener = UdpListener::bind(&loopback()).await.unwrap();
        let target = listener.local_addr().unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut decoder = WeatherFlow::new();

        sender
            .send_to(br#"{"type":"evt_strike","evt":[1493322445,27,3848]}"#, target)
            .await
            .unwrap();
        let outcome = timeout(Duration::from_secs(5), listener.receive(&mut decoder))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome.unwrap(), Kind::Lightning);

        sender.send_to(b"{\"type\":", target).await.unwrap();
        let outcome = timeout(Duration::from_secs(5), listener.receive(&mut decoder))
            .await
            .unwrap()
            .unwrap();
        assert!(outcome.unwrap_err().is_malformed());

        assert_eq!(
            listener.stats(),
            ListenerStats {
                received: 2,
                decoded: 1,
                malformed: 1,
                unknown: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_drain_processes_all_queued() {
        let mut listener = UdpListener::bind(&loopback()).await.unwrap();
        let target = listener.local_addr().unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut decoder = WeatherFlow::new();

        let datagrams: [&[u8]; 3] = [
            br#"{"type":"evt_precip","evt":[1]}"#,
            br#"{"type":"not_a_kind"}"#,
            br#"{"type":"hub_status","serial_number":"HB-1"}"#,
        ];
        for datagram in datagrams {
            sender.send_to(datagram, target).await.unwrap();
        }

        let mut total = 0;
        while total < datagrams.len() {
            total += timeout(Duration::from_secs(5), listener.drain(&mut decoder))
                .await
                .unwrap()
                .unwrap();
        }

        assert_eq!(total, 3);
        assert!(decoder.has_object(Kind::Rain));
        assert!(decoder.has_object(Kind::Hub));
        assert_eq!(listener.stats().unknown, 1);
    }

    #[tokio::test]
    async fn test_bind_conflict_reports_address() {
        let first = UdpListener::bind(&loopback()).await.unwrap();
        let taken = first.local_addr().unwrap();
        let config = ListenerConfig {
            bind_addr: taken.ip(),
            port: taken.port(),
            ..ListenerConfig::default()
        };

        match UdpListener::bind(&config).await {
            Err(ListenerError::Bind { addr, .. }) => assert_eq!(addr, taken),
            other => panic!("expected bind error, got {:?}", other),
        }
    }
}
