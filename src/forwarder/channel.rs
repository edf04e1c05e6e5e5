use super::encoder::EncodedRecord;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// UDP endpoint towards a single destination.
///
/// The socket lives inside an [`Endpoint`] value, so it is closed whenever
/// that value is dropped: on [`TransmissionChannel::close`], when the
/// channel itself is dropped, or when a step of [`TransmissionChannel::open`]
/// fails after the socket was created.
#[derive(Debug)]
pub struct TransmissionChannel {
    host: String,
    port: u16,
    endpoint: std::sync::RwLock<Option<Endpoint>>,
}

#[derive(Debug)]
struct Endpoint {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl TransmissionChannel {
    #[must_use]
    pub fn new(host: &str, port: u16) -> Self {
        TransmissionChannel {
            host: host.to_string(),
            port,
            endpoint: std::sync::RwLock::new(None),
        }
    }

    #[must_use]
    pub fn destination(&self) -> String {
        format!("{0}:{1}", self.host, self.port)
    }

    /// Resolves the destination and opens the socket. An already open
    /// endpoint is replaced.
    pub fn open(&self) -> Result<SocketAddr, ChannelError> {
        let destination = self.resolve()?;
        let endpoint = Endpoint::connect(destination)?;
        *self.write() = Some(endpoint);
        Ok(destination)
    }

    /// Closes the socket. Returns `false` if nothing was open.
    pub fn close(&self) -> bool {
        self.write().take().is_some()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.read().is_some()
    }

    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.read()
            .as_ref()
            .and_then(|endpoint| endpoint.socket.local_addr().ok())
    }

    /// Sends `record` as one datagram without waiting for it to leave.
    pub fn send(&self, record: &EncodedRecord) -> Result<usize, ChannelError> {
        let guard = self.read();
        let endpoint = guard.as_ref().ok_or(ChannelError::NotReady)?;
        endpoint
            .socket
            .send(record.as_bytes())
            .map_err(|error| classify_send_error(error, endpoint.destination))
    }

    fn resolve(&self) -> Result<SocketAddr, ChannelError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|error| ChannelError::Resolve {
                destination: self.destination(),
                source: error,
            })?
            .next()
            .ok_or_else(|| ChannelError::NoAddress {
                destination: self.destination(),
            })
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Endpoint>> {
        self.endpoint
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Endpoint>> {
        self.endpoint
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Endpoint {
    fn connect(destination: SocketAddr) -> Result<Self, ChannelError> {
        let local: SocketAddr = if destination.is_ipv4() {
            (std::net::Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).map_err(|error| ChannelError::Open { source: error })?;
        // Connected so that ICMP port-unreachable is reported on later sends.
        socket
            .connect(destination)
            .map_err(|error| ChannelError::Open { source: error })?;
        socket
            .set_nonblocking(true)
            .map_err(|error| ChannelError::Open { source: error })?;
        Ok(Endpoint {
            socket,
            destination,
        })
    }
}

fn classify_send_error(error: std::io::Error, destination: SocketAddr) -> ChannelError {
    match error.kind() {
        std::io::ErrorKind::ConnectionRefused => ChannelError::Unreachable {
            destination,
            source: error,
        },
        _ => ChannelError::Transport {
            destination,
            source: error,
        },
    }
}

#[derive(Debug)]
pub enum ChannelError {
    Resolve {
        destination: String,
        source: std::io::Error,
    },
    NoAddress {
        destination: String,
    },
    Open {
        source: std::io::Error,
    },
    NotReady,
    Unreachable {
        destination: SocketAddr,
        source: std::io::Error,
    },
    Transport {
        destination: SocketAddr,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelError::Resolve {
                destination,
                source,
            } => write!(f, "Failed to resolve '{destination}': {source}"),
            ChannelError::NoAddress { destination } => {
                write!(f, "'{destination}' resolved to no address")
            }
            ChannelError::Open { source } => write!(f, "Failed to open UDP socket: {source}"),
            ChannelError::NotReady => write!(f, "Channel not ready"),
            ChannelError::Unreachable {
                destination,
                source,
            } => write!(f, "{destination} is not listening: {source}"),
            ChannelError::Transport {
                destination,
                source,
            } => write!(f, "Failed to send to {destination}: {source}"),
        }
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChannelError::Resolve { source, .. }
            | ChannelError::Open { source }
            | ChannelError::Unreachable { source, .. }
            | ChannelError::Transport { source, .. } => Some(source),
            ChannelError::NoAddress { .. } | ChannelError::NotReady => None,
        }
    }
}
