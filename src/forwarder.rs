pub mod cache;
pub mod channel;
pub mod codec;
pub mod encoder;
pub mod stats;
pub mod task;

use crate::config::ForwarderConfig;
use crate::types::{Beacon, Descriptor};
use cache::DescriptorCache;
use channel::{ChannelError, TransmissionChannel};
use stats::ForwarderStats;

const NAME: &str = "FR24 forwarder";
const DESCRIPTION: &str = "relays OGN aircraft beacons to FlightRadar24 system";

/// A sink for OGN aircraft beacons managed by a host.
///
/// `start` and `stop` must never panic: a forwarder that cannot start stays
/// inert and keeps absorbing beacons.
pub trait BeaconForwarder: Send + Sync + 'static {
    fn name(&self) -> &'static str;
    fn version(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn start(&self);
    fn stop(&self);
    fn on_beacon(&self, beacon: &Beacon, descriptor: Option<&Descriptor>);
}

pub trait Clock: Send + Sync {
    /// Unix time in seconds.
    fn now_seconds(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_seconds(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_seconds(&self) -> i64 {
        self.0
    }
}

pub struct Fr24Forwarder {
    channel: TransmissionChannel,
    descriptors: DescriptorCache,
    clock: Box<dyn Clock>,
    stats: ForwarderStats,
}

impl Fr24Forwarder {
    #[must_use]
    pub fn new(config: &ForwarderConfig) -> Self {
        Fr24Forwarder::with_clock(config, Box::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(config: &ForwarderConfig, clock: Box<dyn Clock>) -> Self {
        Fr24Forwarder {
            channel: TransmissionChannel::new(&config.host, config.port),
            descriptors: DescriptorCache::new(),
            clock,
            stats: ForwarderStats::default(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> &ForwarderStats {
        &self.stats
    }

    #[must_use]
    pub fn descriptors(&self) -> &DescriptorCache {
        &self.descriptors
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.channel.is_ready()
    }

    /// Encodes and sends one beacon, returning the number of bytes sent.
    pub fn forward(
        &self,
        beacon: &Beacon,
        descriptor: Option<&Descriptor>,
    ) -> Result<usize, ChannelError> {
        let send_descriptor = match descriptor {
            Some(descriptor) => {
                let changed = self.descriptors.should_send(descriptor);
                if changed {
                    log::debug!(
                        "Descriptor for {} ({}) is new or changed",
                        descriptor.registration,
                        beacon.address
                    );
                    self.stats.descriptor_update();
                }
                changed
            }
            None => false,
        };

        let record = encoder::encode(beacon, send_descriptor, self.clock.now_seconds());
        log::trace!("Sending {} to FR24: {}", beacon.callsign, record.fields());

        self.channel.send(&record)
    }
}

impl std::fmt::Debug for Fr24Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fr24Forwarder")
            .field("destination", &self.channel.destination())
            .field("ready", &self.channel.is_ready())
            .field("descriptors", &self.descriptors.len())
            .finish_non_exhaustive()
    }
}

impl BeaconForwarder for Fr24Forwarder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn start(&self) {
        match self.channel.open() {
            Ok(address) => log::info!(
                "{NAME}: sending to {} ({address})",
                self.channel.destination()
            ),
            Err(err) => log::error!("{NAME}: could not connect to FR24 server: {err}"),
        }
    }

    fn stop(&self) {
        if self.channel.close() {
            log::info!("{NAME}: stopped, {}", self.stats.snapshot());
        }
    }

    fn on_beacon(&self, beacon: &Beacon, descriptor: Option<&Descriptor>) {
        match self.forward(beacon, descriptor) {
            Ok(bytes) => {
                self.stats.record_sent();
                log::debug!("Data sent to FR24 ({bytes} bytes)");
            }
            Err(ChannelError::NotReady) => {
                self.stats.not_ready_drop();
                log::warn!(
                    "{NAME}: dropping beacon from {}: channel not ready",
                    beacon.callsign
                );
            }
            Err(err @ ChannelError::Unreachable { .. }) => {
                self.stats.transport_failure();
                log::error!("FR24 is not listening: {err}");
            }
            Err(err) => {
                self.stats.transport_failure();
                log::error!("Could not send beacon to FR24: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BeaconForwarder, FixedClock, Fr24Forwarder};
    use crate::config::ForwarderConfig;
    use crate::forwarder::encoder::{tests::scenario_beacon, RECORD_LENGTH};
    use crate::types::Descriptor;

    fn receiver_and_forwarder() -> (std::net::UdpSocket, Fr24Forwarder) {
        let receiver = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(std::time::Duration::from_secs(2)))
            .unwrap();
        let config = ForwarderConfig {
            host: String::from("127.0.0.1"),
            port: receiver.local_addr().unwrap().port(),
        };
        let forwarder = Fr24Forwarder::with_clock(&config, Box::new(FixedClock(1_700_000_000)));
        (receiver, forwarder)
    }

    fn descriptor() -> Descriptor {
        Descriptor {
            registration: String::from("D-EABC"),
            model: String::from("Robin DR400"),
            competition_number: String::new(),
            owner: String::new(),
            home_base: String::new(),
            tracked: true,
            identified: true,
        }
    }

    fn receive(receiver: &std::net::UdpSocket) -> Vec<u8> {
        let mut buffer = [0u8; 64];
        let length = receiver.recv(&mut buffer).unwrap();
        buffer[..length].to_vec()
    }

    #[test]
    fn when_beacon_has_no_descriptor_then_cache_untouched_and_full_record_sent() {
        let (receiver, forwarder) = receiver_and_forwarder();
        forwarder.start();

        forwarder.on_beacon(&scenario_beacon(), None);

        let datagram = receive(&receiver);
        assert_eq!(datagram.len(), RECORD_LENGTH);
        assert_eq!(datagram[4..8], [0x00, 0xF1, 0x53, 0x65]);
        assert!(forwarder.descriptors().is_empty());
        assert_eq!(forwarder.stats().snapshot().records_sent, 1);
    }

    #[test]
    fn when_same_descriptor_repeats_then_only_first_counts_as_update() {
        let (receiver, forwarder) = receiver_and_forwarder();
        forwarder.start();
        let beacon = scenario_beacon();
        let descriptor = descriptor();

        forwarder.on_beacon(&beacon, Some(&descriptor));
        forwarder.on_beacon(&beacon, Some(&descriptor));

        let first = receive(&receiver);
        let second = receive(&receiver);
        assert_eq!(first, second);

        let stats = forwarder.stats().snapshot();
        assert_eq!(stats.records_sent, 2);
        assert_eq!(stats.descriptor_updates, 1);
        assert_eq!(forwarder.descriptors().len(), 1);
    }

    #[test]
    fn when_descriptor_present_then_record_matches_descriptorless_record() {
        let (receiver, forwarder) = receiver_and_forwarder();
        forwarder.start();
        let beacon = scenario_beacon();

        forwarder.on_beacon(&beacon, Some(&descriptor()));
        forwarder.on_beacon(&beacon, None);

        assert_eq!(receive(&receiver), receive(&receiver));
    }

    #[test]
    fn when_never_started_then_beacons_are_absorbed_and_counted() {
        let (_receiver, forwarder) = receiver_and_forwarder();

        forwarder.on_beacon(&scenario_beacon(), Some(&descriptor()));
        forwarder.on_beacon(&scenario_beacon(), None);

        let stats = forwarder.stats().snapshot();
        assert_eq!(stats.records_sent, 0);
        assert_eq!(stats.not_ready_drops, 2);
        // The cache decision is still taken while the channel is down.
        assert_eq!(stats.descriptor_updates, 1);
    }

    #[test]
    fn when_start_fails_then_forwarder_stays_inert_and_stop_is_safe() {
        let config = ForwarderConfig {
            host: String::from("host.invalid"),
            port: 15099,
        };
        let forwarder = Fr24Forwarder::with_clock(&config, Box::new(FixedClock(0)));

        forwarder.start();
        assert!(!forwarder.is_ready());
        forwarder.on_beacon(&scenario_beacon(), None);
        forwarder.stop();
        forwarder.stop();

        assert_eq!(forwarder.stats().snapshot().not_ready_drops, 1);
    }

    #[test]
    fn when_stopped_then_later_beacons_are_dropped() {
        let (_receiver, forwarder) = receiver_and_forwarder();
        forwarder.start();
        assert!(forwarder.is_ready());

        forwarder.stop();
        forwarder.on_beacon(&scenario_beacon(), None);

        assert!(!forwarder.is_ready());
        assert_eq!(forwarder.stats().snapshot().not_ready_drops, 1);
    }

    #[test]
    fn when_destination_port_is_closed_then_failures_are_counted_and_channel_stays_ready() {
        let closed_port = std::net::UdpSocket::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = ForwarderConfig {
            host: String::from("127.0.0.1"),
            port: closed_port,
        };
        let forwarder = Fr24Forwarder::with_clock(&config, Box::new(FixedClock(1_700_000_000)));
        forwarder.start();

        let calls = 6;
        for _ in 0..calls {
            forwarder.on_beacon(&scenario_beacon(), None);
            std::thread::sleep(std::time::Duration::from_millis(20));
        }

        let stats = forwarder.stats().snapshot();
        assert!(stats.transport_failures >= 1, "{stats}");
        assert!(forwarder.is_ready());
        assert_eq!(stats.records_sent + stats.transport_failures, calls);
        assert_eq!(stats.not_ready_drops, 0);
    }

    #[test]
    fn when_asked_for_metadata_then_static_strings_are_returned() {
        let (_receiver, forwarder) = receiver_and_forwarder();
        assert_eq!(forwarder.name(), "FR24 forwarder");
        assert_eq!(forwarder.version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(
            forwarder.description(),
            "relays OGN aircraft beacons to FlightRadar24 system"
        );
    }
}
