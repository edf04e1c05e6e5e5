use super::BeaconForwarder;
use crate::registry::DescriptorRegistry;
use crate::thread_manager::SteppableTask;
use crate::types::Beacon;

const RECEIVE_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(100);

/// Feeds parsed beacons, paired with any known descriptor, to a forwarder.
/// Stops the forwarder when the task ends.
pub struct ForwarderTask<F: BeaconForwarder> {
    forwarder: std::sync::Arc<F>,
    registry: DescriptorRegistry,
    receiver: crossbeam_channel::Receiver<Beacon>,
}

impl<F: BeaconForwarder> ForwarderTask<F> {
    #[must_use]
    pub fn new(
        forwarder: std::sync::Arc<F>,
        registry: DescriptorRegistry,
        beacon_receiver: crossbeam_channel::Receiver<Beacon>,
    ) -> Self {
        ForwarderTask {
            forwarder,
            registry,
            receiver: beacon_receiver,
        }
    }
}

impl<F: BeaconForwarder> SteppableTask for ForwarderTask<F> {
    fn step(&mut self) -> bool {
        match self.receiver.recv_timeout(RECEIVE_TIMEOUT) {
            Ok(beacon) => {
                let descriptor = self.registry.lookup(beacon.address);
                self.forwarder.on_beacon(&beacon, descriptor);
                true
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => true,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                log::info!("ForwarderTask: beacon source disconnected");
                false
            }
        }
    }

    fn finish(&mut self) {
        self.forwarder.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::ForwarderTask;
    use crate::forwarder::encoder::tests::scenario_beacon;
    use crate::forwarder::BeaconForwarder;
    use crate::registry::DescriptorRegistry;
    use crate::thread_manager::SteppableTask;
    use crate::types::{Beacon, Descriptor};

    #[derive(Default)]
    struct RecordingForwarder {
        beacons: std::sync::Mutex<Vec<(String, Option<Descriptor>)>>,
        stopped: std::sync::atomic::AtomicBool,
    }

    impl BeaconForwarder for RecordingForwarder {
        fn name(&self) -> &'static str {
            "recording"
        }
        fn version(&self) -> &'static str {
            "0"
        }
        fn description(&self) -> &'static str {
            "records beacons"
        }
        fn start(&self) {}
        fn stop(&self) {
            self.stopped
                .store(true, std::sync::atomic::Ordering::SeqCst);
        }
        fn on_beacon(&self, beacon: &Beacon, descriptor: Option<&Descriptor>) {
            self.beacons
                .lock()
                .unwrap()
                .push((beacon.callsign.clone(), descriptor.cloned()));
        }
    }

    #[test]
    fn when_beacon_arrives_then_it_is_forwarded_without_unknown_descriptor() {
        let forwarder = std::sync::Arc::new(RecordingForwarder::default());
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut task = ForwarderTask::new(forwarder.clone(), DescriptorRegistry::empty(), receiver);

        sender.send(scenario_beacon()).unwrap();
        assert!(task.step());

        let beacons = forwarder.beacons.lock().unwrap();
        assert_eq!(beacons.len(), 1);
        assert_eq!(beacons[0], (String::from("FLR3E1A07"), None));
    }

    #[test]
    fn when_address_is_registered_then_descriptor_is_attached() {
        let forwarder = std::sync::Arc::new(RecordingForwarder::default());
        let beacon = scenario_beacon();
        let descriptor = Descriptor {
            registration: String::from("D-EABC"),
            model: String::from("Robin DR400"),
            competition_number: String::new(),
            owner: String::new(),
            home_base: String::new(),
            tracked: true,
            identified: true,
        };
        let mut registry = DescriptorRegistry::empty();
        registry.insert(beacon.address, descriptor.clone());
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut task = ForwarderTask::new(forwarder.clone(), registry, receiver);

        sender.send(beacon).unwrap();
        assert!(task.step());

        let beacons = forwarder.beacons.lock().unwrap();
        assert_eq!(beacons[0].1, Some(descriptor));
    }

    #[test]
    fn when_no_beacon_arrives_then_step_keeps_task_alive() {
        let forwarder = std::sync::Arc::new(RecordingForwarder::default());
        let (_sender, receiver) = crossbeam_channel::unbounded::<Beacon>();
        let mut task = ForwarderTask::new(forwarder.clone(), DescriptorRegistry::empty(), receiver);

        assert!(task.step());
        assert!(forwarder.beacons.lock().unwrap().is_empty());
    }

    #[test]
    fn when_source_disconnects_then_task_ends_and_finish_stops_forwarder() {
        let forwarder = std::sync::Arc::new(RecordingForwarder::default());
        let (sender, receiver) = crossbeam_channel::unbounded::<Beacon>();
        let mut task = ForwarderTask::new(forwarder.clone(), DescriptorRegistry::empty(), receiver);

        drop(sender);
        assert!(!task.step());
        task.finish();

        assert!(forwarder
            .stopped
            .load(std::sync::atomic::Ordering::SeqCst));
    }
}
