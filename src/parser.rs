pub mod builder;
mod constants;
pub mod types;

use crate::parser::builder::build_beacon_from_string;
use crate::thread_manager::SteppableTask;
use crate::types::Beacon;

pub struct BeaconParser {
    receiver: crossbeam_channel::Receiver<String>,
    sender: crossbeam_channel::Sender<Beacon>,
}
impl BeaconParser {
    #[must_use]
    pub fn new(
        messages_receiver: crossbeam_channel::Receiver<String>,
        beacon_sender: crossbeam_channel::Sender<Beacon>,
    ) -> Self {
        BeaconParser {
            receiver: messages_receiver,
            sender: beacon_sender,
        }
    }
}

impl SteppableTask for BeaconParser {
    fn step(&mut self) -> bool {
        let Ok(message_string) = self.receiver.recv() else {
            log::info!("BeaconParser: upstream disconnected");
            return false;
        };

        match build_beacon_from_string(&message_string) {
            Ok(beacon) => {
                if let Err(err) = self.sender.send(beacon) {
                    log::error!("BeaconParser: failed to forward beacon: {err}");
                    return false;
                }
            }
            Err(err) => log::debug!("Discarding line ({err}): {message_string}"),
        }

        true
    }
}
