use clap::Parser;
use fr24_forwarder::cli::Cli;
use fr24_forwarder::config::ApplicationConfig;
use fr24_forwarder::forwarder::task::ForwarderTask;
use fr24_forwarder::forwarder::{BeaconForwarder, Fr24Forwarder};
use fr24_forwarder::ingestor::{Ingestor, ReplayIngestor};
use fr24_forwarder::logging::setup_logging;
use fr24_forwarder::parser::BeaconParser;
use fr24_forwarder::registry::DescriptorRegistry;
use fr24_forwarder::thread_manager::ThreadManager;
use fr24_forwarder::types::Beacon;
use log::info;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.logging_level);

    let application_config = ApplicationConfig::construct_from_path(&cli.config_file)
        .unwrap_or_else(|e| {
            log::error!("{e}");
            std::process::exit(1);
        });

    let registry = match &application_config.descriptors {
        Some(descriptors) => DescriptorRegistry::load_from_path(&descriptors.path)
            .unwrap_or_else(|e| {
                log::error!("{e}");
                std::process::exit(1);
            }),
        None => DescriptorRegistry::empty(),
    };

    let forwarder = std::sync::Arc::new(Fr24Forwarder::new(&application_config.forwarder));
    info!(
        "Main: {} {} - {}",
        forwarder.name(),
        forwarder.version(),
        forwarder.description()
    );
    forwarder.start();

    let (messages_sender, messages_receiver): (
        crossbeam_channel::Sender<String>,
        crossbeam_channel::Receiver<String>,
    ) = crossbeam_channel::unbounded();

    let (beacon_sender, beacon_receiver): (
        crossbeam_channel::Sender<Beacon>,
        crossbeam_channel::Receiver<Beacon>,
    ) = crossbeam_channel::unbounded();

    let mut thread_manager = ThreadManager::new();

    let source_started = match &cli.ingestor.read_input_data_stream {
        Some(path) => ReplayIngestor::open(path, messages_sender).and_then(|replay| {
            thread_manager.add_task("replay", replay, std::time::Duration::ZERO)
        }),
        None => Ingestor::new(&application_config.glidernet, messages_sender)
            .and_then(|ingestor| match &cli.ingestor.log_input_data_stream {
                Some(path) => ingestor.record_to(path),
                None => Ok(ingestor),
            })
            .and_then(|ingestor| {
                thread_manager.add_task("ingestor", ingestor, std::time::Duration::ZERO)
            }),
    };
    if let Err(e) = source_started {
        log::error!("Main: could not start beacon source: {e}");
        forwarder.stop();
        std::process::exit(1);
    }

    let parser = BeaconParser::new(messages_receiver, beacon_sender);
    let forwarder_task = ForwarderTask::new(forwarder.clone(), registry, beacon_receiver);

    let started = thread_manager
        .add_task("parser", parser, std::time::Duration::ZERO)
        .and_then(|_| {
            thread_manager.add_task("forwarder", forwarder_task, std::time::Duration::ZERO)
        });
    let forwarder_task_id = match started {
        Ok(id) => id,
        Err(e) => {
            log::error!("Main: could not spawn task: {e}");
            forwarder.stop();
            std::process::exit(1);
        }
    };

    if let Some(duration) = cli.duration {
        std::thread::sleep(std::time::Duration::from_secs(duration));
        thread_manager.stop_all_tasks();
    }

    thread_manager.wait_on_task_finish(forwarder_task_id);

    info!("Main: Program finished, {}.", forwarder.stats().snapshot());
}
