use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Stop after this many seconds instead of running until the feed ends.
    #[arg(long)]
    pub duration: Option<u64>,

    #[command(flatten)]
    pub ingestor: IngestorArgs,

    #[arg(short, long, default_value_t = log::LevelFilter::Info)]
    pub logging_level: log::LevelFilter,

    #[arg(long)]
    pub config_file: std::path::PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct IngestorArgs {
    /// Append every raw APRS line received to this file.
    #[arg(long, default_value = None)]
    pub log_input_data_stream: Option<std::path::PathBuf>,

    /// Replay APRS lines from this file instead of connecting to the network.
    #[arg(long, default_value = None, conflicts_with = "log_input_data_stream")]
    pub read_input_data_stream: Option<std::path::PathBuf>,
}
