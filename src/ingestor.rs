use crate::config::GliderNetConfig;
use crate::thread_manager::SteppableTask;

use std::io::{BufRead, Write};

/// Reads the OGN APRS feed over TCP and forwards each data line.
pub struct Ingestor {
    reader: std::io::BufReader<std::net::TcpStream>,
    sender: crossbeam_channel::Sender<String>,
    recorder: Option<std::io::BufWriter<std::fs::File>>,
}
impl Ingestor {
    pub fn new(
        config: &GliderNetConfig,
        sender: crossbeam_channel::Sender<String>,
    ) -> Result<Self, std::io::Error> {
        let login = format!(
            "user N0CALL pass -1 vers {0} {1} filter {2} \r\n",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            config.filter
        );
        log::info!("Connecting to {0}:{1}.", config.host, config.port);
        let mut stream =
            std::net::TcpStream::connect(format!("{0}:{1}", config.host, config.port))?;
        stream.write_all(login.as_bytes())?;
        log::info!("Connection successful.");
        let reader = std::io::BufReader::new(stream);
        Ok(Ingestor {
            reader,
            sender,
            recorder: None,
        })
    }

    /// Appends every raw line received to `path`.
    pub fn record_to(mut self, path: &std::path::Path) -> Result<Self, std::io::Error> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        log::info!("Recording input stream to '{}'.", path.display());
        self.recorder = Some(std::io::BufWriter::new(file));
        Ok(self)
    }
}

impl SteppableTask for Ingestor {
    fn step(&mut self) -> bool {
        let mut line_buffer = String::new();

        let bytes_read = match self.reader.read_line(&mut line_buffer) {
            Ok(bytes_read) => bytes_read,
            Err(err) => {
                log::error!("Failed to read line from source: {err}");
                return false;
            }
        };

        if bytes_read == 0 {
            log::error!("End of TCP stream");
            return false;
        }
        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(err) = recorder.write_all(line_buffer.as_bytes()) {
                log::warn!("Ingestor: failed to record line, recording stopped: {err}");
                self.recorder = None;
            }
        }
        forward_line(&self.sender, &line_buffer)
    }

    fn finish(&mut self) {
        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(err) = recorder.flush() {
                log::warn!("Ingestor: failed to flush recording: {err}");
            }
        }
    }
}

/// Replays a previously recorded APRS stream from a file.
pub struct ReplayIngestor {
    reader: std::io::BufReader<std::fs::File>,
    sender: crossbeam_channel::Sender<String>,
}
impl ReplayIngestor {
    pub fn open(
        path: &std::path::Path,
        sender: crossbeam_channel::Sender<String>,
    ) -> Result<Self, std::io::Error> {
        let file = std::fs::File::open(path)?;
        log::info!("Replaying input stream from '{}'.", path.display());
        Ok(ReplayIngestor {
            reader: std::io::BufReader::new(file),
            sender,
        })
    }
}

impl SteppableTask for ReplayIngestor {
    fn step(&mut self) -> bool {
        let mut line_buffer = String::new();
        match self.reader.read_line(&mut line_buffer) {
            Ok(0) => {
                log::info!("End of replay file");
                false
            }
            Ok(_) => forward_line(&self.sender, &line_buffer),
            Err(err) => {
                log::error!("Failed to read replay file: {err}");
                false
            }
        }
    }
}

// Server comments start with '#'.
fn forward_line(sender: &crossbeam_channel::Sender<String>, line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return true;
    }
    if let Err(err) = sender.send(line.to_string()) {
        log::error!("Ingestor: Failed to send to channel: {err}");
        return false;
    }
    true
}
