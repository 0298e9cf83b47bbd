mod logging;

use std::io::{self, ErrorKind, Read};
use std::process::ExitCode;

use bytes::Bytes;
use clap::Parser;
use tracing::warn;

use bytestitch::{FrameConfig, PacketSink, Receiver};

use crate::logging::{init_logging, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "bytestitch",
    version,
    about = "Reassemble packets from a fragmented byte stream on stdin"
)]
struct Cli {
    /// Read size for each stdin chunk.
    #[arg(long, value_name = "BYTES", default_value_t = 4096)]
    chunk_size: usize,

    /// Reject binary frames declaring more than this many payload bytes.
    #[arg(long, value_name = "BYTES")]
    max_binary_payload: Option<usize>,

    /// Reject text frames accumulating more than this many payload bytes.
    #[arg(long, value_name = "BYTES")]
    max_text_payload: Option<usize>,

    /// Exit on the first framing error instead of resynchronizing.
    #[arg(long)]
    strict: bool,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,
}

/// Prints each completed packet to stdout, one line per packet.
#[derive(Debug, Default)]
struct PrintSink;

impl PacketSink for PrintSink {
    fn on_binary_packet(&mut self, payload: Bytes) {
        println!("binary packet ({} bytes): {}", payload.len(), hex(&payload));
    }

    fn on_text_packet(&mut self, payload: Bytes) {
        println!(
            "text packet ({} bytes): {}",
            payload.len(),
            String::from_utf8_lossy(&payload)
        );
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> io::Result<()> {
    let config = FrameConfig {
        max_binary_payload: cli.max_binary_payload,
        max_text_payload: cli.max_text_payload,
    };
    let mut receiver = Receiver::with_config(PrintSink, config);

    let mut stdin = io::stdin().lock();
    let mut buf = vec![0u8; cli.chunk_size.max(1)];
    loop {
        let read = match stdin.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };

        if let Err(err) = receiver.receive(&buf[..read]) {
            if cli.strict {
                return Err(io::Error::new(ErrorKind::InvalidData, err));
            }
            warn!(error = %err, "framing error, resynchronizing");
        }
    }

    if !receiver.is_idle() {
        warn!(frame = ?receiver.active_frame(), "stream ended mid-frame");
    }
    Ok(())
}
