//! Ring log demo
//!
//! Appends every stdin line to a log device, then prints what the log
//! retained. Lines are taken as raw bytes, split at the configured
//! terminator. Usage: `ringlog_demo [config.json]`

use std::io;
use std::sync::Arc;

use embedded_io_async::{Read, Write};
use ringlog::{LogConfig, LogDevice, LogFile};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Copy `input` into the log, one record per terminated line
async fn ingest<R>(mut input: R, mut file: LogFile, terminator: u8) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut record = Vec::new();
    loop {
        record.clear();
        match input.read_until(terminator, &mut record).await {
            Ok(0) => return Ok(()),
            Ok(_) => {}
            Err(e) => {
                warn!("input read failed: {e}");
                return Err(e);
            }
        }
        // Last line may come without a terminator
        if record.last() != Some(&terminator) {
            record.push(terminator);
        }
        if let Err(e) = file.write_all(&record).await {
            warn!("write failed: {e}");
            return Err(e.into());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => LogConfig::from_json(&std::fs::read(&path)?)?,
        None => LogConfig::default(),
    };
    info!(capacity = config.capacity, terminator = config.terminator, "starting");

    let device = Arc::new(LogDevice::new(config)?);

    let writer_task = tokio::spawn(ingest(
        BufReader::new(tokio::io::stdin()),
        LogFile::open(Arc::clone(&device)),
        config.terminator,
    ));
    writer_task.await??;

    let mut reader = LogFile::open(device);
    let mut buf = [0u8; 64];
    let mut out = Vec::new();
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    info!(bytes = out.len(), "log retained");
    print!("{}", String::from_utf8_lossy(&out));
    Ok(())
}
