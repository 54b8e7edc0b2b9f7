use crate::config::Config;
use crate::error::MonitorError;
use crate::record::LogRecord;
use crate::sink::LogSink;
use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::watch;
use tokio_serial::SerialPortBuilderExt;

/// Open the serial port and the log file, then log every incoming line until
/// the port reaches EOF or a shutdown is requested. Both handles are closed
/// on every exit path when they drop at the end of this call.
pub async fn run(config: Config, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    let port = tokio_serial::new(&config.port, config.baud_rate)
        .open_native_async()
        .map_err(MonitorError::Serial)
        .with_context(|| format!("Failed to open serial port {}", config.port))?;

    info!(
        "Connected to serial port {} at {} baud",
        config.port, config.baud_rate
    );

    let mut sink = LogSink::open(&config.log_file)
        .await
        .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;

    read_loop(port, &mut sink, &mut shutdown).await
}

async fn read_loop<R>(
    reader: R,
    sink: &mut LogSink,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line_buffer = Vec::new();

    loop {
        tokio::select! {
            result = reader.read_until(b'\n', &mut line_buffer) => {
                match result {
                    Ok(0) => {
                        info!("Serial connection closed");
                        break;
                    }
                    Ok(_) => {
                        let record = LogRecord::from_raw(Local::now(), &line_buffer);
                        let rendered = record.render();

                        // Print first, then persist, before reading the next line.
                        println!("{}", rendered);
                        sink.append(&rendered)
                            .await
                            .context("Failed to append to log file")?;

                        line_buffer.clear();
                    }
                    Err(e) => {
                        return Err(e).context("Error reading from serial port");
                    }
                }
            }

            _ = shutdown.changed() => {
                info!("Shutdown requested, stopping monitor");
                break;
            }
        }
    }

    Ok(())
}
