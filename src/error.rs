use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
