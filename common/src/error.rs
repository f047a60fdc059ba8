use std::io;

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("usage: {0}")]
    Usage(String),
    #[error("upstream status {status}: {desc}")]
    UpstreamStatus { status: String, desc: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("data shape: {0}")]
    DataShape(String),
    #[error("host resolution for {addr}: {source}")]
    HostResolution {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ReportError {
    pub fn data_shape(msg: impl Into<String>) -> Self {
        ReportError::DataShape(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        ReportError::Transport(msg.into())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        ReportError::DataShape(e.to_string())
    }
}
