use thiserror::Error;

/// Stream errors
#[derive(Debug, Error)]
pub enum StreamError {
    /// IO error from the underlying backend
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source ran dry before the requested number of bytes arrived
    #[error("unexpected end of stream: needed {needed} bytes, {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Repositioning was requested on a forward-only stream
    #[error("stream is not seekable")]
    NotSeekable,

    /// The backend cannot perform this kind of operation at all
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}
