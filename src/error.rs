use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeswitchError {
    #[error("config: {message}")]
    Config { message: String },

    #[error("auth: {message}")]
    Auth { message: String },

    #[error("api: {message}")]
    Api { message: String },

    #[error("connection: {message}")]
    Connection { message: String },

    #[error("timeout: request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("response: {message}")]
    Response { message: String },

    #[error("archive: {message}")]
    Archive { message: String },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
