use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Args: {0} is missing ! Exiting...")]
    MissingArgument(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The provider, the IP discovery service or the tunnel API could not be reached.
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider rejected the request ({status}): {body}")]
    ProviderRejected { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl Error {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
