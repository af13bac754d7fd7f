// Error type for everything around the scratch card that can actually fail.
// The scratch core itself never errors: a missing surface just means "skip".
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("window update error: {0}")]
    WindowUpdate(String), // Pushing the frame to the window failed

    #[error("reveal load error ({}): {source}", .path.display())]
    RevealLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String), // Dimensions, brush or threshold out of range
}

impl Error {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
