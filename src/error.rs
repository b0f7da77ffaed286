use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("failed to query output config: {0}")]
    OutputConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] ron::Error),

    #[error("key map is empty")]
    EmptyKeyMap,

    #[error("physical code {code} is bound to more than one key")]
    DuplicatePhysicalCode { code: u32 },

    #[error("key {index} above base key {base_key} is out of range")]
    KeyNumberOverflow { base_key: i32, index: usize },

    #[error("key map has {keys} keys but the synth has {voices} voices")]
    VoiceCountMismatch { keys: usize, voices: usize },

    #[error("terminal i/o failed: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("window failed: {0}")]
    Window(#[from] eframe::Error),
}
