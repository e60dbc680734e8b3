use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediakeepError {
    #[error("Failed to read/write blob file: {0}")]
    BlobIoError(std::io::Error),
    #[error("Failed to serialize/deserialize blob: {0}")]
    BlobSerializationError(serde_json::Error),
}
