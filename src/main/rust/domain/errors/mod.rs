use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid broker host: host cannot be empty")]
    InvalidBrokerHost,

    #[error("Invalid port: port cannot be zero")]
    InvalidPort,

    #[error("Invalid update interval: {0} seconds (allowed range is 1-3600)")]
    InvalidInterval(u64),

    #[error("Invalid topic: topic cannot be empty")]
    InvalidTopic,

    #[error("Invalid tally source: name cannot be empty")]
    InvalidTallySource,

    #[error("Host connection failed: {0}")]
    HostConnectFailed(String),

    #[error("Status query failed: {0}")]
    StatusQueryFailed(String),

    #[error("Scene query failed: {0}")]
    SceneQueryFailed(String),

    #[error("Publish failed: {0}")]
    PublishFailed(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
