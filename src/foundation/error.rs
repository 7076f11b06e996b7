pub type OrbitcamResult<T> = Result<T, OrbitcamError>;

#[derive(thiserror::Error, Debug)]
pub enum OrbitcamError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("render invocation failed: {0}")]
    RenderInvocationFailed(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OrbitcamError {
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn render_invocation_failed(msg: impl Into<String>) -> Self {
        Self::RenderInvocationFailed(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }

    pub fn is_render_invocation_failed(&self) -> bool {
        matches!(self, Self::RenderInvocationFailed(_))
    }
}
