/// Result alias used across the crate.
pub type ReelResult<T> = Result<T, ReelError>;

/// Everything that can go wrong between reading a document and finishing a video.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Remote fetch failed or the local path does not exist.
    #[error("input source error: {0}")]
    InputSource(String),

    /// The document is not valid JSON.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Valid JSON with the wrong shape: missing keys, bad keypoints, too few keypoints.
    #[error("structural error: {0}")]
    Structural(String),

    /// Options or sink configuration out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// `ffmpeg` missing, failed to start, or exited with an error.
    #[error("encode error: {0}")]
    Encode(String),

    /// Anything else, usually I/O with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build [`ReelError::InputSource`].
    pub fn input_source(msg: impl Into<String>) -> Self {
        Self::InputSource(msg.into())
    }

    /// Build [`ReelError::MalformedInput`].
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Build [`ReelError::Structural`].
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    /// Build [`ReelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build [`ReelError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Errors caused by what the caller sent rather than by the renderer.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InputSource(_) | Self::MalformedInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ReelError::input_source("x")
                .to_string()
                .contains("input source error:")
        );
        assert!(
            ReelError::malformed("x")
                .to_string()
                .contains("malformed input:")
        );
        assert!(
            ReelError::structural("x")
                .to_string()
                .contains("structural error:")
        );
        assert!(
            ReelError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(ReelError::encode("x").to_string().contains("encode error:"));
    }

    #[test]
    fn only_source_and_syntax_errors_are_client_errors() {
        assert!(ReelError::input_source("x").is_client_error());
        assert!(ReelError::malformed("x").is_client_error());
        assert!(!ReelError::structural("x").is_client_error());
        assert!(!ReelError::encode("x").is_client_error());
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ReelError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
