use crate::models::{FitCheckConfig, GradeResult, GradingInput};

/// Failures of a grading attempt. Response-shape problems are NOT here: a
/// reply that cannot be parsed degrades into a fallback `GradeResult` instead.
#[derive(Debug, thiserror::Error)]
pub enum GradingError {
    #[error("Network error. Please check your internet connection and try again.")]
    Network(#[source] reqwest::Error),

    #[error("Unable to analyze product at this time. Please try again later.")]
    Service(String),

    #[error("Nothing to analyze. Provide a product name, link, or photo.")]
    EmptyInput,
}

/// Trait for grading backends (Gemini, mocks, etc.)
#[async_trait::async_trait]
pub trait GradingService: Send + Sync {
    /// One external call per invocation: returns a well-formed `GradeResult`
    /// or a propagated transport failure. Never both, never neither.
    async fn grade(
        &self,
        input: &GradingInput,
        fit: Option<&FitCheckConfig>,
    ) -> Result<GradeResult, GradingError>;
}
