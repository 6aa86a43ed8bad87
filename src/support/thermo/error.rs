use thiserror::Error;

/// Errors that may occur when evaluating loop-fluid properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The temperature is outside the model's valid domain.
    ///
    /// For example, a linearized liquid evaluated so far from its reference
    /// point that its density would turn non-positive.
    #[error("out of domain: {context}")]
    OutOfDomain { context: String },

    /// The calculation failed due to a numerical or internal error.
    #[error("calculation error: {context}")]
    Calculation { context: String },
}
