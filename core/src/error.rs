use thiserror::Error;

/// Problems found while reading an animation configuration supplied by the scripting runtime.
///
/// None of these are fatal to the scheduler. [`LayoutAnimationConfig::from_raw`] substitutes
/// defaults and logs the error; only [`LayoutAnimationConfig::try_from_raw`] reports it.
///
/// [`LayoutAnimationConfig::from_raw`]: crate::config::LayoutAnimationConfig::from_raw
/// [`LayoutAnimationConfig::try_from_raw`]: crate::config::LayoutAnimationConfig::try_from_raw
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document did not have the expected shape.
    #[error("malformed animation config: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The progress function identifier is not one of the known types.
    #[error("unknown animation type: {0:?}")]
    UnknownAnimationType(String),

    /// The animated property is not one of the known properties.
    #[error("unknown animation property: {0:?}")]
    UnknownAnimationProperty(String),

    /// Durations and delays must be finite and non-negative.
    #[error("invalid {field}: {value}")]
    InvalidTiming { field: &'static str, value: f64 },

    /// A section that requires a duration had none, directly or inherited.
    #[error("missing duration for {0} animation")]
    MissingDuration(&'static str),
}
