use thiserror::Error;

/// Core error taxonomy for the swipe/match and discovery engines.
///
/// Callers branch on `UserNotFound` / `CacheKeyNotFound` (absence) versus the
/// infrastructure variants (failure), so absence is never reported through a
/// generic error.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("user not found")]
    UserNotFound,

    #[error("match not found")]
    MatchNotFound,

    #[error("cache key not found")]
    CacheKeyNotFound,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("configuration error: {0}")]
    Config(String),

    /// Lower-layer failure wrapped with operation context. The source error
    /// is preserved unchanged for callers that need the root cause.
    #[error("{context}")]
    Wrapped {
        context: &'static str,
        #[source]
        source: Box<CoreError>,
    },
}

impl CoreError {
    /// Wrap an error with a stable operation marker without replacing it.
    pub fn wrap(context: &'static str, source: CoreError) -> Self {
        Self::Wrapped {
            context,
            source: Box::new(source),
        }
    }

    /// Walk the wrap chain down to the originating error.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::Wrapped { source, .. } => source.root(),
            other => other,
        }
    }

    /// True when this error (at any wrap depth) is an absence, not a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.root(),
            Self::UserNotFound | Self::MatchNotFound | Self::CacheKeyNotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_preserves_root_cause() {
        let err = CoreError::wrap(
            "handle swipe failed",
            CoreError::wrap("cache save failed", CoreError::CacheKeyNotFound),
        );
        assert!(matches!(err.root(), CoreError::CacheKeyNotFound));
        assert!(err.is_not_found());
    }

    #[test]
    fn infrastructure_errors_are_not_absence() {
        let err = CoreError::Validation("bad filter".into());
        assert!(!err.is_not_found());
    }
}
