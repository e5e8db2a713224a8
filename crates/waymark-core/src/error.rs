use std::fmt;
use std::rc::Rc;

use thiserror::Error;

/// Everything a navigation operation can fail with.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// Startup wiring defect: the locator has no view for this pair.
    #[error("no view registered for view model `{view_model}` (contract: {contract:?})")]
    ViewNotRegistered {
        view_model: &'static str,
        contract: Option<String>,
    },
    #[error("no factory registered for view model `{view_model}`")]
    ViewModelNotRegistered { view_model: &'static str },
    #[error("cannot pop the root page")]
    PopRoot,
    #[error("page stack is empty")]
    EmptyPageStack,
    #[error("modal stack is empty")]
    EmptyModalStack,
    #[error("navigation to `{view_model}` was refused")]
    Blocked { view_model: String },
    #[error("platform {operation} failed")]
    Platform {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

impl NavigationError {
    pub fn platform(operation: &'static str, err: anyhow::Error) -> Self {
        Self::Platform {
            operation,
            source: err.into(),
        }
    }

    /// Configuration errors point at missing registrations and are never retried.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ViewNotRegistered { .. } | Self::ViewModelNotRegistered { .. }
        )
    }

    /// Caller misuse that left the stacks untouched.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(
            self,
            Self::PopRoot | Self::EmptyPageStack | Self::EmptyModalStack
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("navigation parameter `{key}` is missing")]
    Missing { key: String },
    #[error("navigation parameter `{key}` is not a `{expected}`")]
    TypeMismatch { key: String, expected: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid navigation config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cannot serialize navigation config: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleHook {
    NavigatingTo,
    NavigatedTo,
    NavigatedFrom,
}

impl fmt::Display for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NavigatingTo => "when_navigating_to",
            Self::NavigatedTo => "when_navigated_to",
            Self::NavigatedFrom => "when_navigated_from",
        })
    }
}

/// A view model's lifecycle hook failed after (or, for `NavigatingTo`,
/// without blocking) a transition. Delivered on the lifecycle error channel.
#[derive(Debug, Clone, Error)]
#[error("{hook} of `{view_model}` failed: {error}")]
pub struct LifecycleFailure {
    pub view_model: String,
    pub hook: LifecycleHook,
    pub error: Rc<anyhow::Error>,
}
