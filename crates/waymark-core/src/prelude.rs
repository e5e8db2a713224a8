pub use crate::config::{NavTransition, NavigationConfig};
pub use crate::effects::{Subscription, Subscriptions};
pub use crate::error::{LifecycleFailure, LifecycleHook, NavigationError, ParameterError};
pub use crate::parameter::NavigationParameter;
pub use crate::signal::{Events, Signal, SignalStream, signal};
pub use crate::snapshot::StackSnapshot;
pub use crate::view_model::{
    Capabilities, Destructible, Navigable, NavigationGuard, ViewModel, ViewModelRef,
    same_view_model,
};
