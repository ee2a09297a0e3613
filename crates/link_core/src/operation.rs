//! Outcome of an orchestrated action and the status text derived from it.

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;

/// Tri-state outcome of one orchestrated call.
///
/// Controls derive their enabled state from this value alone: a control is
/// disabled exactly while its action is [`OperationResult::InFlight`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult<T> {
    /// The request completed and produced a payload.
    Success(T),

    /// The request failed. The message is the most specific one available.
    Failure(String),

    /// The request has been issued and not yet resolved.
    InFlight,
}

impl<T> OperationResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    /// Whether the invoking control should accept input.
    pub fn control_enabled(&self) -> bool {
        !self.is_in_flight()
    }

    /// The payload of a successful outcome.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The message of a failed outcome.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            _ => None,
        }
    }

    /// Maps the success payload, leaving other states untouched.
    pub fn map<U, F>(self, f: F) -> OperationResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(value) => OperationResult::Success(f(value)),
            Self::Failure(message) => OperationResult::Failure(message),
            Self::InFlight => OperationResult::InFlight,
        }
    }
}

/// Text shown in an inline status region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    /// Nothing to show.
    #[default]
    Idle,
    /// A request is running, e.g. "Saving configuration...".
    Working(String),
    Success(String),
    Warning(String),
    Error(String),
}

impl Status {
    /// The text to render; empty for [`Status::Idle`].
    pub fn text(&self) -> &str {
        match self {
            Self::Idle => "",
            Self::Working(text)
            | Self::Success(text)
            | Self::Warning(text)
            | Self::Error(text) => text,
        }
    }
}
