//! User-facing messages for dashboard outcomes.

use std::fmt;

use crate::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// The user action a notification reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Seed,
    AddCity,
    RemoveCity,
}

/// Transient message shown after a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// Message for a successful `action`. Seeding succeeds silently.
    pub fn for_success(action: Action) -> Option<Self> {
        match action {
            Action::Seed => None,
            Action::AddCity => Some(Self::success("City added successfully!")),
            Action::RemoveCity => Some(Self::success("City removed successfully!")),
        }
    }

    /// Message for a rejected `action`. Not-found and transport failures read
    /// the same to the user.
    pub fn for_error(action: Action, err: &DashboardError) -> Self {
        let message = match (action, err) {
            (_, DashboardError::DuplicateCity { .. }) => "City already exists!",
            (_, DashboardError::LastCityRemoval) => "Cannot delete the last city!",
            (_, DashboardError::EmptyCityName) => "Please enter a city name.",
            (_, DashboardError::UnknownCity { .. }) => "That city is not on the dashboard.",
            (Action::Seed, DashboardError::Fetch(_)) => {
                "Failed to fetch default city weather data."
            }
            (_, DashboardError::Fetch(_)) => {
                "Failed to fetch weather data. Please check the city name."
            }
        };
        Self::error(message)
    }

    /// Notification for any operation result.
    pub fn for_result<T>(action: Action, result: &Result<T, DashboardError>) -> Option<Self> {
        match result {
            Ok(_) => Self::for_success(action),
            Err(err) => Some(Self::for_error(action, err)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self.level {
            Level::Success => '✔',
            Level::Error => '✖',
        };
        write!(f, "{mark} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchError;
    use reqwest::StatusCode;

    fn not_found() -> DashboardError {
        FetchError::NotFound {
            city: "Zzzzz".into(),
            status: StatusCode::NOT_FOUND,
        }
        .into()
    }

    #[test]
    fn seed_failure_has_its_own_message() {
        let n = Notification::for_error(Action::Seed, &not_found());
        assert!(n.is_error());
        assert_eq!(n.message, "Failed to fetch default city weather data.");
    }

    #[test]
    fn add_failure_asks_to_check_city_name() {
        let n = Notification::for_error(Action::AddCity, &not_found());
        assert_eq!(n.message, "Failed to fetch weather data. Please check the city name.");
    }

    #[test]
    fn malformed_response_reads_like_not_found() {
        let err: DashboardError = FetchError::Malformed("bad".into()).into();
        assert_eq!(
            Notification::for_error(Action::AddCity, &err),
            Notification::for_error(Action::AddCity, &not_found()),
        );
    }

    #[test]
    fn duplicate_and_last_city_messages() {
        let dup = DashboardError::DuplicateCity {
            name: "London".into(),
        };
        assert_eq!(
            Notification::for_error(Action::AddCity, &dup).message,
            "City already exists!"
        );
        assert_eq!(
            Notification::for_error(Action::RemoveCity, &DashboardError::LastCityRemoval).message,
            "Cannot delete the last city!"
        );
    }

    #[test]
    fn successes_map_per_action() {
        assert!(Notification::for_success(Action::Seed).is_none());

        let ok: Result<(), DashboardError> = Ok(());
        let added = Notification::for_result(Action::AddCity, &ok).unwrap();
        assert_eq!(added.to_string(), "✔ City added successfully!");

        let removed = Notification::for_result(Action::RemoveCity, &ok).unwrap();
        assert_eq!(removed.level, Level::Success);
    }

    #[test]
    fn display_marks_errors() {
        let n = Notification::error("boom");
        assert_eq!(n.to_string(), "✖ boom");
    }
}
