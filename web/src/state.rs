//! Application state for Axum handlers.

use filmorate_core::service::Services;

/// State shared by every handler: the services over the selected backend.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Domain services
    pub services: Services,
}

impl AppState {
    /// Create the state.
    #[must_use]
    pub const fn new(services: Services) -> Self {
        Self { services }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone() {
        // Axum requires Clone state
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_state_reports_backend() {
        let state = AppState::new(filmorate_testing::in_memory_services());
        assert_eq!(state.services.backend(), "memory");
    }
}
