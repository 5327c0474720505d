//! Services: the boundary where input is validated and references are checked
//! before storage is touched.
//!
//! Every mutation first confirms that the entities it names exist
//! ([`FilmorateError::NotFound`](crate::FilmorateError::NotFound)), then runs the
//! validation layer, and only then calls into storage. A rejected request
//! leaves no partial state behind.

mod films;
mod reference;
mod users;

pub use films::FilmService;
pub use reference::ReferenceService;
pub use users::UserService;

use crate::environment::Clock;
use crate::storage::Storage;
use std::sync::Arc;

/// All services over one storage backend.
#[derive(Clone)]
pub struct Services {
    /// Films and likes
    pub films: FilmService,
    /// Users and friendships
    pub users: UserService,
    /// Genres and MPA ratings
    pub reference: ReferenceService,
    storage: Storage,
}

impl Services {
    /// Wire the services to a storage backend.
    #[must_use]
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self {
            films: FilmService::new(storage.clone()),
            users: UserService::new(storage.clone(), clock),
            reference: ReferenceService::new(storage.clone()),
            storage,
        }
    }

    /// Name of the storage backend in use.
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        self.storage.backend
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("backend", &self.storage.backend)
            .finish_non_exhaustive()
    }
}
