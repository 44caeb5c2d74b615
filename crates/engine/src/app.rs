//! Application composition.

use std::sync::Arc;

use crate::infrastructure::ports::CharacterStore;

/// Application dependency container shared by every request handler.
///
/// The store is whichever backend runtime configuration selected; handlers
/// only ever see the [`CharacterStore`] contract.
pub struct App {
    pub store: Arc<dyn CharacterStore>,
}

impl App {
    pub fn new(store: Arc<dyn CharacterStore>) -> Self {
        Self { store }
    }
}
