use crate::ports::{DataStore, TemplateCatalog};

/// Application context holding dependencies for command execution.
pub struct AppContext<S: DataStore, T: TemplateCatalog> {
    store: S,
    templates: T,
}

impl<S: DataStore, T: TemplateCatalog> AppContext<S, T> {
    pub fn new(store: S, templates: T) -> Self {
        Self { store, templates }
    }

    /// Get a reference to the data store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the built-in template catalog.
    pub fn templates(&self) -> &T {
        &self.templates
    }
}
