//! Load-once catalog handle

use crate::catalog::Catalog;
use crate::LibraryError;
use once_cell::unsync::OnceCell;
use std::cell::Cell;
use std::rc::Rc;
use tracing::{error, info};

/// Something that can produce a full catalog
pub trait CatalogSource {
    fn load_catalog(&self) -> Result<Catalog, LibraryError>;
}

/// Loads the catalog on first use and hands out the same copy afterwards
///
/// The source is queried again only after [`CatalogCache::invalidate`] or
/// through [`CatalogCache::reload`].
pub struct CatalogCache<S> {
    source: S,
    cell: OnceCell<Rc<Catalog>>,
    loads: Cell<usize>,
}

impl<S: CatalogSource> CatalogCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
            loads: Cell::new(0),
        }
    }

    /// The memoized catalog, loading it if needed
    pub fn get(&self) -> Result<Rc<Catalog>, LibraryError> {
        self.cell
            .get_or_try_init(|| self.fetch())
            .map(Rc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// How many times the source has been queried
    pub fn load_count(&self) -> usize {
        self.loads.get()
    }

    /// Drop the memoized catalog; the next `get` queries the source again
    pub fn invalidate(&mut self) {
        if self.cell.take().is_some() {
            info!("Catalog cache invalidated");
        }
    }

    /// Query the source now, keeping the previous catalog if that fails
    pub fn reload(&mut self) -> Result<Rc<Catalog>, LibraryError> {
        match self.fetch() {
            Ok(catalog) => {
                self.cell = OnceCell::with_value(Rc::clone(&catalog));
                Ok(catalog)
            }
            Err(e) => {
                error!("Catalog reload failed, keeping previous data: {}", e);
                Err(e)
            }
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn fetch(&self) -> Result<Rc<Catalog>, LibraryError> {
        self.loads.set(self.loads.get() + 1);
        let catalog = self.source.load_catalog()?;
        info!("Catalog loaded ({} games)", catalog.len());
        Ok(Rc::new(catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GameRecord;

    struct FakeSource {
        fail: Cell<bool>,
        calls: Cell<usize>,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                fail: Cell::new(false),
                calls: Cell::new(0),
            }
        }
    }

    impl CatalogSource for FakeSource {
        fn load_catalog(&self) -> Result<Catalog, LibraryError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(LibraryError::Database("store unreachable".to_string()));
            }
            let games = (0..self.calls.get())
                .map(|i| GameRecord::new(format!("Jogo {}", i), 4.0, &["RPG"]))
                .collect();
            Ok(Catalog::from_records(games))
        }
    }

    #[test]
    fn test_loads_once() {
        let cache = CatalogCache::new(FakeSource::new());
        assert!(!cache.is_loaded());

        let first = cache.get().unwrap();
        let second = cache.get().unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 1);
        assert_eq!(cache.source().calls.get(), 1);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let cache = CatalogCache::new(FakeSource::new());
        cache.source().fail.set(true);
        assert!(cache.get().is_err());
        assert!(!cache.is_loaded());

        cache.source().fail.set(false);
        assert!(cache.get().is_ok());
        assert_eq!(cache.load_count(), 2);
    }

    #[test]
    fn test_invalidate_forces_requery() {
        let mut cache = CatalogCache::new(FakeSource::new());
        assert_eq!(cache.get().unwrap().len(), 1);

        cache.invalidate();
        assert!(!cache.is_loaded());
        assert_eq!(cache.get().unwrap().len(), 2);
    }

    #[test]
    fn test_reload_keeps_previous_on_error() {
        let mut cache = CatalogCache::new(FakeSource::new());
        let original = cache.get().unwrap();

        cache.source().fail.set(true);
        assert!(cache.reload().is_err());
        assert!(Rc::ptr_eq(&cache.get().unwrap(), &original));

        cache.source().fail.set(false);
        let fresh = cache.reload().unwrap();
        assert_eq!(fresh.len(), 3);
        assert!(Rc::ptr_eq(&cache.get().unwrap(), &fresh));
    }
}
