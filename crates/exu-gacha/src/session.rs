//! Per-caller engines over one shared catalog.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::catalog::Catalog;
use crate::config::GachaConfig;
use crate::engine::GachaEngine;
use crate::error::{GachaError, GachaResult};

/// Hands out one engine per session id. Sessions share the catalog but never
/// a draw tree, so one caller's banner switch or guarantee override is
/// invisible to the others.
#[derive(Debug)]
pub struct SessionRegistry {
    catalog: Arc<Catalog>,
    config: GachaConfig,
    sessions: Mutex<HashMap<String, Arc<Mutex<GachaEngine>>>>,
}

impl SessionRegistry {
    /// Create an empty registry. New sessions start on the standard banner.
    pub fn new(catalog: Arc<Catalog>, config: GachaConfig) -> Self {
        Self {
            catalog,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The engine of session `id`, created on first use.
    pub fn session(&self, id: &str) -> GachaResult<Arc<Mutex<GachaEngine>>> {
        let mut sessions = self.sessions.lock().map_err(|_| GachaError::LockPoisoned)?;
        if let Some(engine) = sessions.get(id) {
            return Ok(Arc::clone(engine));
        }
        let engine = GachaEngine::new(Arc::clone(&self.catalog), self.config.clone())?;
        log::debug!("opened gacha session \"{id}\"");
        let engine = Arc::new(Mutex::new(engine));
        sessions.insert(id.to_string(), Arc::clone(&engine));
        Ok(engine)
    }

    /// Run `f` with exclusive access to the engine of session `id`.
    pub fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GachaEngine) -> GachaResult<R>,
    ) -> GachaResult<R> {
        let engine = self.session(id)?;
        let mut engine = engine.lock().map_err(|_| GachaError::LockPoisoned)?;
        f(&mut engine)
    }

    /// Drop a session. Returns whether it existed.
    pub fn close(&self, id: &str) -> GachaResult<bool> {
        let mut sessions = self.sessions.lock().map_err(|_| GachaError::LockPoisoned)?;
        Ok(sessions.remove(id).is_some())
    }

    /// Number of open sessions.
    pub fn len(&self) -> GachaResult<usize> {
        let sessions = self.sessions.lock().map_err(|_| GachaError::LockPoisoned)?;
        Ok(sessions.len())
    }

    /// True when no session is open.
    pub fn is_empty(&self) -> GachaResult<bool> {
        Ok(self.len()? == 0)
    }

    /// The shared catalog.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::banner::STANDARD_BANNER;
    use crate::engine::BannerOutcome;

    fn registry() -> SessionRegistry {
        let catalog = Arc::new(Catalog::bundled().unwrap());
        SessionRegistry::new(catalog, GachaConfig::default().with_seed(1))
    }

    #[test]
    fn same_id_same_engine() {
        let registry = registry();
        let a = registry.session("alice").unwrap();
        let b = registry.session("alice").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len().unwrap(), 1);
    }

    #[test]
    fn banner_switch_is_per_session() {
        let registry = registry();
        let outcome = registry
            .with_session("alice", |e| e.set_banner("Spring Festival"))
            .unwrap();
        assert_eq!(outcome, BannerOutcome::Applied);
        let bob = registry
            .with_session("bob", |e| Ok(e.banner().name().to_string()))
            .unwrap();
        assert_eq!(bob, STANDARD_BANNER);
    }

    #[test]
    fn close_forgets_the_session() {
        let registry = registry();
        registry.session("alice").unwrap();
        assert!(registry.close("alice").unwrap());
        assert!(!registry.close("alice").unwrap());
        assert!(registry.is_empty().unwrap());
    }

    #[test]
    fn poisoned_registry_reports_instead_of_reading_empty() {
        let registry = Arc::new(registry());
        registry.session("alice").unwrap();
        let poisoner = Arc::clone(&registry);
        let result = thread::spawn(move || {
            let _guard = poisoner.sessions.lock().unwrap();
            panic!("poison the session map");
        })
        .join();
        assert!(result.is_err());
        assert!(matches!(registry.len(), Err(GachaError::LockPoisoned)));
        assert!(matches!(registry.is_empty(), Err(GachaError::LockPoisoned)));
        assert!(matches!(
            registry.session("bob"),
            Err(GachaError::LockPoisoned)
        ));
    }

    #[test]
    fn concurrent_sessions_keep_their_trees_valid() {
        let registry = Arc::new(registry());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let id = format!("user{}", i % 2);
                    for _ in 0..20 {
                        let batch = registry
                            .with_session(&id, |e| e.draw_batch(10, true))
                            .unwrap();
                        assert_eq!(batch.len(), 10);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        for id in ["user0", "user1"] {
            registry
                .with_session(id, |e| Ok(e.tree().validate()?))
                .unwrap();
        }
    }
}
