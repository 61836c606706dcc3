use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

use super::{decode, ConfigError, ConfigSource, SystemConfig};
use crate::time::Clock;

struct CachedConfig {
    config: SystemConfig,
    fetched_at: DateTime<Utc>,
}

/// Holds the decoded [`SystemConfig`] for `ttl` before asking the source again.
///
/// Failed fetches are returned to the caller and leave the cache empty.
pub struct ConfigCache<S, C> {
    source: S,
    clock: C,
    ttl: Duration,
    entry: Mutex<Option<CachedConfig>>,
}

impl<S: ConfigSource, C: Clock> ConfigCache<S, C> {
    pub fn new(source: S, clock: C, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn get(&self) -> Result<SystemConfig, ConfigError> {
        let now = self.clock.now();
        let mut entry = self.lock();

        if let Some(cached) = entry.as_ref() {
            if self.is_fresh(cached, now) {
                return Ok(cached.config.clone());
            }
            tracing::debug!(fetched_at = %cached.fetched_at, "system configuration expired");
        }

        let rows = self.source.fetch()?;
        let config = decode(&rows)?;
        tracing::info!(rows = rows.len(), "system configuration loaded");
        *entry = Some(CachedConfig {
            config: config.clone(),
            fetched_at: now,
        });
        Ok(config)
    }

    /// Drops the cached value so the next [`get`](Self::get) refetches.
    pub fn invalidate(&self) {
        if self.lock().take().is_some() {
            tracing::debug!("system configuration cache invalidated");
        }
    }

    pub fn is_cached(&self) -> bool {
        let now = self.clock.now();
        self.lock()
            .as_ref()
            .is_some_and(|cached| self.is_fresh(cached, now))
    }

    /// A TTL too large to add to the fetch time never expires.
    fn is_fresh(&self, cached: &CachedConfig, now: DateTime<Utc>) -> bool {
        cached
            .fetched_at
            .checked_add_signed(self.ttl)
            .map_or(true, |expiry| now < expiry)
    }

    fn lock(&self) -> MutexGuard<'_, Option<CachedConfig>> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use chrono::TimeZone;

    use super::*;
    use crate::config::ConfigEntry;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(now)))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail: std::sync::atomic::AtomicBool,
    }

    impl ConfigSource for Arc<CountingSource> {
        fn fetch(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail.load(Ordering::SeqCst) {
                return Err(ConfigError::Io(std::io::Error::other("backend down")));
            }
            Ok(vec![ConfigEntry::new("trial_days", call as u64)])
        }
    }

    fn fixture(
        ttl: Duration,
    ) -> (
        ConfigCache<Arc<CountingSource>, Arc<ManualClock>>,
        Arc<CountingSource>,
        Arc<ManualClock>,
    ) {
        let source = Arc::new(CountingSource::default());
        let clock = ManualClock::starting_at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let cache = ConfigCache::new(source.clone(), clock.clone(), ttl);
        (cache, source, clock)
    }

    #[test]
    fn serves_cached_value_within_ttl() {
        let (cache, source, clock) = fixture(Duration::minutes(5));
        assert_eq!(cache.get().unwrap().trial_days, Some(1));
        clock.advance(Duration::minutes(4));
        assert_eq!(cache.get().unwrap().trial_days, Some(1));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_cached());
    }

    #[test]
    fn refetches_once_ttl_elapses() {
        let (cache, source, clock) = fixture(Duration::minutes(5));
        cache.get().unwrap();
        clock.advance(Duration::minutes(5));
        assert!(!cache.is_cached());
        assert_eq!(cache.get().unwrap().trial_days, Some(2));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_forces_refetch() {
        let (cache, source, _clock) = fixture(Duration::hours(1));
        cache.get().unwrap();
        cache.invalidate();
        assert!(!cache.is_cached());
        assert_eq!(cache.get().unwrap().trial_days, Some(2));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn zero_ttl_never_caches() {
        let (cache, source, _clock) = fixture(Duration::zero());
        cache.get().unwrap();
        cache.get().unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unbounded_ttl_never_expires() {
        let (cache, source, clock) = fixture(Duration::MAX);
        cache.get().unwrap();
        clock.advance(Duration::days(365 * 100));
        assert_eq!(cache.get().unwrap().trial_days, Some(1));
        assert!(cache.is_cached());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let (cache, source, _clock) = fixture(Duration::hours(1));
        source.fail.store(true, Ordering::SeqCst);
        assert!(cache.get().is_err());
        assert!(!cache.is_cached());
        source.fail.store(false, Ordering::SeqCst);
        assert_eq!(cache.get().unwrap().trial_days, Some(2));
    }
}
