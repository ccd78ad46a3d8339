use crate::domain::ports::Clock;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OnceCell};

/// 12 小時，與上游目錄的更新頻率相符
pub const DEFAULT_TTL: Duration = Duration::from_secs(12 * 60 * 60);
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

type Slot<V> = Arc<OnceCell<(V, Instant)>>;

/// Time-bounded cache with a fixed size.
///
/// Each key maps to a slot that is filled at most once. Callers that miss on the
/// same key while a value is being computed wait on that computation instead of
/// issuing their own. A failed computation leaves the slot empty, so the next
/// caller runs it again. Slots still being computed are never evicted.
pub struct TtlCache<K, V> {
    ttl: Duration,
    max_entries: usize,
    clock: Arc<dyn Clock>,
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            clock,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, stored_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(stored_at) < self.ttl
    }

    /// Returns the cached value for `key`, computing it with `init` on a miss.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            let now = self.clock.now();

            let reusable = slots.get(&key).and_then(|slot| match slot.get() {
                Some((_, stored_at)) if !self.is_fresh(*stored_at, now) => None,
                _ => Some(slot.clone()),
            });

            match reusable {
                Some(slot) => slot,
                None => {
                    slots.remove(&key);
                    self.make_room(&mut slots, now);
                    let slot: Slot<V> = Arc::new(OnceCell::new());
                    slots.insert(key, slot.clone());
                    slot
                }
            }
        };

        let (value, _) = slot
            .get_or_try_init(|| async {
                let value = init().await?;
                Ok::<_, E>((value, self.clock.now()))
            })
            .await?;

        Ok(value.clone())
    }

    /// Fresh cached value, if any. Never triggers a computation.
    pub async fn get(&self, key: &K) -> Option<V> {
        let slots = self.slots.lock().await;
        let now = self.clock.now();
        slots
            .get(key)
            .and_then(|slot| slot.get())
            .filter(|(_, stored_at)| self.is_fresh(*stored_at, now))
            .map(|(value, _)| value.clone())
    }

    pub async fn invalidate_all(&self) {
        self.slots.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn make_room(&self, slots: &mut HashMap<K, Slot<V>>, now: Instant) {
        if slots.len() < self.max_entries {
            return;
        }

        // 過期的與失敗後無人持有的空 slot 直接丟掉
        slots.retain(|_, slot| match slot.get() {
            Some((_, stored_at)) => self.is_fresh(*stored_at, now),
            None => Self::is_in_flight(slot),
        });

        // 計算中的 slot 不淘汰，暫時超出上限也一樣
        while slots.len() >= self.max_entries {
            let oldest = slots
                .iter()
                .filter_map(|(key, slot)| slot.get().map(|(_, stored_at)| (key, *stored_at)))
                .min_by_key(|(_, stored_at)| *stored_at)
                .map(|(key, _)| key.clone());

            match oldest {
                Some(key) => {
                    slots.remove(&key);
                }
                None => break,
            }
        }
    }

    /// An empty slot is still being computed while some caller holds a clone of it.
    fn is_in_flight(slot: &Slot<V>) -> bool {
        slot.get().is_none() && Arc::strong_count(slot) > 1
    }
}
