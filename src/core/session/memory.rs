//! 内存会话注册表
//!
//! 默认实现，数据仅在内存中，重启后丢失。
//! 容量有上限，空闲超过 TTL 的会话会被淘汰。

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use super::{ChatSession, SessionFactory, SessionStore};

/// 注册表容量限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// 最大会话数
    pub capacity: usize,
    /// 空闲过期时间，None 表示永不过期
    pub ttl: Option<Duration>,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl: Some(Duration::from_secs(3600)),
        }
    }
}

struct SessionEntry {
    session: Arc<dyn ChatSession>,
    last_used: Instant,
}

impl SessionEntry {
    fn new(session: Arc<dyn ChatSession>, now: Instant) -> Self {
        Self {
            session,
            last_used: now,
        }
    }
}

/// 内存会话注册表
///
/// 创建在 DashMap 的键锁内完成，同一 ID 的并发首次访问只会创建一个句柄
pub struct MemorySessionStore {
    factory: Arc<dyn SessionFactory>,
    sessions: DashMap<String, SessionEntry>,
    limits: SessionLimits,
}

impl MemorySessionStore {
    pub fn new(factory: Arc<dyn SessionFactory>) -> Self {
        Self::with_limits(factory, SessionLimits::default())
    }

    pub fn with_limits(factory: Arc<dyn SessionFactory>, limits: SessionLimits) -> Self {
        Self {
            factory,
            sessions: DashMap::new(),
            limits,
        }
    }

    fn is_expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        match self.limits.ttl {
            Some(ttl) => now.saturating_duration_since(entry.last_used) >= ttl,
            None => false,
        }
    }

    /// 为新会话腾出空间：先清理过期会话，再按最近最少使用淘汰
    fn make_room(&self, now: Instant) {
        if self.limits.ttl.is_some() {
            let before = self.sessions.len();
            self.sessions.retain(|_, entry| !self.is_expired(entry, now));
            let purged = before.saturating_sub(self.sessions.len());
            if purged > 0 {
                debug!("Purged {} expired sessions", purged);
            }
        }

        let capacity = self.limits.capacity.max(1);
        while self.sessions.len() >= capacity {
            // 先拿到 key 再删除，避免持有分片读锁时写入
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.value().last_used)
                .map(|entry| entry.key().clone());

            match oldest {
                Some(session_id) => {
                    self.sessions.remove(&session_id);
                    info!("Session evicted (capacity {}): {}", capacity, session_id);
                }
                None => break,
            }
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Option<Arc<dyn ChatSession>> {
        let now = Instant::now();

        match self.sessions.get_mut(session_id) {
            None => return None,
            Some(mut entry) => {
                if !self.is_expired(&entry, now) {
                    entry.last_used = now;
                    return Some(Arc::clone(&entry.session));
                }
            }
        }

        self.sessions
            .remove_if(session_id, |_, entry| self.is_expired(entry, now));
        debug!("Session expired: {}", session_id);
        None
    }

    async fn get_or_create(
        &self,
        session_id: &str,
        system_instruction: &str,
    ) -> Arc<dyn ChatSession> {
        let now = Instant::now();

        if !self.sessions.contains_key(session_id) {
            self.make_room(now);
        }

        match self.sessions.entry(session_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                if self.is_expired(occupied.get(), now) {
                    debug!("Session expired, recreating: {}", session_id);
                    let session = self.factory.create(system_instruction);
                    occupied.insert(SessionEntry::new(Arc::clone(&session), now));
                    session
                } else {
                    let entry = occupied.get_mut();
                    entry.last_used = now;
                    Arc::clone(&entry.session)
                }
            }
            Entry::Vacant(vacant) => {
                debug!("Session created: {}", session_id);
                let session = self.factory.create(system_instruction);
                vacant.insert(SessionEntry::new(Arc::clone(&session), now));
                session
            }
        }
    }

    async fn len(&self) -> usize {
        self.sessions.len()
    }
}
