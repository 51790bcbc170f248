//! 位置缓存
//!
//! 有界的内存缓存：
//! - 按插入顺序 FIFO 淘汰（非 LRU）——地理位置数据读多写少，
//!   不值得为它维护访问顺序
//! - 惰性过期：只在访问时检查，没有后台清扫
//! - 时钟可注入，测试可以模拟时间流逝

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::trace;

use crate::resolver::record::LocationRecord;
use crate::system::Clock;

/// 缓存统计信息（只读内省）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_entries: usize,
    pub expiry_ms: i64,
}

/// 缓存条目，归缓存独占；调用方只拿到 value 的克隆
struct CacheEntry {
    value: LocationRecord,
    inserted_at: i64,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// 插入顺序队列，驱动 FIFO 淘汰
    order: VecDeque<String>,
}

/// 有界 FIFO 位置缓存
pub struct LocationCache {
    inner: Mutex<CacheInner>,
    expiry_ms: i64,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl LocationCache {
    pub fn new(expiry_ms: i64, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            expiry_ms,
            max_entries,
            clock,
        }
    }

    /// 读取缓存
    ///
    /// 过期条目视为不存在，并在此处顺手清理。
    pub fn get(&self, ip: &str) -> Option<LocationRecord> {
        let now = self.clock.now_millis();
        let mut inner = self.inner.lock();

        let expired = match inner.entries.get(ip) {
            Some(entry) if now - entry.inserted_at <= self.expiry_ms => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            inner.entries.remove(ip);
            inner.order.retain(|k| k != ip);
            trace!("Cache entry for {} expired, purged on access", ip);
        }
        None
    }

    /// 写入缓存
    ///
    /// 覆盖写会把条目移到插入队列尾部。写入后若超出容量，
    /// 淘汰最早插入的一条（每次写入最多超出一条）。
    pub fn put(&self, ip: &str, value: LocationRecord) {
        let now = self.clock.now_millis();
        let mut inner = self.inner.lock();

        let replaced = inner
            .entries
            .insert(
                ip.to_string(),
                CacheEntry {
                    value,
                    inserted_at: now,
                },
            )
            .is_some();
        if replaced {
            inner.order.retain(|k| k != ip);
        }
        inner.order.push_back(ip.to_string());

        if inner.entries.len() > self.max_entries
            && let Some(oldest) = inner.order.pop_front()
        {
            inner.entries.remove(&oldest);
            trace!("Cache full, evicted oldest entry: {}", oldest);
        }
    }

    /// 清空缓存
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            size: inner.entries.len(),
            max_entries: self.max_entries,
            expiry_ms: self.expiry_ms,
        }
    }
}
