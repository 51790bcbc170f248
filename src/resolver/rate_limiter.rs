//! 外部请求速率限制器
//!
//! 上游 API 有调用频率限制。这里用单个"上次请求开始时间"实现
//! 最小间隔约束：时间戳在请求发出前记录，上游响应慢不会缩短
//! 下一个调用方需要等待的间隔。

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use crate::system::Clock;

pub struct RateLimiter {
    min_interval_ms: i64,
    /// 上次请求的开始时间（毫秒时间戳）
    last_request_at: Mutex<Option<i64>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(min_interval_ms: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            min_interval_ms,
            last_request_at: Mutex::new(None),
            clock,
        }
    }

    /// 等待一个请求槽位
    ///
    /// 距上次请求开始不足 min_interval 时挂起补足差值，返回前记录
    /// 本次请求的开始时间。锁不跨 await 持有，缓存命中等无关路径
    /// 不会被正在等待的调用方阻塞；并发未命中时两个调用方可能读到
    /// 同一个时间戳并同时放行，容忍这种短暂超发，不做全局排队。
    pub async fn await_slot(&self) {
        let wait_ms = {
            let last = self.last_request_at.lock();
            match *last {
                Some(t) => (t + self.min_interval_ms) - self.clock.now_millis(),
                None => 0,
            }
        };

        if wait_ms > 0 {
            trace!("Rate limiter waiting {}ms before next fetch", wait_ms);
            self.clock.sleep(Duration::from_millis(wait_ms as u64)).await;
        }

        *self.last_request_at.lock() = Some(self.clock.now_millis());
    }
}
