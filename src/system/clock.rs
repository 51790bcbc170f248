//! 时钟抽象
//!
//! 缓存过期和速率限制都基于墙钟时间。把时钟做成可注入依赖，
//! 测试可以模拟时间流逝而不必真实等待。

use std::time::Duration;

use async_trait::async_trait;

/// 时钟 trait
///
/// `sleep` 也走时钟：真实实现交给 tokio 定时器，
/// 模拟实现直接推进当前时间。
#[async_trait]
pub trait Clock: Send + Sync {
    /// 当前 Unix 时间戳（毫秒）
    fn now_millis(&self) -> i64;

    /// 挂起当前任务指定时长
    async fn sleep(&self, duration: Duration);
}

/// 系统时钟（生产实现）
#[derive(Debug, Default, Clone)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
        // Unix 毫秒时间戳应该是一个合理的现代时间
        assert!(a > 1_600_000_000_000);
    }
}
