//! 位置解析服务
//!
//! 编排流程：分类 → 缓存查询 → 速率限制 → 外部查询 → 格式化 → 缓存写入。
//! 解析器实例显式构造并独占自己的缓存和速率限制器状态，
//! 生命周期由持有者决定，不使用全局单例。

pub mod fetch;
pub mod rate_limiter;
pub mod record;

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::cache::{CacheStats, LocationCache};
use crate::config::ResolverConfig;
use crate::errors::GeolocatorError;
use crate::system::{Clock, SystemClock};
use crate::utils::ip::is_private_or_local;

use fetch::{IpApiFetcher, LocationFetch};
use rate_limiter::RateLimiter;
pub use record::{LocationRecord, ProviderResponse, ResolvedEntry};

/// 位置解析器
///
/// 独占一份缓存和速率限制器。方法都取 `&self`，内部锁只在
/// 非挂起的临界区内持有：缓存命中和私有地址短路不会被正在
/// 等待速率槽位或在途请求的调用方阻塞。
pub struct LocationResolver {
    cache: LocationCache,
    rate_limiter: RateLimiter,
    fetcher: Arc<dyn LocationFetch>,
}

impl LocationResolver {
    /// 使用默认的外部 API fetcher 和系统时钟构建
    pub fn new(config: ResolverConfig) -> Self {
        let fetcher = Arc::new(IpApiFetcher::new(
            &config.geoip_api_url,
            config.fetch_timeout_ms,
        ));
        Self::with_parts(config, fetcher, Arc::new(SystemClock))
    }

    /// 注入 fetcher 与时钟（测试接缝）
    pub fn with_parts(
        config: ResolverConfig,
        fetcher: Arc<dyn LocationFetch>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        debug!("LocationResolver initialized with {} fetcher", fetcher.name());
        Self {
            cache: LocationCache::new(
                config.cache_expiry_ms,
                config.cache_max_entries,
                Arc::clone(&clock),
            ),
            rate_limiter: RateLimiter::new(config.rate_limit_interval_ms, clock),
            fetcher,
        }
    }

    /// 解析单个 IP 的地理位置
    ///
    /// 全函数契约：总是返回一个 LocationRecord。私有/本地地址直接
    /// 返回空记录；查询失败（超时、传输错误、上游报错、响应不可
    /// 解析）记日志后同样返回空记录，从不向调用方抛错。
    /// 只有成功结果会进入缓存。
    pub async fn resolve_location(&self, ip: &str) -> LocationRecord {
        if is_private_or_local(ip) {
            trace!("{} is private/local, skipping external lookup", ip);
            return LocationRecord::default();
        }

        if let Some(hit) = self.cache.get(ip) {
            trace!("Location cache hit for {}", ip);
            return hit;
        }

        self.rate_limiter.await_slot().await;

        match self.fetcher.fetch(ip).await {
            Ok(raw) => {
                if let Some(msg) = raw.failure_message() {
                    let err = GeolocatorError::provider_failure(msg);
                    warn!("Location lookup for {} failed: {}", ip, err);
                    return LocationRecord::default();
                }
                let record = LocationRecord::from_provider(raw);
                self.cache.put(ip, record.clone());
                record
            }
            Err(e) => {
                warn!("Location lookup for {} failed: {}", ip, e);
                LocationRecord::default()
            }
        }
    }

    /// 批量解析
    ///
    /// 按输入顺序串行解析，天然遵守速率限制，不需要额外协调。
    /// 单个地址的失败不会中断后续地址。`resolve_location` 本身
    /// 从不失败，error 字段保留在结果结构里维持批量接口的形状。
    pub async fn batch_resolve_locations(&self, ips: &[String]) -> Vec<ResolvedEntry> {
        let mut results = Vec::with_capacity(ips.len());
        for ip in ips {
            let location = self.resolve_location(ip).await;
            results.push(ResolvedEntry {
                ip: ip.clone(),
                location,
                error: None,
            });
        }
        results
    }

    /// 清空缓存
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// 缓存统计
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
