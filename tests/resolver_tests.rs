//! LocationResolver 集成测试
//!
//! 用模拟时钟和模拟 fetcher 验证解析流程：短路、缓存、过期、
//! FIFO 淘汰、速率限制和批量隔离，全程不触网、不真实等待。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use geolocator::config::ResolverConfig;
use geolocator::errors::GeolocatorError;
use geolocator::resolver::fetch::LocationFetch;
use geolocator::resolver::{LocationResolver, ProviderResponse};
use geolocator::system::Clock;

/// sleep 直接推进时间的模拟时钟
struct MockClock {
    now: AtomicI64,
}

impl MockClock {
    fn new() -> Self {
        Self {
            now: AtomicI64::new(0),
        }
    }

    fn advance(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

#[async_trait]
impl Clock for MockClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration.as_millis() as i64);
    }
}

fn success_response(ip: &str) -> ProviderResponse {
    serde_json::from_value(json!({
        "status": "success",
        "country": "United States",
        "countryCode": "US",
        "region": "VA",
        "regionName": "Virginia",
        "city": format!("city-{ip}"),
        "lat": 39.03,
        "lon": -77.5,
        "timezone": "America/New_York"
    }))
    .unwrap()
}

/// 记录每次请求开始时间的模拟 fetcher
struct MockFetch {
    clock: Arc<MockClock>,
    calls: AtomicUsize,
    fetch_starts: Mutex<Vec<i64>>,
    provider_fail: Mutex<HashMap<String, String>>,
    transport_fail: Mutex<HashSet<String>>,
}

impl MockFetch {
    fn new(clock: Arc<MockClock>) -> Self {
        Self {
            clock,
            calls: AtomicUsize::new(0),
            fetch_starts: Mutex::new(Vec::new()),
            provider_fail: Mutex::new(HashMap::new()),
            transport_fail: Mutex::new(HashSet::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fetch_starts(&self) -> Vec<i64> {
        self.fetch_starts.lock().clone()
    }

    fn set_provider_fail(&self, ip: &str, message: &str) {
        self.provider_fail
            .lock()
            .insert(ip.to_string(), message.to_string());
    }

    fn set_transport_fail(&self, ip: &str) {
        self.transport_fail.lock().insert(ip.to_string());
    }
}

#[async_trait]
impl LocationFetch for MockFetch {
    async fn fetch(&self, ip: &str) -> geolocator::errors::Result<ProviderResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fetch_starts.lock().push(self.clock.now_millis());

        if self.transport_fail.lock().contains(ip) {
            return Err(GeolocatorError::fetch_transport(format!(
                "connection refused: {ip}"
            )));
        }
        let provider_fail = self.provider_fail.lock().get(ip).cloned();
        if let Some(msg) = provider_fail {
            return Ok(serde_json::from_value(json!({
                "status": "fail",
                "message": msg
            }))
            .unwrap());
        }
        Ok(success_response(ip))
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}

fn test_resolver(config: ResolverConfig) -> (LocationResolver, Arc<MockFetch>, Arc<MockClock>) {
    let clock = Arc::new(MockClock::new());
    let fetch = Arc::new(MockFetch::new(Arc::clone(&clock)));
    let resolver = LocationResolver::with_parts(
        config,
        Arc::clone(&fetch) as Arc<dyn LocationFetch>,
        Arc::clone(&clock) as Arc<dyn Clock>,
    );
    (resolver, fetch, clock)
}

#[tokio::test]
async fn test_private_addresses_short_circuit() {
    let (resolver, fetch, _clock) = test_resolver(ResolverConfig::default());

    for ip in [
        "10.0.0.5",
        "127.0.0.1",
        "192.168.1.1",
        "172.16.0.1",
        "169.254.10.10",
        "",
        "::1",
        "fd00::1",
    ] {
        let record = resolver.resolve_location(ip).await;
        assert!(record.is_empty(), "Expected empty record for {:?}", ip);
    }

    // 既没有触网也没有进缓存
    assert_eq!(fetch.call_count(), 0);
    assert_eq!(resolver.cache_stats().size, 0);
}

#[tokio::test]
async fn test_repeat_resolution_hits_cache() {
    let (resolver, fetch, _clock) = test_resolver(ResolverConfig::default());

    let first = resolver.resolve_location("8.8.8.8").await;
    let second = resolver.resolve_location("8.8.8.8").await;

    assert_eq!(fetch.call_count(), 1);
    assert_eq!(first, second);
    assert_eq!(first.city.as_deref(), Some("city-8.8.8.8"));
}

#[tokio::test]
async fn test_expiry_forces_refetch() {
    let (resolver, fetch, clock) = test_resolver(ResolverConfig::default());

    resolver.resolve_location("8.8.8.8").await;
    assert_eq!(fetch.call_count(), 1);

    // 过期窗口内仍然命中
    clock.advance(86_400_000);
    resolver.resolve_location("8.8.8.8").await;
    assert_eq!(fetch.call_count(), 1);

    clock.advance(1);
    resolver.resolve_location("8.8.8.8").await;
    assert_eq!(fetch.call_count(), 2);
}

#[tokio::test]
async fn test_fifo_eviction_under_capacity() {
    let config = ResolverConfig {
        cache_max_entries: 3,
        ..Default::default()
    };
    let (resolver, fetch, _clock) = test_resolver(config);

    for ip in ["1.1.1.1", "2.2.2.2", "3.3.3.3", "4.4.4.4"] {
        resolver.resolve_location(ip).await;
    }
    assert_eq!(fetch.call_count(), 4);
    assert_eq!(resolver.cache_stats().size, 3);

    // 最新的还在缓存里
    resolver.resolve_location("4.4.4.4").await;
    assert_eq!(fetch.call_count(), 4);

    // 最早插入的被淘汰，需要重新查询
    resolver.resolve_location("1.1.1.1").await;
    assert_eq!(fetch.call_count(), 5);
}

#[tokio::test]
async fn test_fetch_starts_spaced_by_rate_limit() {
    let (resolver, fetch, _clock) = test_resolver(ResolverConfig::default());

    resolver.resolve_location("8.8.8.8").await;
    resolver.resolve_location("1.1.1.1").await;
    resolver.resolve_location("9.9.9.9").await;

    let starts = fetch.fetch_starts();
    assert_eq!(starts.len(), 3);
    for pair in starts.windows(2) {
        assert!(
            pair[1] - pair[0] >= 4000,
            "Fetch starts {} and {} closer than the rate limit interval",
            pair[0],
            pair[1]
        );
    }
}

#[tokio::test]
async fn test_cache_hit_skips_rate_limiter() {
    let (resolver, fetch, clock) = test_resolver(ResolverConfig::default());

    resolver.resolve_location("8.8.8.8").await;
    let after_fetch = clock.now_millis();

    // 缓存命中不等待速率槽位，时间不推进
    resolver.resolve_location("8.8.8.8").await;
    assert_eq!(clock.now_millis(), after_fetch);
    assert_eq!(fetch.call_count(), 1);
}

#[tokio::test]
async fn test_provider_failure_returns_empty_and_is_not_cached() {
    let (resolver, fetch, _clock) = test_resolver(ResolverConfig::default());
    fetch.set_provider_fail("203.0.113.7", "invalid query");

    let record = resolver.resolve_location("203.0.113.7").await;
    assert!(record.is_empty());
    assert_eq!(resolver.cache_stats().size, 0);

    // 失败结果没有被缓存，下次调用会再次尝试
    resolver.resolve_location("203.0.113.7").await;
    assert_eq!(fetch.call_count(), 2);
}

#[tokio::test]
async fn test_transport_failure_returns_empty() {
    let (resolver, fetch, _clock) = test_resolver(ResolverConfig::default());
    fetch.set_transport_fail("203.0.113.9");

    let record = resolver.resolve_location("203.0.113.9").await;
    assert!(record.is_empty());
    assert_eq!(fetch.call_count(), 1);
    assert_eq!(resolver.cache_stats().size, 0);
}

#[tokio::test]
async fn test_batch_preserves_order_and_isolates_failures() {
    let (resolver, fetch, _clock) = test_resolver(ResolverConfig::default());
    fetch.set_transport_fail("bad-ip");

    let ips = vec![
        "8.8.8.8".to_string(),
        "10.0.0.5".to_string(),
        "bad-ip".to_string(),
    ];
    let results = resolver.batch_resolve_locations(&ips).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].ip, "8.8.8.8");
    assert_eq!(results[1].ip, "10.0.0.5");
    assert_eq!(results[2].ip, "bad-ip");

    // 公网地址成功解析
    assert_eq!(results[0].location.city.as_deref(), Some("city-8.8.8.8"));
    assert!(results[0].error.is_none());

    // 私有地址短路：空记录、无 error、未触网
    assert!(results[1].location.is_empty());
    assert!(results[1].error.is_none());

    // 失败地址不会中断批次；resolve_location 在内部吞掉失败，
    // 所以现行契约下 error 字段同样为空
    assert!(results[2].location.is_empty());
    assert!(results[2].error.is_none());

    // bad-ip 触网一次（8.8.8.8 一次 + bad-ip 一次）
    assert_eq!(fetch.call_count(), 2);
}

#[tokio::test]
async fn test_cache_stats_counts_unique_resolutions() {
    let (resolver, _fetch, _clock) = test_resolver(ResolverConfig::default());

    for ip in ["1.1.1.1", "2.2.2.2", "3.3.3.3", "4.4.4.4", "5.5.5.5"] {
        resolver.resolve_location(ip).await;
    }

    let stats = resolver.cache_stats();
    assert_eq!(stats.size, 5);
    assert_eq!(stats.max_entries, 1000);
    assert_eq!(stats.expiry_ms, 86_400_000);
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let (resolver, fetch, _clock) = test_resolver(ResolverConfig::default());

    resolver.resolve_location("8.8.8.8").await;
    assert_eq!(resolver.cache_stats().size, 1);

    resolver.clear_cache();
    assert_eq!(resolver.cache_stats().size, 0);

    resolver.resolve_location("8.8.8.8").await;
    assert_eq!(fetch.call_count(), 2);
}
