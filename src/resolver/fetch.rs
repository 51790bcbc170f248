//! 外部位置查询
//!
//! 使用外部 HTTP API（ip-api.com 格式）查询公网 IP 的地理位置。
//! ureq 是同步客户端，请求放在 spawn_blocking 线程池里执行。

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;
use ureq::Agent;

use super::record::ProviderResponse;
use crate::errors::{GeolocatorError, Result};

/// 位置查询 trait
#[async_trait]
pub trait LocationFetch: Send + Sync {
    /// 向上游发起一次查询，返回解析后的响应体
    ///
    /// 只负责传输和反序列化；上游业务层面的失败状态
    /// （status == "fail"）由调用方检查。
    async fn fetch(&self, ip: &str) -> Result<ProviderResponse>;

    /// 获取 fetcher 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 外部 API fetcher
///
/// `api_url_template` 使用 `{ip}` 作为占位符，
/// 例如: `http://ip-api.com/json/{ip}?fields=status,message,country`
pub struct IpApiFetcher {
    api_url_template: String,
    agent: Agent,
}

impl IpApiFetcher {
    pub fn new(api_url_template: &str, timeout_ms: u64) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_millis(timeout_ms)))
            .build()
            .into();

        Self {
            api_url_template: api_url_template.to_string(),
            agent,
        }
    }

    /// 同步执行 HTTP GET（在 spawn_blocking 中调用）
    ///
    /// 超时由 Agent 的全局超时强制执行，到期后在途请求被中止。
    fn fetch_sync(agent: &Agent, url: &str) -> Result<ProviderResponse> {
        let resp = agent.get(url).call()?;

        resp.into_body()
            .read_json::<ProviderResponse>()
            .map_err(|e| GeolocatorError::response_parse(e.to_string()))
    }
}

#[async_trait]
impl LocationFetch for IpApiFetcher {
    async fn fetch(&self, ip: &str) -> Result<ProviderResponse> {
        let url = self.api_url_template.replace("{ip}", ip);
        let agent = self.agent.clone();

        // 使用 spawn_blocking 在线程池中执行同步 HTTP 请求
        tokio::task::spawn_blocking(move || Self::fetch_sync(&agent, &url))
            .await
            .unwrap_or_else(|e| {
                warn!("Location fetch spawn_blocking failed: {}", e);
                Err(GeolocatorError::fetch_transport(e.to_string()))
            })
    }

    fn name(&self) -> &'static str {
        "IpApi"
    }
}
