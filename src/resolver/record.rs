//! 位置数据模型
//!
//! 上游响应的类型化视图与对外返回的位置记录。
//! 所有字段都是显式的 Option：缺失语义是"未知"，不与 0 值混淆。

use serde::{Deserialize, Serialize};

/// 解析后的地理位置记录
///
/// 所有字段默认缺失（"空记录"）。序列化时缺失字段不输出。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl LocationRecord {
    /// 从上游响应构造
    ///
    /// 空字符串视为缺失。数值坐标原样保留：0.0 是合法坐标，
    /// 不做 falsy 过滤。
    pub fn from_provider(resp: ProviderResponse) -> Self {
        Self {
            country: non_empty(resp.country),
            region: non_empty(resp.region_name).or(non_empty(resp.region)),
            city: non_empty(resp.city),
            latitude: resp.lat,
            longitude: resp.lon,
            timezone: non_empty(resp.timezone),
        }
    }

    /// 所有字段均缺失
    pub fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.region.is_none()
            && self.city.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.timezone.is_none()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// 上游 API 响应体（ip-api.com 格式）
///
/// 成功时返回各地理字段，失败时返回:
/// `{"status": "fail", "message": "..."}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
    pub region: Option<String>,
    #[serde(rename = "regionName")]
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    #[serde(rename = "as")]
    pub autonomous_system: Option<String>,
}

impl ProviderResponse {
    /// 上游业务失败时返回失败消息
    ///
    /// 失败状态嵌在响应体里，与 HTTP 传输状态无关。
    pub fn failure_message(&self) -> Option<&str> {
        if self.status.as_deref() == Some("fail") {
            Some(self.message.as_deref().unwrap_or("unknown provider error"))
        } else {
            None
        }
    }
}

/// 批量解析的单项结果
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedEntry {
    pub ip: String,
    pub location: LocationRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
