//! 配置管理模块
//!
//! 静态配置：启动时从 config.toml 和环境变量加载，运行期间不变。
//! 解析器核心常量（缓存过期时间、容量、速率限制间隔、请求超时）
//! 是固定默认值，不依赖环境。

use serde::Deserialize;

/// 静态配置（启动时加载）
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：GL，分隔符：__
    /// 示例：GL__LOGGING__LEVEL=debug
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        let path = "config.toml";

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 GL，分隔符 __
            .add_source(
                Environment::with_prefix("GL")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 解析器配置
///
/// 核心常量固定，详见各 default 函数。覆盖它们主要用于测试
/// （例如缩小缓存容量来验证淘汰行为）。
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// 缓存过期时间（毫秒，24 小时）
    #[serde(default = "default_cache_expiry_ms")]
    pub cache_expiry_ms: i64,
    /// 缓存最大条目数
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,
    /// 两次外部请求之间的最小间隔（毫秒）
    #[serde(default = "default_rate_limit_interval_ms")]
    pub rate_limit_interval_ms: i64,
    /// 外部请求超时（毫秒）
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// 外部 GeoIP API URL
    /// 使用 {ip} 作为占位符
    #[serde(default = "default_geoip_api_url")]
    pub geoip_api_url: String,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    7
}

fn default_enable_rotation() -> bool {
    true
}

fn default_cache_expiry_ms() -> i64 {
    86_400_000
}

fn default_cache_max_entries() -> usize {
    1000
}

fn default_rate_limit_interval_ms() -> i64 {
    4000
}

fn default_fetch_timeout_ms() -> u64 {
    5000
}

fn default_geoip_api_url() -> String {
    "http://ip-api.com/json/{ip}?fields=status,message,country,countryCode,region,regionName,city,zip,lat,lon,timezone,isp,org,as".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_expiry_ms: default_cache_expiry_ms(),
            cache_max_entries: default_cache_max_entries(),
            rate_limit_interval_ms: default_rate_limit_interval_ms(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            geoip_api_url: default_geoip_api_url(),
        }
    }
}
