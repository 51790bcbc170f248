use std::fmt;

#[derive(Debug, Clone)]
pub enum GeolocatorError {
    FetchTimeout(String),
    FetchTransport(String),
    ProviderFailure(String),
    ResponseParse(String),
}

impl GeolocatorError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeolocatorError::FetchTimeout(_) => "E001",
            GeolocatorError::FetchTransport(_) => "E002",
            GeolocatorError::ProviderFailure(_) => "E003",
            GeolocatorError::ResponseParse(_) => "E004",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeolocatorError::FetchTimeout(_) => "Fetch Timeout",
            GeolocatorError::FetchTransport(_) => "Fetch Transport Error",
            GeolocatorError::ProviderFailure(_) => "Provider Reported Failure",
            GeolocatorError::ResponseParse(_) => "Response Parse Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeolocatorError::FetchTimeout(msg) => msg,
            GeolocatorError::FetchTransport(msg) => msg,
            GeolocatorError::ProviderFailure(msg) => msg,
            GeolocatorError::ResponseParse(msg) => msg,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeolocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeolocatorError {}

// 便捷的构造函数
impl GeolocatorError {
    pub fn fetch_timeout<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::FetchTimeout(msg.into())
    }

    pub fn fetch_transport<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::FetchTransport(msg.into())
    }

    pub fn provider_failure<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::ProviderFailure(msg.into())
    }

    pub fn response_parse<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::ResponseParse(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<serde_json::Error> for GeolocatorError {
    fn from(err: serde_json::Error) -> Self {
        GeolocatorError::ResponseParse(err.to_string())
    }
}

impl From<ureq::Error> for GeolocatorError {
    fn from(err: ureq::Error) -> Self {
        let msg = err.to_string();
        match err {
            ureq::Error::Timeout(_) => GeolocatorError::FetchTimeout(msg),
            _ => GeolocatorError::FetchTransport(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeolocatorError>;
