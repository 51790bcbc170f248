//! IP 地址分类工具
//!
//! 判断一个地址是否为私有/本地地址。私有地址不会产生有意义的
//! 地理位置结果，解析器对它们直接短路，不消耗 API 配额。

use std::net::IpAddr;

/// 检查 IP 字符串是否为私有地址或 localhost
///
/// 纯函数，无副作用。规则：
/// - 空白/缺失地址 → 视为本地
/// - IPv4：loopback、RFC1918（10/8、172.16/12、192.168/16）、
///   link-local（169.254/16）、unspecified
/// - IPv6：loopback、ULA（fc00::/7）、link-local（fe80::/10）、unspecified
/// - 无法解析的非空字符串不算私有（交给上游 API 去报错）
pub fn is_private_or_local(ip: &str) -> bool {
    if ip.trim().is_empty() {
        return true;
    }

    let Ok(addr) = ip.trim().parse::<IpAddr>() else {
        return false;
    };

    match addr {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            // IPv6 私有地址：
            // - fc00::/7 (ULA, RFC 4193): fc00::/8 + fd00::/8
            // - fe80::/10 (Link-local)
            // - ::1 (Loopback)
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7 (包含 fc00 和 fd00)
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10 (link-local)
        }
    }
}
