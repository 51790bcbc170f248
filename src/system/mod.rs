//! 系统层模块
//!
//! 日志初始化与时钟抽象。

pub mod clock;
pub mod logging;

pub use clock::{Clock, SystemClock};
pub use logging::init_logging;
