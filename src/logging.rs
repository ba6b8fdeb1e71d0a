// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认日志过滤指令
///
/// 本 crate 输出 info,第三方依赖压到 warn。
/// 导入阶段的逐行日志（跳过畸形行等）在 debug 级别,
/// 需要时通过 RUST_LOG 打开。
const DEFAULT_DIRECTIVES: &str = "warn,stockwise=info";

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: warn,stockwise=info）
///   例如: RUST_LOG=debug 或 RUST_LOG=stockwise=trace
///
/// # 示例
/// ```no_run
/// use stockwise::logging;
/// logging::init();
/// ```
pub fn init() {
    // 从环境变量读取日志级别，缺省回退默认指令
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    // 配置日志格式
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// 初始化测试环境的日志系统
///
/// 放开本 crate 的 debug 日志，便于调试导入与预测链路
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("stockwise=debug"))
        .with_test_writer()
        .try_init();
}
