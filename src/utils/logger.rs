use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 未設定 RUST_LOG 時的過濾規則。
///
/// verbose 時打開解析流程 (`core`) 與 lead store 的 debug 訊息，其他依賴只留 warn，
/// 避免 reqwest/hyper 的連線細節蓋過解析結果。
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,customs_office_resolver=info,customs_office_resolver::core=debug,customs_office_resolver::adapters=debug"
    } else {
        "warn,customs_office_resolver=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                // stdout 留給報告輸出
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(env_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .json(), // 服務部署時以 JSON 格式輸出，方便日誌收集
        )
        .init();
}
