//! tracing 구독자 초기화.

use tracing_subscriber::EnvFilter;

/// `-v` 횟수에 따라 로그 레벨을 정한다. `RUST_LOG`가 있으면 그것을 우선한다.
pub fn filter_for(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// 라이브러리와 바이너리 타깃 모두에 같은 레벨을 건다.
pub fn default_directive(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("palazon_calculator={level},palazon={level}")
}

/// 로그는 표준 오류로 보낸다. 표준 출력은 폼 화면이 쓴다.
pub fn init_logging(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbose))
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_line_number(verbose >= 3)
        .init();
}
