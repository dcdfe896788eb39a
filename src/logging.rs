//! tracing 구독자 초기화.

use tracing_subscriber::EnvFilter;

/// stderr로 로그를 내보내는 구독자를 설치한다.
///
/// `RUST_LOG`가 있으면 그 값을, 없으면 설정의 `log_filter`를 쓴다.
/// 이미 설치된 경우(테스트 등) 조용히 무시한다.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
