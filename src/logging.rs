//! ログ初期化
//!
//! 診断ログは stderr に出す（stdout は結果表示と `--json` 出力用）。
//! RUST_LOG があればそちらを優先する。

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "photo_verdict=debug,photo_verdict_common=debug"
    } else {
        "warn"
    }
}

pub fn init_logger(verbose: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}
