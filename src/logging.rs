//! ログの初期化。ブラウザでは wasm-logger で DevTools の console に、
//! それ以外では env_logger で stderr に出す (`RUST_LOG` で上書き可)。

pub const DEFAULT_LEVEL: log::Level = log::Level::Info;

/// 起動時に一度だけ呼ぶ。
#[cfg(target_arch = "wasm32")]
pub fn init() {
    wasm_logger::init(wasm_logger::Config::new(DEFAULT_LEVEL));
}

/// 起動時に呼ぶ。2回目以降は何もしない。
#[cfg(not(target_arch = "wasm32"))]
pub fn init() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LEVEL.as_str()),
    )
    .format_timestamp(None)
    .try_init();
}
