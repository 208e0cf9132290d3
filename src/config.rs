//! 設定: 履歴ストアの調整値と、ユーザー設定（最後に選んだ都道府県）の保存。
//!
//! ## バージョニング方針
//!
//! - `SETTINGS_VERSION`: 現在の設定フォーマットバージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//!
//! `MIN_COMPATIBLE_VERSION` 未満の設定や壊れた JSON は削除し、デフォルトに戻す。

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::region::{self, DEFAULT_REGION_CODE};
use crate::storage::StoragePort;

/// 履歴の localStorage キー。
pub const HISTORY_STORAGE_KEY: &str = "naishin_history_v1";

/// ユーザー設定の localStorage キー。
pub const SETTINGS_STORAGE_KEY: &str = "naishin_settings";

/// 履歴ストア設定の上書き (JSON) の localStorage キー。
pub const HISTORY_CONFIG_STORAGE_KEY: &str = "naishin_history_config";

const SETTINGS_VERSION: u32 = 1;
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// 重複判定の時間窓の上限 (1年)。これより大きい値は丸める。
pub const MAX_DEDUPE_WINDOW_SECS: i64 = 365 * 24 * 60 * 60;

/// 履歴ストアの調整値。
///
/// 重複判定の時間窓 (10分) と保存件数の上限 (30件) は製品上の定数であり、
/// 不変条件ではない。`#[serde(default)]` なので一部だけ上書きした JSON も読める。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub storage_key: String,
    pub max_entries: usize,
    pub dedupe_window_secs: i64,
    pub memo_max_chars: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            storage_key: HISTORY_STORAGE_KEY.to_string(),
            max_entries: 30,
            dedupe_window_secs: 10 * 60,
            memo_max_chars: 60,
        }
    }
}

impl HistoryConfig {
    /// JSON で一部を上書きする。パースに失敗したら Err。
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// `[0, MAX_DEDUPE_WINDOW_SECS]` に丸めた時間窓。負の値は 0 (重複判定なし)。
    pub fn dedupe_window(&self) -> TimeDelta {
        let secs = self.dedupe_window_secs.clamp(0, MAX_DEDUPE_WINDOW_SECS);
        TimeDelta::try_seconds(secs).unwrap_or_default()
    }
}

/// 永続化するユーザー設定。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub region_code: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            region_code: DEFAULT_REGION_CODE.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SettingsEnvelope {
    version: u32,
    settings: UserSettings,
}

fn try_load(storage: &impl StoragePort) -> Result<Option<UserSettings>, ConfigError> {
    let Some(json) = storage.get(SETTINGS_STORAGE_KEY)? else {
        return Ok(None);
    };
    let envelope: SettingsEnvelope = serde_json::from_str(&json)?;
    if envelope.version < MIN_COMPATIBLE_VERSION {
        return Err(ConfigError::Incompatible {
            saved: envelope.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    let mut settings = envelope.settings;
    if !region::is_known(&settings.region_code) {
        log::warn!(
            "naishin: 未知の都道府県コード `{}` を {} に戻します",
            settings.region_code,
            DEFAULT_REGION_CODE
        );
        settings.region_code = DEFAULT_REGION_CODE.to_string();
    }
    Ok(Some(settings))
}

/// 設定を読み込む。無い・壊れている・古すぎる場合はデフォルトを返す
/// （壊れたデータ・古すぎるデータは削除する）。
pub fn load_settings(storage: &impl StoragePort) -> UserSettings {
    match try_load(storage) {
        Ok(Some(settings)) => settings,
        Ok(None) => UserSettings::default(),
        Err(ConfigError::Storage(e)) => {
            log::warn!("naishin: 設定の読み込みに失敗: {e}");
            UserSettings::default()
        }
        Err(e) => {
            log::warn!("naishin: 設定データを破棄します: {e}");
            if let Err(e) = storage.remove(SETTINGS_STORAGE_KEY) {
                log::warn!("naishin: 設定データの削除に失敗: {e}");
            }
            UserSettings::default()
        }
    }
}

/// 履歴ストアの調整値を読む。上書きが無い・読めない場合はデフォルト。
pub fn load_history_config(storage: &impl StoragePort) -> HistoryConfig {
    let json = match storage.get(HISTORY_CONFIG_STORAGE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return HistoryConfig::default(),
        Err(e) => {
            log::warn!("naishin: 履歴設定の読み込みに失敗: {e}");
            return HistoryConfig::default();
        }
    };
    HistoryConfig::from_json(&json).unwrap_or_else(|e| {
        log::warn!("naishin: 履歴設定を無視します: {e}");
        HistoryConfig::default()
    })
}

/// 設定を保存する。失敗時はログに出して false。
pub fn save_settings(storage: &impl StoragePort, settings: &UserSettings) -> bool {
    let envelope = SettingsEnvelope {
        version: SETTINGS_VERSION,
        settings: settings.clone(),
    };
    let result = serde_json::to_string(&envelope)
        .map_err(ConfigError::from)
        .and_then(|json| Ok(storage.set(SETTINGS_STORAGE_KEY, &json)?));
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("naishin: 設定の保存に失敗: {e}");
            false
        }
    }
}
