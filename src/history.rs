//! 計算履歴の保存/読み込み。
//!
//! ## 保存形式
//!
//! `HistoryConfig::storage_key` の下に JSON 配列を1つ置く。新しい順。
//!
//! ```json
//! [{ "id": "...", "savedAt": "2026-10-15T01:02:03.456Z", "mode": "tokyo",
//!    "scores": { "japanese": 3, ... }, "memo": "期末後" }]
//! ```
//!
//! ## 読み込み方針
//!
//! - 1件ずつ検証し、壊れた行（id 欠落、日時不正、評定が範囲外、未知の mode）は黙って捨てる。
//! - 残った行は保存時刻の新しい順に並べ直す（同時刻は保存順のまま）。
//! - 配列として読めない場合はデータごと削除し、空として扱う。
//! - ストレージが使えない場合は空 / `None` を返す。呼び出し側にエラーは見せない。
//!
//! ## 重複の扱い
//!
//! 直近の1件と `(mode, 評定)` が同じで、保存時刻が時間窓 (既定10分) 以内なら
//! 新しい行は作らない。新しいメモが渡された場合だけメモを上書きする。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::config::HistoryConfig;
use crate::error::HistoryError;
use crate::region;
use crate::scoring::{self, RankDefinition};
use crate::storage::StoragePort;
use crate::subject::{Scores, ALL_SUBJECTS, MAX_GRADE, MIN_GRADE};
use crate::time;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedHistoryEntry {
    pub id: String,
    #[serde(serialize_with = "serialize_iso")]
    pub saved_at: DateTime<Utc>,
    /// 計算に使った都道府県コード。
    pub mode: String,
    pub scores: Scores,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

fn serialize_iso<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time::to_iso(*at))
}

impl SavedHistoryEntry {
    pub fn signature(&self) -> String {
        entry_signature(&self.mode, &self.scores)
    }
}

/// 検証前の1行。型が合わない行は `from_value` の時点で落ちる。
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    id: Option<String>,
    saved_at: Option<String>,
    mode: Option<String>,
    scores: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    memo: Option<String>,
}

/// `append` の引数。
#[derive(Debug, Clone)]
pub struct AppendRequest<'a> {
    pub mode: &'a str,
    pub scores: Scores,
    pub memo: Option<&'a str>,
    /// 省略時は現在時刻。
    pub now: Option<DateTime<Utc>>,
}

impl<'a> AppendRequest<'a> {
    pub fn new(mode: &'a str, scores: Scores) -> Self {
        Self {
            mode,
            scores,
            memo: None,
            now: None,
        }
    }

    pub fn memo(mut self, memo: &'a str) -> Self {
        self.memo = Some(memo);
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}

/// 推移グラフ用の1点。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    #[serde(serialize_with = "serialize_iso")]
    pub saved_at: DateTime<Utc>,
    pub region_code: String,
    pub total: u32,
    pub max: u32,
    pub percent: f64,
    pub rank: &'static RankDefinition,
}

/// 重複判定用のシグネチャ。科目キーをソートして `mode|key:grade,...` にする。
pub fn entry_signature(mode: &str, scores: &Scores) -> String {
    let mut pairs: Vec<(&str, u8)> = scores.iter().map(|(s, g)| (s.key(), g)).collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
    let body = pairs
        .iter()
        .map(|(k, g)| format!("{k}:{g}"))
        .collect::<Vec<_>>()
        .join(",");
    format!("{mode}|{body}")
}

/// 前後の空白を除き `max_chars` 文字に切り詰める。空になったら `None`。
pub fn sanitize_memo(memo: Option<&str>, max_chars: usize) -> Option<String> {
    let trimmed: String = memo?.trim().chars().take(max_chars).collect();
    let trimmed = trimmed.trim_end().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn strict_scores(map: &serde_json::Map<String, serde_json::Value>) -> Option<Scores> {
    let mut scores = Scores::default();
    for subject in ALL_SUBJECTS {
        let grade = map.get(subject.key())?.as_u64()?;
        if !(MIN_GRADE as u64..=MAX_GRADE as u64).contains(&grade) {
            return None;
        }
        scores.set(subject, grade as i64);
    }
    Some(scores)
}

fn validate_entry(value: serde_json::Value, memo_max_chars: usize) -> Option<SavedHistoryEntry> {
    let raw: RawEntry = serde_json::from_value(value).ok()?;
    let id = raw.id.filter(|id| !id.trim().is_empty())?;
    let saved_at = time::parse_iso(raw.saved_at.as_deref()?)?;
    let mode = raw.mode.filter(|m| region::is_known(m))?;
    let scores = strict_scores(raw.scores.as_ref()?)?;
    Some(SavedHistoryEntry {
        id,
        saved_at,
        mode,
        scores,
        memo: sanitize_memo(raw.memo.as_deref(), memo_max_chars),
    })
}

/// 保存済み JSON を検証しながら読む。配列として読めなければ Err。
fn parse_entries(json: &str, memo_max_chars: usize) -> Result<Vec<SavedHistoryEntry>, serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let total = values.len();
    let mut entries: Vec<SavedHistoryEntry> = values
        .into_iter()
        .filter_map(|v| validate_entry(v, memo_max_chars))
        .collect();
    if entries.len() < total {
        log::warn!(
            "naishin: 不正な履歴 {} 件を読み飛ばしました",
            total - entries.len()
        );
    }
    sort_newest_first(&mut entries);
    Ok(entries)
}

/// 保存時刻の新しい順。安定ソートなので同時刻の行は元の順を保つ。
fn sort_newest_first(entries: &mut [SavedHistoryEntry]) {
    entries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
}

fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}

fn next_rng(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

/// 過去の計算結果の保存先。
pub struct HistoryStore<S: StoragePort> {
    storage: S,
    config: HistoryConfig,
    id_seed: u64,
}

impl<S: StoragePort> HistoryStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, HistoryConfig::default())
    }

    pub fn with_config(storage: S, config: HistoryConfig) -> Self {
        Self {
            storage,
            config,
            id_seed: time::now_millis() as u64,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 新しい順の履歴。壊れたデータは空として扱う。
    pub fn read(&self) -> Vec<SavedHistoryEntry> {
        match self.load_entries() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("naishin: 履歴の読み込みに失敗: {e}");
                Vec::new()
            }
        }
    }

    pub fn find(&self, id: &str) -> Option<SavedHistoryEntry> {
        self.read().into_iter().find(|e| e.id == id)
    }

    /// 履歴に1件追加する。重複なら既存の行を返す。失敗時は `None`。
    pub fn append(&mut self, request: AppendRequest<'_>) -> Option<SavedHistoryEntry> {
        match self.try_append(request) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("naishin: 履歴の保存に失敗: {e}");
                None
            }
        }
    }

    /// メモを設定する（空文字で削除）。id が無ければ `None`。
    pub fn update_memo(&self, id: &str, memo: &str) -> Option<SavedHistoryEntry> {
        match self.try_update_memo(id, memo) {
            Ok(entry) => Some(entry),
            Err(HistoryError::NotFound(_)) => None,
            Err(e) => {
                log::warn!("naishin: メモの更新に失敗: {e}");
                None
            }
        }
    }

    /// 1件削除する。削除できたら true。
    pub fn remove(&self, id: &str) -> bool {
        let result = self.load_entries().and_then(|mut entries| {
            let before = entries.len();
            entries.retain(|e| e.id != id);
            if entries.len() == before {
                return Ok(false);
            }
            self.persist(&entries)?;
            Ok(true)
        });
        result.unwrap_or_else(|e| {
            log::warn!("naishin: 履歴の削除に失敗: {e}");
            false
        })
    }

    /// 履歴をすべて削除する。
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(&self.config.storage_key) {
            log::warn!("naishin: 履歴の削除に失敗: {e}");
        }
    }

    fn load_entries(&self) -> Result<Vec<SavedHistoryEntry>, HistoryError> {
        let Some(json) = self.storage.get(&self.config.storage_key)? else {
            return Ok(Vec::new());
        };
        match parse_entries(&json, self.config.memo_max_chars) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                log::warn!("naishin: 履歴データのパースに失敗（破棄します）: {e}");
                if let Err(e) = self.storage.remove(&self.config.storage_key) {
                    log::warn!("naishin: 壊れた履歴データの削除に失敗: {e}");
                }
                Ok(Vec::new())
            }
        }
    }

    fn persist(&self, entries: &[SavedHistoryEntry]) -> Result<(), HistoryError> {
        let json = serde_json::to_string(entries)?;
        self.storage.set(&self.config.storage_key, &json)?;
        Ok(())
    }

    fn try_append(&mut self, request: AppendRequest<'_>) -> Result<SavedHistoryEntry, HistoryError> {
        if !region::is_known(request.mode) {
            return Err(HistoryError::UnknownMode(request.mode.to_string()));
        }
        let scores = request.scores.sanitized();
        let memo = sanitize_memo(request.memo, self.config.memo_max_chars);
        let now = truncate_to_millis(request.now.unwrap_or_else(time::now_utc));
        let signature = entry_signature(request.mode, &scores);

        let mut entries = self.load_entries()?;

        if let Some(latest) = entries.first_mut() {
            let elapsed = now.signed_duration_since(latest.saved_at);
            let window = self.config.dedupe_window();
            if latest.signature() == signature && elapsed <= window && elapsed >= -window {
                if memo.is_none() {
                    return Ok(latest.clone());
                }
                latest.memo = memo;
                let updated = latest.clone();
                self.persist(&entries)?;
                log::info!("naishin: 直近の履歴と同じ内容のためメモのみ更新しました");
                return Ok(updated);
            }
        }

        let entry = SavedHistoryEntry {
            id: self.next_id(now, &entries),
            saved_at: now,
            mode: request.mode.to_string(),
            scores,
            memo,
        };
        entries.insert(0, entry.clone());
        sort_newest_first(&mut entries);
        entries.truncate(self.config.max_entries);
        self.persist(&entries)?;
        Ok(entry)
    }

    fn try_update_memo(&self, id: &str, memo: &str) -> Result<SavedHistoryEntry, HistoryError> {
        let mut entries = self.load_entries()?;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| HistoryError::NotFound(id.to_string()))?;
        entry.memo = sanitize_memo(Some(memo), self.config.memo_max_chars);
        let updated = entry.clone();
        self.persist(&entries)?;
        Ok(updated)
    }

    fn next_id(&mut self, now: DateTime<Utc>, existing: &[SavedHistoryEntry]) -> String {
        loop {
            self.id_seed = next_rng(self.id_seed);
            let id = format!(
                "{:x}-{:06x}",
                now.timestamp_millis(),
                (self.id_seed >> 40) & 0xff_ffff
            );
            if existing.iter().all(|e| e.id != id) {
                return id;
            }
        }
    }
}

/// 古い順の推移データ。
pub fn trend(entries: &[SavedHistoryEntry]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = entries
        .iter()
        .map(|e| {
            let result = scoring::calculate(&e.scores, &e.mode);
            TrendPoint {
                saved_at: e.saved_at,
                region_code: e.mode.clone(),
                total: result.total,
                max: result.max,
                percent: result.percent,
                rank: result.rank,
            }
        })
        .collect();
    points.sort_by_key(|p| p.saved_at);
    points
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::storage::MemoryStorage;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_append_twice_is_idempotent(
            grades in prop::array::uniform9(-3i64..9),
            offset_secs in 0i64..=600,
        ) {
            let mut h = HistoryStore::new(MemoryStorage::new());
            let t0 = time::parse_iso("2026-10-15T09:00:00Z").unwrap();
            let scores = Scores::from_grades(grades);
            h.append(AppendRequest::new("tokyo", scores).at(t0)).unwrap();
            h.append(AppendRequest::new("tokyo", scores).at(t0 + chrono::Duration::seconds(offset_secs))).unwrap();
            prop_assert_eq!(h.read().len(), 1);
        }

        #[test]
        fn prop_roundtrip_returns_sanitized_scores(
            raw in prop::array::uniform9(0u8..=20),
        ) {
            let scores = Scores {
                japanese: raw[0], math: raw[1], english: raw[2], science: raw[3], social: raw[4],
                music: raw[5], art: raw[6], pe: raw[7], tech: raw[8],
            };
            let mut h = HistoryStore::new(MemoryStorage::new());
            let e = h.append(AppendRequest::new("osaka", scores)).unwrap();
            let found = h.find(&e.id).unwrap();
            prop_assert_eq!(found.scores, scores.sanitized());
            prop_assert_eq!(found.scores.sanitized(), found.scores);
        }
    }
}
