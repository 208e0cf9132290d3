//! 内申点 (naishin-ten) calculator.
//!
//! The scoring core (`region`, `scoring`, `analyzer`, `compare`) is pure and
//! synchronous. `history` and `config` persist through an injected
//! [`storage::StoragePort`], so everything except the `wasm32` storage and
//! cookie backends runs under plain `cargo test`.

pub mod analyzer;
pub mod app;
pub mod compare;
pub mod config;
pub mod consent;
pub mod error;
pub mod history;
pub mod input;
pub mod logging;
pub mod region;
pub mod scoring;
pub mod share;
pub mod storage;
pub mod subject;
pub mod time;
pub mod widgets;

pub use region::{get_region_by_code, RegionConfig, REGIONS};
pub use scoring::{calculate, max_score, percent, rank_for, total_score, RankDefinition, ResultData};
pub use subject::{Category, Scores, Subject};
