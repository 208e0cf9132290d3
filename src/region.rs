//! Prefecture registry: how each jurisdiction weights the nine grades.
//!
//! The table is immutable process-wide data. Multipliers fold in any
//! school-year weighting, so `max_score` is always
//! `5 × (core × 5 + practical × 4)`; `target_grades` only documents which
//! years the prefecture counts.

use crate::subject::Category;

/// Date the bundled figures were last checked against the published guidelines.
pub const LAST_VERIFIED: &str = "2025-04-01";

#[derive(Debug, Clone, PartialEq)]
pub struct RegionConfig {
    /// Unique key, also used as the history `mode`.
    pub code: &'static str,
    pub name: &'static str,
    pub core_multiplier: f64,
    pub practical_multiplier: f64,
    pub max_score: u32,
    /// School years (中1 = 1) that count toward the score.
    pub target_grades: &'static [u8],
    pub note: &'static str,
    pub source: &'static str,
    pub source_url: Option<&'static str>,
    pub last_verified: &'static str,
}

impl RegionConfig {
    pub fn multiplier(&self, category: Category) -> f64 {
        match category {
            Category::Core => self.core_multiplier,
            Category::Practical => self.practical_multiplier,
        }
    }

    /// "中1・中2・中3" style label for `target_grades`.
    pub fn target_grades_label(&self) -> String {
        self.target_grades
            .iter()
            .map(|g| format!("中{g}"))
            .collect::<Vec<_>>()
            .join("・")
    }
}

const fn region(
    code: &'static str,
    name: &'static str,
    core_multiplier: f64,
    practical_multiplier: f64,
    max_score: u32,
    target_grades: &'static [u8],
    note: &'static str,
    source: &'static str,
) -> RegionConfig {
    RegionConfig {
        code,
        name,
        core_multiplier,
        practical_multiplier,
        max_score,
        target_grades,
        note,
        source,
        source_url: None,
        last_verified: LAST_VERIFIED,
    }
}

const ALL_YEARS: &[u8] = &[1, 2, 3];
const YEARS_2_3: &[u8] = &[2, 3];
const YEAR_3: &[u8] = &[3];

const EQUAL_3Y: &str = "中1〜中3の9教科を均等に合算";
const PRACTICAL_X2_3Y: &str = "中1〜中3を合算、実技4教科は2倍";

/// Used for any code not in [`REGIONS`].
pub static DEFAULT_REGION: RegionConfig = region(
    "default",
    "標準（1:1）",
    1.0,
    1.0,
    45,
    YEAR_3,
    "9教科×5段階をそのまま合算",
    "一般的な計算方式",
);

pub static REGIONS: [RegionConfig; 47] = [
    region("hokkaido", "北海道", 7.0, 7.0, 315, ALL_YEARS, "中1×2・中2×2・中3×3 の学習点", "北海道教育委員会 公立高等学校入学者選抜実施要項"),
    region("aomori", "青森県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "青森県教育委員会 入学者選抜実施要項"),
    region("iwate", "岩手県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "岩手県教育委員会 入学者選抜実施要項"),
    region("miyagi", "宮城県", 4.0, 8.0, 260, ALL_YEARS, "中3は2倍、実技4教科はさらに2倍", "宮城県教育委員会 入学者選抜実施要項"),
    region("akita", "秋田県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "秋田県教育委員会 入学者選抜実施要項"),
    region("yamagata", "山形県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "山形県教育委員会 入学者選抜実施要項"),
    region("fukushima", "福島県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "福島県教育委員会 入学者選抜実施要項"),
    region("ibaraki", "茨城県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "茨城県教育委員会 入学者選抜実施要項"),
    region("tochigi", "栃木県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "栃木県教育委員会 入学者選抜実施要項"),
    region("gunma", "群馬県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "群馬県教育委員会 入学者選抜実施要項"),
    region("saitama", "埼玉県", 3.0, 3.0, 135, ALL_YEARS, "学校ごとに学年比率が異なる（均等配分で概算）", "埼玉県教育委員会 入学者選抜実施要項"),
    region("chiba", "千葉県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "千葉県教育委員会 入学者選抜実施要項"),
    RegionConfig {
        source_url: Some("https://www.kyoiku.metro.tokyo.lg.jp/"),
        ..region("tokyo", "東京都", 1.0, 2.0, 65, YEAR_3, "中3のみ、実技4教科は2倍（換算内申65点満点）", "東京都教育委員会 都立高等学校入学者選抜実施要綱")
    },
    region("kanagawa", "神奈川県", 3.0, 3.0, 135, YEARS_2_3, "中2 + 中3×2", "神奈川県教育委員会 入学者選抜実施要領"),
    region("niigata", "新潟県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "新潟県教育委員会 入学者選抜実施要項"),
    region("toyama", "富山県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "富山県教育委員会 入学者選抜実施要項"),
    region("ishikawa", "石川県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "石川県教育委員会 入学者選抜実施要項"),
    region("fukui", "福井県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "福井県教育委員会 入学者選抜実施要項"),
    region("yamanashi", "山梨県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "山梨県教育委員会 入学者選抜実施要項"),
    region("nagano", "長野県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "長野県教育委員会 入学者選抜実施要項"),
    region("gifu", "岐阜県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "岐阜県教育委員会 入学者選抜実施要項"),
    region("shizuoka", "静岡県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "静岡県教育委員会 入学者選抜実施要項"),
    region("aichi", "愛知県", 2.0, 2.0, 90, YEAR_3, "中3の評定合計×2", "愛知県教育委員会 入学者選抜実施要項"),
    region("mie", "三重県", 1.0, 1.0, 45, YEAR_3, "中3の9教科をそのまま合算", "三重県教育委員会 入学者選抜実施要項"),
    region("shiga", "滋賀県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "滋賀県教育委員会 入学者選抜実施要項"),
    region("kyoto", "京都府", 3.0, 6.0, 195, ALL_YEARS, PRACTICAL_X2_3Y, "京都府教育委員会 入学者選抜要項"),
    region("osaka", "大阪府", 10.0, 10.0, 450, ALL_YEARS, "中1×2・中2×2・中3×6", "大阪府教育委員会 入学者選抜実施要項"),
    region("hyogo", "兵庫県", 4.0, 7.5, 250, YEAR_3, "5教科×4、実技4教科×7.5（250点満点）", "兵庫県教育委員会 入学者選抜実施要項"),
    region("nara", "奈良県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "奈良県教育委員会 入学者選抜実施要項"),
    region("wakayama", "和歌山県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "和歌山県教育委員会 入学者選抜実施要項"),
    region("tottori", "鳥取県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "鳥取県教育委員会 入学者選抜実施要項"),
    region("shimane", "島根県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "島根県教育委員会 入学者選抜実施要項"),
    region("okayama", "岡山県", 3.0, 6.0, 195, ALL_YEARS, PRACTICAL_X2_3Y, "岡山県教育委員会 入学者選抜実施要項"),
    region("hiroshima", "広島県", 5.0, 10.0, 325, ALL_YEARS, "中1・中2・中3×3、実技4教科は2倍", "広島県教育委員会 入学者選抜実施要項"),
    region("yamaguchi", "山口県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "山口県教育委員会 入学者選抜実施要項"),
    region("tokushima", "徳島県", 3.0, 6.0, 195, ALL_YEARS, PRACTICAL_X2_3Y, "徳島県教育委員会 入学者選抜実施要項"),
    region("kagawa", "香川県", 3.0, 6.0, 195, ALL_YEARS, PRACTICAL_X2_3Y, "香川県教育委員会 入学者選抜実施要項"),
    region("ehime", "愛媛県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "愛媛県教育委員会 入学者選抜実施要項"),
    region("kochi", "高知県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "高知県教育委員会 入学者選抜実施要項"),
    region("fukuoka", "福岡県", 1.0, 1.0, 45, YEAR_3, "中3の9教科をそのまま合算", "福岡県教育委員会 入学者選抜実施要項"),
    region("saga", "佐賀県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "佐賀県教育委員会 入学者選抜実施要項"),
    region("nagasaki", "長崎県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "長崎県教育委員会 入学者選抜実施要項"),
    region("kumamoto", "熊本県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "熊本県教育委員会 入学者選抜実施要項"),
    region("oita", "大分県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "大分県教育委員会 入学者選抜実施要項"),
    region("miyazaki", "宮崎県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "宮崎県教育委員会 入学者選抜実施要項"),
    region("kagoshima", "鹿児島県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "鹿児島県教育委員会 入学者選抜実施要項"),
    region("okinawa", "沖縄県", 3.0, 3.0, 135, ALL_YEARS, EQUAL_3Y, "沖縄県教育委員会 入学者選抜要項"),
];

/// Region initially selected in the app.
pub const DEFAULT_REGION_CODE: &str = "tokyo";

pub fn get_region_by_code(code: &str) -> Option<&'static RegionConfig> {
    REGIONS.iter().find(|r| r.code == code)
}

/// Registered region, or [`DEFAULT_REGION`] for an unknown code.
pub fn resolve(code: &str) -> &'static RegionConfig {
    get_region_by_code(code).unwrap_or(&DEFAULT_REGION)
}

/// Registered code, or [`DEFAULT_REGION_CODE`] when `code` is unknown.
pub fn resolve_known(code: &str) -> &'static str {
    get_region_by_code(code).map_or(DEFAULT_REGION_CODE, |r| r.code)
}

pub fn is_known(code: &str) -> bool {
    get_region_by_code(code).is_some()
}

/// Position of `code` in [`REGIONS`].
pub fn region_index(code: &str) -> Option<usize> {
    REGIONS.iter().position(|r| r.code == code)
}
