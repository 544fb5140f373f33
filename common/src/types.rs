//! 鉴别結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Severity: リスクの深刻度（high/medium/low の閉じた集合）
//! - RiskItem: 個々のリスク
//! - AnalysisResult: 1回の解析で得られる最終結果

use serde::{Deserialize, Serialize};
use std::fmt;

/// リスクの深刻度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// スキーマ上の値（レスポンスJSONでの表記）
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// 画面表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "高危",
            Severity::Medium => "警惕",
            Severity::Low => "注意",
        }
    }

    /// スキーマ表記から変換。未知の値は `None`（大文字小文字は区別する）
    pub fn from_schema(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 個々のリスク（成分・条項・指標）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
    pub title: String,
    pub explanation: String,
    pub severity: Severity,
}

/// 解析結果
///
/// `score` はサービスが返した数値をそのまま保持する（整数/小数の区別も維持）。
/// 0〜10 の範囲チェックはしない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: serde_json::Number,
    pub verdict: String,
    pub summary: String,
    /// サービスが返した順序のまま
    pub risks: Vec<RiskItem>,
}

impl AnalysisResult {
    pub fn score_value(&self) -> f64 {
        self.score.as_f64().unwrap_or_default()
    }

    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.score_value())
    }

    pub fn has_risks(&self) -> bool {
        !self.risks.is_empty()
    }
}

/// スコア帯（表示色の切り替えに使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    /// 8以上
    Good,
    /// 5以上8未満
    Caution,
    /// 5未満
    Bad,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreTier::Good
        } else if score >= 5.0 {
            ScoreTier::Caution
        } else {
            ScoreTier::Bad
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTier::Good => "good",
            ScoreTier::Caution => "caution",
            ScoreTier::Bad => "bad",
        }
    }
}

/// リスクが1件もない場合の表示文言
pub const NO_RISK_MESSAGE: &str = "未发现明显风险，看来是个良心产品/合同。";

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            score: 3.into(),
            verdict: "快跑".to_string(),
            summary: "含有多种添加剂".to_string(),
            risks: vec![RiskItem {
                title: "苯甲酸钠".to_string(),
                explanation: "加了防腐剂，对儿童不太友好".to_string(),
                severity: Severity::High,
            }],
        }
    }

    #[test]
    fn test_severity_from_schema() {
        assert_eq!(Severity::from_schema("high"), Some(Severity::High));
        assert_eq!(Severity::from_schema("medium"), Some(Severity::Medium));
        assert_eq!(Severity::from_schema("low"), Some(Severity::Low));
        assert_eq!(Severity::from_schema("critical"), None);
        assert_eq!(Severity::from_schema("HIGH"), None);
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::High.label(), "高危");
        assert_eq!(Severity::Medium.label(), "警惕");
        assert_eq!(Severity::Low.label(), "注意");
    }

    #[test]
    fn test_severity_serialize_lowercase() {
        let json = serde_json::to_string(&Severity::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn test_score_tier_boundaries() {
        assert_eq!(ScoreTier::from_score(10.0), ScoreTier::Good);
        assert_eq!(ScoreTier::from_score(8.0), ScoreTier::Good);
        assert_eq!(ScoreTier::from_score(7.9), ScoreTier::Caution);
        assert_eq!(ScoreTier::from_score(5.0), ScoreTier::Caution);
        assert_eq!(ScoreTier::from_score(4.5), ScoreTier::Bad);
        assert_eq!(ScoreTier::from_score(0.0), ScoreTier::Bad);
    }

    #[test]
    fn test_analysis_result_serialize_keeps_integer_score() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["score"], serde_json::json!(3));
        assert_eq!(json["risks"][0]["severity"], "high");
    }

    #[test]
    fn test_analysis_result_tier() {
        let result = sample();
        assert_eq!(result.tier(), ScoreTier::Bad);
        assert!(result.has_risks());
    }
}
