//! 画面表示用のスナップショット
//!
//! 状態機械の状態はプレビューハンドルを所有していて複製できないので、
//! 描画に要る値だけを写し取ったものをシグナルに載せる。

use photo_verdict_common::{AnalysisResult, AnalysisState, Phase, ScoreTier, Severity};

#[derive(Clone, Debug, PartialEq)]
pub struct ViewSnapshot {
    pub phase: Phase,
    /// Uploading / Analyzing の間は true
    pub busy: bool,
    pub preview_url: Option<String>,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            busy: false,
            preview_url: None,
            result: None,
            error: None,
        }
    }
}

impl From<&AnalysisState> for ViewSnapshot {
    fn from(state: &AnalysisState) -> Self {
        Self {
            phase: state.phase(),
            busy: state.is_busy(),
            preview_url: state.preview().map(|p| p.locator().to_string()),
            result: state.result().cloned(),
            error: state.error_message().map(str::to_string),
        }
    }
}

/// スコア表示のCSSクラス
pub fn tier_class(tier: ScoreTier) -> &'static str {
    match tier {
        ScoreTier::Good => "score-good",
        ScoreTier::Caution => "score-caution",
        ScoreTier::Bad => "score-bad",
    }
}

/// リスクバッジのCSSクラス
pub fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "badge badge-high",
        Severity::Medium => "badge badge-medium",
        Severity::Low => "badge badge-low",
    }
}
