//! 端末表示
//!
//! 状態ごとの表示文字列を組み立てる。色は colored で付ける。

use colored::{ColoredString, Colorize};
use photo_verdict_common::{AnalysisResult, AnalysisState, ScoreTier, Severity, NO_RISK_MESSAGE};

/// 状態を表示用文字列にする
pub fn render_state(state: &AnalysisState) -> String {
    let mut out = match state {
        AnalysisState::Idle => "请选择一张配料表、合同或体检报告的照片".to_string(),
        AnalysisState::Uploading | AnalysisState::Analyzing { .. } => {
            "专家正在鉴别中...".to_string()
        }
        AnalysisState::Success { result, .. } => render_result(result),
        AnalysisState::Error { message, .. } => render_error(message),
    };

    if let Some(preview) = state.preview() {
        out.push_str(&format!("\n\n{} {}", "预览:".dimmed(), preview.locator()));
    }
    out
}

pub fn render_result(result: &AnalysisResult) -> String {
    let mut lines = Vec::new();

    let score = paint_tier(format!("{}/10", result.score), result.tier());
    lines.push(format!("{}  {}", score, result.verdict.bold()));
    lines.push(result.summary.clone());
    lines.push(String::new());
    lines.push("深度解读".bold().to_string());

    if result.risks.is_empty() {
        lines.push(format!("  {}", NO_RISK_MESSAGE.green()));
    } else {
        for risk in &result.risks {
            let badge = paint_severity(format!("[{}]", risk.severity.label()), risk.severity);
            lines.push(format!("  {} {}", badge, risk.title.bold()));
            lines.push(format!("       {}", risk.explanation));
        }
    }

    lines.join("\n")
}

pub fn render_error(message: &str) -> String {
    format!("{}\n{}", "出错了".red().bold(), message)
}

fn paint_tier(text: String, tier: ScoreTier) -> ColoredString {
    match tier {
        ScoreTier::Good => text.green().bold(),
        ScoreTier::Caution => text.yellow().bold(),
        ScoreTier::Bad => text.red().bold(),
    }
}

fn paint_severity(text: String, severity: Severity) -> ColoredString {
    match severity {
        Severity::High => text.red(),
        Severity::Medium => text.yellow(),
        Severity::Low => text.blue(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photo_verdict_common::parse_analysis_response;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_render_clean_result() {
        plain();
        let result = parse_analysis_response(
            r#"{"score": 8, "verdict": "放心吃", "summary": "配料干净", "risks": []}"#,
        )
        .unwrap();
        let text = render_result(&result);
        assert!(text.starts_with("8/10  放心吃"));
        assert!(text.contains("配料干净"));
        assert!(text.contains("未发现明显风险"));
    }

    #[test]
    fn test_render_risks_in_order_with_labels() {
        plain();
        let result = parse_analysis_response(
            r#"{"score": 3.5, "verdict": "快跑", "summary": "s", "risks": [
                {"title": "反式脂肪", "explanation": "伤心血管", "severity": "high"},
                {"title": "色素", "explanation": "小孩少吃", "severity": "low"}
            ]}"#,
        )
        .unwrap();
        let text = render_result(&result);
        assert!(text.starts_with("3.5/10"));
        let high = text.find("[高危] 反式脂肪").unwrap();
        let low = text.find("[注意] 色素").unwrap();
        assert!(high < low);
        assert!(!text.contains("未发现明显风险"));
    }

    #[test]
    fn test_render_error_state() {
        plain();
        let state = AnalysisState::Error {
            message: "图片太大，请上传10MB以内的图片".into(),
            preview: None,
        };
        let text = render_state(&state);
        assert!(text.contains("出错了"));
        assert!(text.contains("10MB"));
        assert!(!text.contains("预览"));
    }

    #[test]
    fn test_render_idle() {
        plain();
        assert!(render_state(&AnalysisState::Idle).contains("请选择"));
    }
}
