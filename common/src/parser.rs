//! APIレスポンスパーサー
//!
//! Gemini が返したテキストを AnalysisResult へ厳密にデコードする。
//! 欠けたフィールドを補ったり型を変換したりはしない。

use crate::error::{AnalysisError, Result, SchemaError};
use crate::types::{AnalysisResult, RiskItem, Severity};
use serde_json::{Map, Value};

/// レスポンステキストからJSON部分を取り出す
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 前後の空白を除いたテキスト全体
///
/// # Examples
/// ```
/// use photo_verdict_common::extract_json;
///
/// let response = "```json\n{\"score\": 8}\n```";
/// assert_eq!(extract_json(response), "{\"score\": 8}");
/// ```
pub fn extract_json(response: &str) -> &str {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            return response[start..start + end_offset].trim();
        }
    }
    response.trim()
}

/// レスポンステキストを AnalysisResult にデコード
///
/// # Returns
/// * `Err(AnalysisError::EmptyResponse)` - テキストが空
/// * `Err(AnalysisError::Schema(_))` - JSON不正・必須フィールド欠落・型不一致・severity不正
///
/// テキスト全体がJSONならそれを使い、そうでなければコードブロックを探す。
/// 文字列値の中にコードブロックの記号があっても本文はそのまま読む。
pub fn parse_analysis_response(response: &str) -> Result<AnalysisResult> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(whole_err) => {
            let json_str = extract_json(trimmed);
            if json_str.is_empty() {
                return Err(AnalysisError::EmptyResponse);
            }
            if json_str.len() == trimmed.len() {
                return Err(SchemaError::InvalidJson(whole_err.to_string()).into());
            }
            serde_json::from_str(json_str).map_err(|e| SchemaError::InvalidJson(e.to_string()))?
        }
    };

    Ok(decode_analysis_result(&value)?)
}

/// JSON値を AnalysisResult に変換（フィールド単位で検証）
pub fn decode_analysis_result(value: &Value) -> std::result::Result<AnalysisResult, SchemaError> {
    let map = as_object(value, "$")?;

    let score = match required(map, "score", "score")? {
        Value::Number(n) => n.clone(),
        _ => return Err(wrong_type("score", "number")),
    };
    let verdict = get_string(map, "verdict", "verdict")?;
    let summary = get_string(map, "summary", "summary")?;

    let risks = match required(map, "risks", "risks")? {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| decode_risk(item, idx))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        _ => return Err(wrong_type("risks", "array")),
    };

    Ok(AnalysisResult {
        score,
        verdict,
        summary,
        risks,
    })
}

fn decode_risk(value: &Value, idx: usize) -> std::result::Result<RiskItem, SchemaError> {
    let path = format!("risks[{}]", idx);
    let map = as_object(value, &path)?;

    let title = get_string(map, "title", &format!("{}.title", path))?;
    let explanation = get_string(map, "explanation", &format!("{}.explanation", path))?;

    let severity_path = format!("{}.severity", path);
    let raw = get_string(map, "severity", &severity_path)?;
    let severity = Severity::from_schema(&raw).ok_or(SchemaError::InvalidSeverity {
        field: severity_path,
        value: raw,
    })?;

    Ok(RiskItem {
        title,
        explanation,
        severity,
    })
}

fn as_object<'a>(
    value: &'a Value,
    path: &str,
) -> std::result::Result<&'a Map<String, Value>, SchemaError> {
    value.as_object().ok_or_else(|| wrong_type(path, "object"))
}

/// null は欠落扱い
fn required<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> std::result::Result<&'a Value, SchemaError> {
    match map.get(key) {
        Some(Value::Null) | None => Err(SchemaError::MissingField {
            field: path.to_string(),
        }),
        Some(value) => Ok(value),
    }
}

fn get_string(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
) -> std::result::Result<String, SchemaError> {
    required(map, key, path)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| wrong_type(path, "string"))
}

fn wrong_type(path: &str, expected: &'static str) -> SchemaError {
    SchemaError::WrongType {
        field: path.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // extract_json テスト
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = "Here is the analysis:\n```json\n{\"score\": 5}\n```\nDone.";
        assert_eq!(extract_json(response), "{\"score\": 5}");
    }

    #[test]
    fn test_extract_json_raw() {
        let response = "  {\"score\": 5}\n";
        assert_eq!(extract_json(response), "{\"score\": 5}");
    }

    #[test]
    fn test_extract_json_unterminated_block_falls_back() {
        let response = "```json {\"score\": 5}";
        assert_eq!(extract_json(response), response);
    }

    // =============================================
    // parse_analysis_response テスト
    // =============================================

    #[test]
    fn test_parse_clean_result_without_risks() {
        let response = r#"{"score": 8, "verdict": "放心吃", "summary": "配料干净", "risks": []}"#;
        let result = parse_analysis_response(response).unwrap();
        assert_eq!(result.score, serde_json::Number::from(8));
        assert_eq!(result.verdict, "放心吃");
        assert_eq!(result.summary, "配料干净");
        assert!(result.risks.is_empty());
    }

    #[test]
    fn test_parse_preserves_risk_order() {
        let response = r#"{
            "score": 2.5,
            "verdict": "霸王条款",
            "summary": "押金条款对租客极不公平",
            "risks": [
                {"title": "押金不退", "explanation": "提前退租押金全扣", "severity": "high"},
                {"title": "维修责任", "explanation": "所有维修由租客承担", "severity": "medium"},
                {"title": "水电费", "explanation": "按商业电价收取", "severity": "low"}
            ]
        }"#;
        let result = parse_analysis_response(response).unwrap();
        assert_eq!(result.score_value(), 2.5);
        let titles: Vec<&str> = result.risks.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["押金不退", "维修责任", "水电费"]);
        assert_eq!(result.risks[0].severity, Severity::High);
        assert_eq!(result.risks[1].severity, Severity::Medium);
        assert_eq!(result.risks[2].severity, Severity::Low);
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let response = r#"{"score": 9, "verdict": "可以买", "summary": "ok", "risks": [], "extra": true}"#;
        assert!(parse_analysis_response(response).is_ok());
    }

    #[test]
    fn test_parse_empty_response() {
        assert_eq!(parse_analysis_response(""), Err(AnalysisError::EmptyResponse));
        assert_eq!(parse_analysis_response("  \n"), Err(AnalysisError::EmptyResponse));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_analysis_response("not json at all").unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(SchemaError::InvalidJson(_))));
    }

    #[test]
    fn test_parse_missing_field() {
        let response = r#"{"score": 8, "verdict": "放心吃", "risks": []}"#;
        let err = parse_analysis_response(response).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Schema(SchemaError::MissingField { field: "summary".into() })
        );
    }

    #[test]
    fn test_parse_null_counts_as_missing() {
        let response = r#"{"score": null, "verdict": "放心吃", "summary": "x", "risks": []}"#;
        let err = parse_analysis_response(response).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Schema(SchemaError::MissingField { field: "score".into() })
        );
    }

    #[test]
    fn test_parse_score_as_string_is_rejected() {
        let response = r#"{"score": "8", "verdict": "放心吃", "summary": "x", "risks": []}"#;
        let err = parse_analysis_response(response).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Schema(SchemaError::WrongType {
                field: "score".into(),
                expected: "number"
            })
        );
    }

    #[test]
    fn test_parse_risks_not_array() {
        let response = r#"{"score": 8, "verdict": "v", "summary": "s", "risks": {}}"#;
        let err = parse_analysis_response(response).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Schema(SchemaError::WrongType { expected: "array", .. })
        ));
    }

    #[test]
    fn test_parse_invalid_severity() {
        let response = r#"{"score": 3, "verdict": "快跑", "summary": "s", "risks": [
            {"title": "t", "explanation": "e", "severity": "critical"}
        ]}"#;
        let err = parse_analysis_response(response).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Schema(SchemaError::InvalidSeverity {
                field: "risks[0].severity".into(),
                value: "critical".into()
            })
        );
    }

    #[test]
    fn test_parse_risk_missing_explanation() {
        let response = r#"{"score": 3, "verdict": "v", "summary": "s", "risks": [
            {"title": "a", "explanation": "b", "severity": "low"},
            {"title": "c", "severity": "low"}
        ]}"#;
        let err = parse_analysis_response(response).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Schema(SchemaError::MissingField {
                field: "risks[1].explanation".into()
            })
        );
    }

    #[test]
    fn test_parse_top_level_array_is_rejected() {
        let err = parse_analysis_response("[]").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Schema(SchemaError::WrongType { expected: "object", .. })
        ));
    }

    #[test]
    fn test_parse_fenced_block() {
        let response = "```json\n{\"score\": 10, \"verdict\": \"良心\", \"summary\": \"s\", \"risks\": []}\n```";
        let result = parse_analysis_response(response).unwrap();
        assert_eq!(result.verdict, "良心");
    }

    #[test]
    fn test_parse_fence_marker_inside_string_value() {
        let response =
            r#"{"score": 6, "verdict": "v", "summary": "标签上印着 ```json {} ``` 字样", "risks": []}"#;
        let result = parse_analysis_response(response).unwrap();
        assert_eq!(result.summary, "标签上印着 ```json {} ``` 字样");
        assert_eq!(result.score_value(), 6.0);
    }

    #[test]
    fn test_parse_empty_fenced_block() {
        assert_eq!(
            parse_analysis_response("```json\n```").unwrap_err(),
            AnalysisError::EmptyResponse
        );
    }
}
