//! プロンプト・レスポンススキーマ生成モジュール
//!
//! CLIとWeb(WASM)で共有される:
//! - ANALYSIS_PROMPT: 鉴别用の固定プロンプト
//! - response_schema: Gemini の responseSchema に渡す出力スキーマ

use serde_json::{json, Value};

/// 鉴别用の固定プロンプト
pub const ANALYSIS_PROMPT: &str = r#"Role: 你是一位拥有20年经验的【跨领域鉴别专家】，精通食品化学、合同法与消费心理学。你的使命是帮普通消费者打破信息不对称，不被商家忽悠。

Task: 分析用户上传的这张图片（可能是配料表、合同、体检报告、租房协议等），找出对用户不利的具体风险。

Requirements:
1. 识别核心风险：忽略无关内容，直接指出对用户不利的成分、条款或指标。
2. 说人话：用大白话解释为什么不好。不要只说“添加了苯甲酸钠”，要说“加了防腐剂，这类防腐剂对儿童不太友好”。
3. 风格：客观、犀利、像个老练的内行人，不要模棱两可。
4. 评分：0分最差（极度危险/坑人），10分最好（非常安全/良心）。

Please return the response in strictly valid JSON format matching the schema provided."#;

/// 鉴别用プロンプトを返す
pub fn build_analysis_prompt() -> String {
    ANALYSIS_PROMPT.trim().to_string()
}

/// 出力スキーマ（Gemini responseSchema 形式）
///
/// トップレベル必須: score / verdict / summary / risks
/// risks の各要素必須: title / explanation / severity（high/medium/low）
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": {
                "type": "NUMBER",
                "description": "0-10 score, where 0 is terrible/risky and 10 is perfect/safe."
            },
            "verdict": {
                "type": "STRING",
                "description": "A short, punchy 2-4 word advice, e.g. '快跑', '可以买', '霸王条款'."
            },
            "summary": {
                "type": "STRING",
                "description": "A one-sentence summary of the overall finding."
            },
            "risks": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {
                            "type": "STRING",
                            "description": "Name of the ingredient, clause, or issue."
                        },
                        "explanation": {
                            "type": "STRING",
                            "description": "Plain language explanation of why it is bad. No jargon."
                        },
                        "severity": {
                            "type": "STRING",
                            "enum": ["high", "medium", "low"]
                        }
                    },
                    "required": ["title", "explanation", "severity"]
                }
            }
        },
        "required": ["score", "verdict", "summary", "risks"]
    })
}
