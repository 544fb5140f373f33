//! Photo Verdict Common Library
//!
//! CLIとWeb(WASM)で共有される型・スキーマ・状態機械

pub mod types;
pub mod error;
pub mod prompts;
pub mod parser;
pub mod upload;
pub mod gemini;
pub mod machine;

pub use types::{AnalysisResult, RiskItem, ScoreTier, Severity, NO_RISK_MESSAGE};
pub use error::{AnalysisError, ErrorKind, Result, SchemaError, ValidationError, GENERIC_FAILURE_MESSAGE};
pub use prompts::{build_analysis_prompt, response_schema, ANALYSIS_PROMPT};
pub use parser::{decode_analysis_result, extract_json, parse_analysis_response};
pub use upload::{mime_type_from_extension, ImagePayload, SelectedFile, DEFAULT_MIME_TYPE, MAX_UPLOAD_BYTES};
pub use gemini::{GeminiRequest, GeminiResponse};
pub use machine::{
    AnalysisMachine, AnalysisState, Analyzer, PendingAnalysis, Phase, PreviewHandle, PreviewHost,
    Ticket,
};
