//! アップロード〜結果表示の状態機械
//!
//! Idle → Uploading → Analyzing → Success / Error の1本のライフサイクルを管理する。
//! 状態は常に丸ごと置き換え、部分的に書き換えることはない。
//!
//! 解析呼び出しは `begin` と `complete` に分かれている:
//! - `begin`: 入力チェック、プレビュー取得、Base64化まで（同期）
//! - `complete`: 解析結果の反映（チケットが一致したときだけ）
//!
//! 途中で再度 `begin` や `reset` が呼ばれると世代が進み、古いチケットの結果は捨てられる。

use crate::error::{AnalysisError, Result, ValidationError};
use crate::types::AnalysisResult;
use crate::upload::{ImagePayload, SelectedFile, MAX_UPLOAD_BYTES};
use async_trait::async_trait;
use tracing::{debug, warn};

/// 画像解析サービス
///
/// 1回の呼び出しで1リクエスト。成功なら完全な結果、失敗なら型付きエラー。
#[async_trait(?Send)]
pub trait Analyzer {
    async fn analyze(&self, image: &ImagePayload) -> Result<AnalysisResult>;
}

/// プレビュー資源（Object URL、一時サムネイルなど）の取得と解放
pub trait PreviewHost {
    /// プレビューを作成し、その所在（URLやパス）を返す
    fn acquire(&mut self, file: &SelectedFile) -> std::result::Result<String, String>;

    /// `acquire` で得た所在を解放する。1つの所在につき1回だけ呼ばれる
    fn release(&mut self, locator: &str);
}

/// プレビューへのハンドル
///
/// Clone できないので、解放は所有している状態から取り出したときの1回に限られる。
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    locator: String,
}

impl PreviewHandle {
    pub fn locator(&self) -> &str {
        &self.locator
    }
}

/// 現在の状態
#[derive(Debug)]
pub enum AnalysisState {
    Idle,
    Uploading,
    Analyzing {
        preview: PreviewHandle,
    },
    Success {
        result: AnalysisResult,
        preview: PreviewHandle,
    },
    Error {
        message: String,
        /// 送信前のエラーではプレビューは無い
        preview: Option<PreviewHandle>,
    },
}

impl AnalysisState {
    pub fn phase(&self) -> Phase {
        match self {
            AnalysisState::Idle => Phase::Idle,
            AnalysisState::Uploading => Phase::Uploading,
            AnalysisState::Analyzing { .. } => Phase::Analyzing,
            AnalysisState::Success { .. } => Phase::Success,
            AnalysisState::Error { .. } => Phase::Error,
        }
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        match self {
            AnalysisState::Analyzing { preview } | AnalysisState::Success { preview, .. } => {
                Some(preview)
            }
            AnalysisState::Error { preview, .. } => preview.as_ref(),
            AnalysisState::Idle | AnalysisState::Uploading => None,
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisState::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalysisState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// 解析待ち（ローディング表示中）か。Web側の表示切り替えに使う
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            AnalysisState::Uploading | AnalysisState::Analyzing { .. }
        )
    }

    fn into_preview(self) -> Option<PreviewHandle> {
        match self {
            AnalysisState::Analyzing { preview } | AnalysisState::Success { preview, .. } => {
                Some(preview)
            }
            AnalysisState::Error { preview, .. } => preview,
            AnalysisState::Idle | AnalysisState::Uploading => None,
        }
    }
}

/// 状態の種類（ペイロード無し）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Uploading,
    Analyzing,
    Success,
    Error,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Uploading => "uploading",
            Phase::Analyzing => "analyzing",
            Phase::Success => "success",
            Phase::Error => "error",
        }
    }
}

/// 解析リクエストの世代
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// `begin` が受け付けたリクエスト
#[derive(Debug)]
pub struct PendingAnalysis {
    pub ticket: Ticket,
    pub payload: ImagePayload,
}

type TransitionListener = Box<dyn FnMut(&AnalysisState)>;

/// 状態機械本体
pub struct AnalysisMachine<P: PreviewHost> {
    state: AnalysisState,
    previews: P,
    generation: u64,
    max_upload_bytes: u64,
    listener: Option<TransitionListener>,
}

impl<P: PreviewHost> AnalysisMachine<P> {
    pub fn new(previews: P) -> Self {
        Self {
            state: AnalysisState::Idle,
            previews,
            generation: 0,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            listener: None,
        }
    }

    pub fn with_max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    /// 状態が変わるたびに呼ばれるコールバックを登録
    pub fn on_transition(mut self, listener: impl FnMut(&AnalysisState) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn previews(&self) -> &P {
        &self.previews
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// ファイル選択を受け付け、Analyzing まで進める
    ///
    /// 入力エラーやプレビュー取得失敗の場合は Error に遷移して `None` を返す。
    /// 直前の状態が持っていたプレビューはここで解放される。
    pub fn begin(&mut self, file: Option<SelectedFile>) -> Option<PendingAnalysis> {
        self.discard_current();
        self.generation += 1;

        let Some(file) = file else {
            self.fail(ValidationError::MissingFile.into(), None);
            return None;
        };

        if file.size() > self.max_upload_bytes {
            self.fail(
                ValidationError::TooLarge {
                    size: file.size(),
                    limit: self.max_upload_bytes,
                }
                .into(),
                None,
            );
            return None;
        }

        self.set_state(AnalysisState::Uploading);

        let preview = match self.previews.acquire(&file) {
            Ok(locator) => PreviewHandle { locator },
            Err(reason) => {
                self.fail(ValidationError::Unreadable(reason).into(), None);
                return None;
            }
        };
        self.set_state(AnalysisState::Analyzing { preview });

        Some(PendingAnalysis {
            ticket: Ticket(self.generation),
            payload: file.to_payload(),
        })
    }

    /// 解析結果を反映する
    ///
    /// チケットが古い場合（途中で再送信やリセットがあった場合）は何もせず `false`。
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<AnalysisResult>) -> bool {
        if ticket.0 != self.generation {
            debug!(ticket = ticket.0, generation = self.generation, "stale analysis result dropped");
            return false;
        }

        let preview = match std::mem::replace(&mut self.state, AnalysisState::Idle) {
            AnalysisState::Analyzing { preview } => preview,
            other => {
                self.state = other;
                return false;
            }
        };

        match outcome {
            Ok(result) => self.set_state(AnalysisState::Success { result, preview }),
            Err(error) => self.fail(error, Some(preview)),
        }
        true
    }

    /// begin → analyze → complete を順に実行し、最終的な Phase を返す
    pub async fn submit<A>(&mut self, analyzer: &A, file: Option<SelectedFile>) -> Phase
    where
        A: Analyzer + ?Sized,
    {
        let Some(pending) = self.begin(file) else {
            return self.state.phase();
        };

        let outcome = analyzer.analyze(&pending.payload).await;
        self.complete(pending.ticket, outcome);
        self.state.phase()
    }

    /// プレビューを解放して Idle に戻る。Idle なら何もしない
    pub fn reset(&mut self) {
        if matches!(self.state, AnalysisState::Idle) {
            return;
        }
        self.discard_current();
        self.generation += 1;
        self.set_state(AnalysisState::Idle);
    }

    /// 呼び出し側で読み込みに失敗した場合など、ファイルを渡せないまま Error にする
    ///
    /// `begin` と同じく世代を進めるので、処理中の解析結果は捨てられる。
    pub fn reject(&mut self, error: ValidationError) {
        self.discard_current();
        self.generation += 1;
        self.fail(error.into(), None);
    }

    fn fail(&mut self, error: AnalysisError, preview: Option<PreviewHandle>) {
        warn!(kind = ?error.kind(), "analysis failed: {}", error);
        self.set_state(AnalysisState::Error {
            message: error.user_message(),
            preview,
        });
    }

    fn set_state(&mut self, next: AnalysisState) {
        self.state = next;
        debug!(phase = self.state.phase().as_str(), generation = self.generation, "state transition");
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.state);
        }
    }

    /// 現在の状態を捨て、持っていたプレビューを解放する（通知はしない）
    fn discard_current(&mut self) {
        let previous = std::mem::replace(&mut self.state, AnalysisState::Idle);
        if let Some(preview) = previous.into_preview() {
            self.previews.release(&preview.locator);
        }
    }
}

impl<P: PreviewHost> Drop for AnalysisMachine<P> {
    fn drop(&mut self) {
        self.discard_current();
    }
}
