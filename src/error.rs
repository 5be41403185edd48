use thiserror::Error;

/// 报告生成对外暴露的错误
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("breach {0} not found")]
    NotFound(i64),

    #[error("requester {requester_id} reached the daily limit of {limit} reports")]
    RateLimited { requester_id: String, limit: u32 },

    #[error("credential missing: {0}")]
    CredentialMissing(String),

    #[error("report synthesis failed: {0}")]
    SynthesisFailure(String),

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// 单次检索失败，总是在检索层内部被兜底内容吸收
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status})")]
    Api { status: u16 },

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("unusable response: {0}")]
    Unusable(String),
}
