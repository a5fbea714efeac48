use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProdexError>;

#[derive(Debug, Error)]
pub enum ProdexError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// Render dependency (or direct-fetch fallback) failed after all attempts.
    /// `body` carries the upstream response body, already truncated.
    #[error("render fetch failed ({status:?}): {body}")]
    Render { status: Option<u16>, body: String },

    #[error("fetch attempt timed out: {0}")]
    Timeout(String),

    #[error("response body too large: {bytes} bytes (limit {limit})")]
    BodyTooLarge { bytes: usize, limit: usize },

    /// Page was understood but carried no name and no usable description.
    #[error("no name and no usable description extracted")]
    Insufficient,

    #[error("{0}")]
    Other(String),
}

impl ProdexError {
    /// Upstream fetch failure with the body truncated for transport.
    pub fn render_error(status: Option<u16>, body: &str) -> Self {
        const BODY_LIMIT: usize = 512;
        let body = if body.len() > BODY_LIMIT {
            let mut cut = BODY_LIMIT;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body[..cut].to_string()
        } else {
            body.to_string()
        };
        ProdexError::Render { status, body }
    }
}

/* Conversions so `?` works smoothly */
impl From<std::io::Error> for ProdexError {
    fn from(e: std::io::Error) -> Self {
        ProdexError::Other(e.to_string())
    }
}
impl From<serde_json::Error> for ProdexError {
    fn from(e: serde_json::Error) -> Self {
        ProdexError::Other(e.to_string())
    }
}
impl From<reqwest::Error> for ProdexError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProdexError::Timeout(e.to_string())
        } else {
            ProdexError::Other(e.to_string())
        }
    }
}
