//! The rewrite gateway interface.

/// A rewritten or generated manuscript draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub content: String,
}

/// Input for a rewrite. When `revision_request` is present the rewrite
/// applies the advertiser's requested changes instead of paraphrasing.
#[derive(Debug, Clone)]
pub struct RewriteRequest {
    pub title: String,
    pub content: String,
    pub revision_request: Option<String>,
}

/// The client attributes a generated manuscript is anchored on.
#[derive(Debug, Clone)]
pub struct ClientBrief {
    pub name: String,
    pub region: String,
    pub business_type: String,
    pub main_service: Option<String>,
    pub differentiator: Option<String>,
}

/// Input for generating a one-off custom manuscript.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub client: ClientBrief,
    pub topic: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("Rewrite credentials not configured")]
    Credentials,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider returned no text")]
    EmptyResponse,
}

/// An opaque, fallible text transform: title+content in, title+content out.
#[async_trait::async_trait]
pub trait RewriteGateway: Send + Sync {
    /// Paraphrase a rendered manuscript (or apply requested revisions),
    /// preserving the key SEO terms.
    async fn rewrite(&self, request: &RewriteRequest) -> Result<Draft, RewriteError>;

    /// Draft a manuscript from scratch for a custom client and topic.
    async fn generate(&self, request: &GenerateRequest) -> Result<Draft, RewriteError>;
}
