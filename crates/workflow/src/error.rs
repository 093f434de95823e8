/// Errors from the workflow service layer.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// A required environment variable is unset. Raised before any network call.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Workflow request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("Workflow service error ({status}): {body}")]
    HttpStatus { status: u16, body: String },

    /// The GraphQL envelope carried an `errors` array.
    #[error("{0}")]
    GraphQl(String),

    /// The response did not have the expected shape.
    #[error("Malformed workflow response: {0}")]
    MalformedResponse(String),

    /// One platform of a multi-platform KPI fetch failed.
    #[error("{platform} KPI fetch failed: {source}")]
    Platform {
        platform: &'static str,
        #[source]
        source: Box<WorkflowError>,
    },
}
