use thiserror::Error;

/// Pipeline errors. All of these are fatal: the run has no partial-success
/// mode, so the command layer wraps them in `anyhow` and aborts.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("no table cell contains region fragment '{region}'")]
    RegionNotFound { region: String },

    #[error("row for region '{region}' has no link in column {column}")]
    LinkMissing { region: String, column: usize },

    #[error("expected table not found at {url}: {detail}")]
    TableNotFound { url: String, detail: String },

    #[error("no DD.MM.YYYY date in '{value}'")]
    DateNotFound { value: String },

    #[error("join key maps to more than one winner row: {key}")]
    JoinCardinalityViolation { key: String },

    #[error("HTTP {status} for {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("request for {url} failed")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build http client")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot resolve '{href}' against '{base}'")]
    InvalidUrl {
        base: String,
        href: String,
        #[source]
        source: url::ParseError,
    },
}
