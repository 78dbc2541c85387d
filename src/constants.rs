//! Central constants for the github-base client

/// Default values for GitHub API requests
pub mod github {
    /// GitHub API base URL
    pub const API_BASE: &str = "https://api.github.com";

    /// Default Accept header for API requests
    pub const DEFAULT_ACCEPT: &str = "application/vnd.github.v3+json";

    /// Default User-Agent header for API requests
    pub const DEFAULT_USER_AGENT: &str = concat!("github-base-rs/", env!("CARGO_PKG_VERSION"));

    /// Query parameter carrying the cache-busting timestamp on GET requests
    pub const CACHE_BUST_PARAM: &str = "_";
}

/// Default values for paged requests
pub mod pagination {
    /// Page size requested when neither the path nor the options set `per_page`
    pub const DEFAULT_PER_PAGE: u32 = 100;

    /// Upper bound on the number of pages a single walk may fetch
    pub const DEFAULT_MAX_PAGES: usize = 1000;

    /// Query parameter controlling the page size
    pub const PER_PAGE_PARAM: &str = "per_page";
}

/// Option keys with a fixed meaning
pub mod options {
    pub const METHOD: &str = "method";
    pub const PATH: &str = "path";
    pub const URL: &str = "url";
    pub const HEADERS: &str = "headers";
    pub const BODY: &str = "body";
    pub const TEXT: &str = "text";
    pub const JSON: &str = "json";
    pub const TOKEN: &str = "token";
    pub const BEARER: &str = "bearer";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const APIURL: &str = "apiurl";
    pub const ENDPOINT: &str = "endpoint";
    pub const QUERY: &str = "query";
    pub const PARAMS: &str = "params";
    pub const MAX_PAGES: &str = "max_pages";
    pub const TIMEOUT: &str = "timeout";

    /// Keys that never contribute to a JSON request body.
    ///
    /// `text` is absent on purpose: it is only reserved when `json` is `false`.
    pub const RESERVED: &[&str] = &[
        METHOD, PATH, URL, HEADERS, BODY, JSON, TOKEN, BEARER, USERNAME, PASSWORD, APIURL,
        ENDPOINT, QUERY, PARAMS, MAX_PAGES, TIMEOUT,
    ];

    /// Keys holding credentials; they are consumed by header synthesis only.
    pub const CREDENTIALS: &[&str] = &[TOKEN, BEARER, USERNAME, PASSWORD];
}

/// Environment variables read by the command-line front-end
pub mod env {
    pub const TOKEN: &str = "GITHUB_TOKEN";
    pub const BEARER: &str = "GITHUB_BEARER";
    pub const USERNAME: &str = "GITHUB_USERNAME";
    pub const PASSWORD: &str = "GITHUB_PASSWORD";
    pub const API_URL: &str = "GITHUB_API_URL";
}

/// Default values for configuration
pub mod config {
    /// Default configuration file name
    pub const DEFAULT_CONFIG_FILE: &str = "github-base.yaml";
}
