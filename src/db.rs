use crate::config::StoreConfig;
use crate::idea::{Idea, IdeaDraft};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use thiserror::Error;

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Supabase API error: HTTP {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Could not parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Idea {0} not found")]
    NotFound(i64),

    #[error("Insert returned no rows")]
    EmptyInsert,

    #[error("Could not build HTTP client: {0}")]
    ClientBuild(String),
}

impl DbError {
    /// Short message for the status bar and form footer.
    pub fn user_message(&self) -> String {
        match self {
            DbError::Http(e) if e.is_timeout() => "Request timed out".to_string(),
            DbError::Http(_) => "Network error, check your connection".to_string(),
            DbError::Api { status, .. } => format!("Server rejected the request (HTTP {status})"),
            DbError::Parse(_) => "Unexpected response from server".to_string(),
            DbError::NotFound(id) => format!("Idea {id} does not exist"),
            DbError::EmptyInsert => "Server did not return the new idea".to_string(),
            DbError::ClientBuild(msg) => format!("HTTP client error: {msg}"),
        }
    }
}

/// Record-oriented access to the ideas table.
#[async_trait]
pub trait IdeaStore: Send + Sync {
    /// All records, in whatever order the store returns them.
    async fn list(&self) -> Result<Vec<Idea>, DbError>;

    /// Store a new record and return it with its assigned identifier.
    async fn insert(&self, draft: IdeaDraft) -> Result<Idea, DbError>;

    /// Exactly one record by identifier.
    async fn get(&self, id: i64) -> Result<Idea, DbError>;
}

/// Supabase (PostgREST) client for one table.
pub struct Supabase {
    http: reqwest::Client,
    table_url: String,
}

impl Supabase {
    pub fn new(config: &StoreConfig) -> Result<Self, DbError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.anon_key)
            .map_err(|e| DbError::ClientBuild(format!("invalid anon key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.anon_key))
            .map_err(|e| DbError::ClientBuild(format!("invalid anon key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| DbError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            table_url: table_url(&config.url, &config.table),
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, &self.table_url)
            .query(&[("select", "*")])
    }

    fn list_request(&self) -> RequestBuilder {
        self.request(Method::GET)
    }

    fn insert_request(&self, draft: &IdeaDraft) -> RequestBuilder {
        self.request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&[draft.to_row()])
    }

    fn get_request(&self, id: i64) -> RequestBuilder {
        self.request(Method::GET)
            .query(&[("id", format!("eq.{id}"))])
    }
}

#[async_trait]
impl IdeaStore for Supabase {
    async fn list(&self) -> Result<Vec<Idea>, DbError> {
        let response = self.list_request().send().await?;
        parse_ideas(&read_body(response).await?)
    }

    async fn insert(&self, draft: IdeaDraft) -> Result<Idea, DbError> {
        let response = self.insert_request(&draft).send().await?;
        first_or(parse_ideas(&read_body(response).await?)?, DbError::EmptyInsert)
    }

    async fn get(&self, id: i64) -> Result<Idea, DbError> {
        let response = self.get_request(id).send().await?;
        first_or(parse_ideas(&read_body(response).await?)?, DbError::NotFound(id))
    }
}

pub(crate) fn table_url(base: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base.trim_end_matches('/'), table)
}

async fn read_body(response: Response) -> Result<String, DbError> {
    let status = response.status();
    let body = response.text().await?;
    check_status(status, body)
}

/// Non-2xx answers become [`DbError::Api`] carrying the body PostgREST sent.
fn check_status(status: StatusCode, body: String) -> Result<String, DbError> {
    if !status.is_success() {
        return Err(DbError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// First row of a single-record answer, `missing` when the array is empty.
fn first_or(ideas: Vec<Idea>, missing: DbError) -> Result<Idea, DbError> {
    ideas.into_iter().next().ok_or(missing)
}

// PostgREST answers table reads and `return=representation` inserts with a JSON array.
pub(crate) fn parse_ideas(json: &str) -> Result<Vec<Idea>, DbError> {
    Ok(serde_json::from_str(json)?)
}
