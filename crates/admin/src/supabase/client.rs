//! REST client and query builder for the hosted backend.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use uuid::Uuid;

use sidra_core::{Page, PageRequest};

use super::{NOT_FOUND_CODE, SupabaseError};
use crate::config::SupabaseConfig;

/// Accept header value asking the backend for a single JSON object instead
/// of a one-element array. Zero rows then yield the provider's not-found
/// error code.
const OBJECT_JSON: &str = "application/vnd.pgrst.object+json";

/// Client for the hosted backend's REST interface.
///
/// Cheap to clone (`Arc` inner). Constructed once from [`SupabaseConfig`]
/// and passed to the resource modules; there is no global instance and no
/// teardown beyond drop.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
}

/// Error body shape returned by the backend's REST layer.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl SupabaseClient {
    /// Create a new client.
    ///
    /// The anon key is installed as a default header pair (`apikey` +
    /// bearer token); row-level security on the backend scopes what the key
    /// may touch.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let mut headers = HeaderMap::new();

        let key = config.anon_key();
        headers.insert(
            "apikey",
            HeaderValue::from_str(key)
                .map_err(|e| SupabaseError::Parse(format!("Invalid API key format: {e}")))?,
        );
        let bearer = format!("Bearer {key}");
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer)
                .map_err(|e| SupabaseError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.url.clone(),
            }),
        })
    }

    /// Project base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.inner.base_url)
    }

    /// Start a read against `table`.
    #[must_use]
    pub fn table(&self, table: &'static str) -> TableQuery {
        TableQuery {
            client: self.clone(),
            table,
            select: "*".to_string(),
            params: Vec::new(),
            range: None,
            exact_count: false,
        }
    }

    /// Insert one row and return it as written.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the row.
    #[instrument(skip(self, body), fields(table = table))]
    pub async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, SupabaseError> {
        let response = self
            .inner
            .http
            .post(self.rest_url(table))
            .header("Prefer", "return=representation")
            .header(ACCEPT, OBJECT_JSON)
            .json(body)
            .send()
            .await?;
        handle_json(response).await
    }

    /// Insert several rows without asking for them back (child-row batches).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or any row is rejected.
    #[instrument(skip(self, rows), fields(table = table))]
    pub async fn insert_many(
        &self,
        table: &str,
        rows: &[impl Serialize + Sync],
    ) -> Result<(), SupabaseError> {
        if rows.is_empty() {
            return Ok(());
        }
        let response = self
            .inner
            .http
            .post(self.rest_url(table))
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;
        handle_empty(response).await
    }

    /// Patch the row with the given id and return the updated row.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; a missing row surfaces as the
    /// provider's not-found code.
    #[instrument(skip(self, body), fields(table = table, id = %id))]
    pub async fn update<T: DeserializeOwned>(
        &self,
        table: &str,
        id: Uuid,
        body: &(impl Serialize + Sync),
    ) -> Result<T, SupabaseError> {
        let response = self
            .inner
            .http
            .patch(self.rest_url(table))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .header(ACCEPT, OBJECT_JSON)
            .json(body)
            .send()
            .await?;
        handle_json(response).await
    }

    /// Patch the row with the given id without asking for the updated row
    /// back.
    ///
    /// Combining an update with `return=representation` is unreliable when
    /// row policies filter the write's read-back, so callers that need the
    /// fresh row issue a separate read afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, body), fields(table = table, id = %id))]
    pub async fn update_minimal(
        &self,
        table: &str,
        id: Uuid,
        body: &(impl Serialize + Sync),
    ) -> Result<(), SupabaseError> {
        let response = self
            .inner
            .http
            .patch(self.rest_url(table))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        handle_empty(response).await
    }

    /// Delete the row with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(table = table, id = %id))]
    pub async fn delete_by_id(&self, table: &str, id: Uuid) -> Result<(), SupabaseError> {
        self.delete_where(table, "id", id).await
    }

    /// Delete all rows where `column` equals `value` (child-row cleanup).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(table = table, column = column, value = %value))]
    pub async fn delete_where(
        &self,
        table: &str,
        column: &str,
        value: Uuid,
    ) -> Result<(), SupabaseError> {
        let response = self
            .inner
            .http
            .delete(self.rest_url(table))
            .query(&[(column, format!("eq.{value}"))])
            .send()
            .await?;
        handle_empty(response).await
    }
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

/// A filtered, paginated read against one table.
///
/// Built from [`SupabaseClient::table`]; terminal methods send the request.
/// Filters map onto the backend's query operators (`eq.`, `gte.`,
/// `or=(a.ilike.*t*,...)`).
#[derive(Debug)]
pub struct TableQuery {
    client: SupabaseClient,
    table: &'static str,
    select: String,
    params: Vec<(String, String)>,
    range: Option<(u64, u64)>,
    exact_count: bool,
}

impl TableQuery {
    /// Override the column selector (default `*`). Embedded child tables use
    /// the backend's relation syntax, e.g. `*,order_items(*),payments(*)`.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        columns.clone_into(&mut self.select);
        self
    }

    /// Equality filter.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Inequality filter.
    #[must_use]
    pub fn neq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("neq.{}", value.to_string())));
        self
    }

    /// Greater-or-equal filter (date lower bounds).
    #[must_use]
    pub fn gte(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("gte.{}", value.to_string())));
        self
    }

    /// Case-insensitive substring search across several columns, OR-combined.
    ///
    /// An empty term (after sanitizing) adds no filter.
    #[must_use]
    pub fn search(mut self, columns: &[&str], term: &str) -> Self {
        let pattern = sanitize_pattern(term);
        if pattern.is_empty() {
            return self;
        }
        let clauses: Vec<String> = columns
            .iter()
            .map(|column| format!("{column}.ilike.*{pattern}*"))
            .collect();
        self.params
            .push(("or".to_string(), format!("({})", clauses.join(","))));
        self
    }

    /// Descending order on `column`.
    #[must_use]
    pub fn order_desc(mut self, column: &str) -> Self {
        self.params
            .push(("order".to_string(), format!("{column}.desc")));
        self
    }

    /// Cap the number of returned rows.
    #[must_use]
    pub fn limit(mut self, n: u64) -> Self {
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    /// Request one page and the exact total in the same round trip.
    #[must_use]
    pub fn page(mut self, request: PageRequest) -> Self {
        self.range = Some(request.range());
        self.exact_count = true;
        self
    }

    async fn send(&self, accept: Option<&str>) -> Result<reqwest::Response, SupabaseError> {
        let url = self.client.rest_url(self.table);
        let mut request = self.client.http().get(url).query(&[("select", &self.select)]);
        for (key, value) in &self.params {
            request = request.query(&[(key, value)]);
        }
        if let Some((from, to)) = self.range {
            request = request
                .header("Range-Unit", "items")
                .header("Range", format!("{from}-{to}"));
        }
        if self.exact_count {
            request = request.header("Prefer", "count=exact");
        }
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        Ok(request.send().await?)
    }

    /// Fetch all matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response does not parse.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, SupabaseError> {
        let response = self.send(None).await?;
        handle_json(response).await
    }

    /// Fetch one page of rows plus the exact total matching count, parsed
    /// from the `Content-Range` response header.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response does not parse.
    pub async fn fetch_page<T: DeserializeOwned>(mut self) -> Result<Page<T>, SupabaseError> {
        self.exact_count = true;
        let response = self.send(None).await?;

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let items: Vec<T> = handle_json(response).await?;
        let total = content_range
            .as_deref()
            .and_then(parse_content_range_total)
            .unwrap_or(items.len() as u64);

        Ok(Page::new(items, total))
    }

    /// Fetch exactly one row.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotFound`] when no row matches, or another
    /// variant if the request fails.
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<T, SupabaseError> {
        let response = self.send(Some(OBJECT_JSON)).await?;
        handle_json(response).await
    }

    /// Fetch one row if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error only on real failures; a missing row is `None`.
    pub async fn fetch_optional<T: DeserializeOwned>(self) -> Result<Option<T>, SupabaseError> {
        match self.fetch_one().await {
            Ok(row) => Ok(Some(row)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Count matching rows without fetching them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn count(mut self) -> Result<u64, SupabaseError> {
        self.select = "id".to_string();
        self.range = Some((0, 0));
        self.exact_count = true;
        let response = self.send(None).await?;

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let status = response.status();
        if !status.is_success() {
            return Err(parse_error(response).await);
        }

        content_range
            .as_deref()
            .and_then(parse_content_range_total)
            .ok_or_else(|| SupabaseError::Parse("missing Content-Range header".to_string()))
    }
}

async fn handle_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SupabaseError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(format!("Failed to parse response: {e}")));
    }
    Err(parse_error(response).await)
}

async fn handle_empty(response: reqwest::Response) -> Result<(), SupabaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(parse_error(response).await)
}

/// Map an error response onto [`SupabaseError`].
async fn parse_error(response: reqwest::Response) -> SupabaseError {
    let status = response.status().as_u16();

    if status == 429 {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return SupabaseError::RateLimited(retry_after);
    }

    if status == 401 || status == 403 {
        return SupabaseError::Unauthorized;
    }

    // The REST layer reports structured errors; fall back to the raw body.
    let text = response.text().await.unwrap_or_default();
    let body: Option<ApiErrorBody> = serde_json::from_str(&text).ok();
    let (code, message) = body.map_or_else(
        || (None, text.clone()),
        |b| (b.code, b.message.unwrap_or_else(|| text.clone())),
    );

    if code.as_deref() == Some(NOT_FOUND_CODE) {
        return SupabaseError::NotFound;
    }

    SupabaseError::Api {
        status,
        code,
        message,
    }
}

/// Strip the backend's reserved filter characters from a search term so it
/// can be embedded in an `or=(...)` clause.
fn sanitize_pattern(term: &str) -> String {
    term.trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*'))
        .collect()
}

/// Parse the total from a `Content-Range` header (`"0-9/57"` or `"*/57"`).
fn parse_content_range_total(header: &str) -> Option<u64> {
    header.rsplit('/').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-9/57"), Some(57));
        assert_eq!(parse_content_range_total("*/123"), Some(123));
        assert_eq!(parse_content_range_total("0-9/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn test_sanitize_pattern_strips_reserved_chars() {
        assert_eq!(sanitize_pattern("kunafa, (fresh)*"), "kunafa fresh");
        assert_eq!(sanitize_pattern("  "), "");
        assert_eq!(sanitize_pattern("كنافة"), "كنافة");
    }

    #[test]
    fn test_page_sets_inclusive_range() {
        let request = PageRequest::new(2, 10);
        assert_eq!(request.range(), (10, 19));
    }
}
