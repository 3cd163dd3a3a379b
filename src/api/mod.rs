use crate::models::{SatNote, Suggestion, TastingNote, UserProfile, Wine, WineFields, WineSummary};
use crate::storage::TOKEN_KEY;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    /// Well-defined "no such record" response. Drives state transitions
    /// (a wine without a SAT note) rather than error banners.
    NotFound,
    /// Local pre-network validation failure. Never produced by transport.
    Validation,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized(detail: Option<String>) -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: detail.unwrap_or_else(|| "Unauthorized".to_string()),
        }
    }

    fn not_found(ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::NotFound,
            message: format!("{ctx}: not found"),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Validation,
            message: message.into(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        // The backend reports failures as `{"error": "..."}`; fall back to
        // the raw body for anything else (proxies, HTML error pages).
        let detail = extract_error_detail(&body).unwrap_or(body);
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {detail}"),
        }
    }
}

fn extract_error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(|s| s.to_string())
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:8080".to_string();

        // We support BOTH `window.ENV.API_URL` (documented in README) and
        // `window.ENV.api_url` (legacy/implementation detail) for compatibility.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    // 1) Prefer README style: API_URL
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }

                    // 2) Fallback: api_url
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"api_url".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn get_api_url() -> String {
    EnvConfig::new().api_url
}

/// Wine endpoints wrap their payloads; `success: false` with a 2xx status
/// is treated as a server-reported failure.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "none")]
    pub data: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginResponse {
    pub token: String,
}

/// JSON half of the multipart signup body (sent under the `user` field).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SignupUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CreateNoteRequest {
    pub content: String,
}

/// Server-assigned identity and stamps for a newly created note.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CreatedNote {
    #[serde(rename = "noteId")]
    pub note_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct UpdatedNote {
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// In-memory file selected through an `<input type="file">`.
#[derive(Clone, Debug)]
pub(crate) struct FilePayload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    /// Reads an `<input type="file">` selection into memory. Multipart
    /// bodies need the bytes up front, so the read happens before the
    /// request is built.
    pub async fn from_file(file: web_sys::File) -> ApiResult<Self> {
        let buf = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
            .await
            .map_err(|_| ApiError::validation("Could not read the selected file."))?;

        Ok(Self {
            file_name: file.name(),
            mime: file.type_(),
            bytes: js_sys::Uint8Array::new(&buf).to_vec(),
        })
    }
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn load_from_storage() -> Self {
        let base_url = get_api_url();
        let token = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten());

        Self { base_url, token }
    }

    pub fn save_to_storage(&self) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            if let Some(token) = &self.token {
                let _ = storage.set_item(TOKEN_KEY, token);
            }
        }
    }

    pub fn clear_storage() {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn logout(&mut self) {
        self.token = None;
        Self::clear_storage();
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    fn with_auth(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(header) = self.auth_header() {
            req = req.header("Authorization", header);
        }
        req
    }

    async fn request_api<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
        ctx: &str,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.with_auth(client.request(method, url));

        if let Some(b) = body {
            req = req.json(b);
        }

        Self::read_response(req.send().await.map_err(ApiError::network)?, ctx).await
    }

    async fn request_multipart<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: reqwest::multipart::Form,
        ctx: &str,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let req = self.with_auth(client.request(method, url)).multipart(form);

        Self::read_response(req.send().await.map_err(ApiError::network)?, ctx).await
    }

    async fn read_response<T: serde::de::DeserializeOwned>(
        res: reqwest::Response,
        ctx: &str,
    ) -> ApiResult<T> {
        let status = res.status();

        if status.is_success() {
            res.json().await.map_err(ApiError::parse)
        } else if status.as_u16() == 401 {
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::unauthorized(extract_error_detail(&body)))
        } else if status.as_u16() == 404 {
            Err(ApiError::not_found(ctx))
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, ctx))
        }
    }

    fn into_data<T>(env: ApiEnvelope<T>, ctx: &str) -> ApiResult<T> {
        if !env.success {
            return Err(ApiError {
                kind: ApiErrorKind::Http,
                message: format!("{ctx}: server reported failure"),
            });
        }
        env.data
            .ok_or_else(|| ApiError::parse(format!("{ctx}: response is missing data")))
    }

    fn ack(env: ApiEnvelope<serde_json::Value>, ctx: &str) -> ApiResult<()> {
        if env.success {
            Ok(())
        } else {
            Err(ApiError {
                kind: ApiErrorKind::Http,
                message: format!("{ctx}: server reported failure"),
            })
        }
    }

    fn file_part(file: FilePayload) -> ApiResult<reqwest::multipart::Part> {
        reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)
            .map_err(ApiError::parse)
    }

    // ---- Account ----------------------------------------------------------

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        self.request_api(
            Method::POST,
            "/api/users/signin",
            Some(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            }),
            "Sign in",
        )
        .await
    }

    pub async fn signup(
        &self,
        user: &SignupUser,
        avatar: Option<FilePayload>,
    ) -> ApiResult<LoginResponse> {
        let user_json = serde_json::to_string(user).map_err(ApiError::parse)?;
        let mut form = reqwest::multipart::Form::new().text("user", user_json);
        if let Some(avatar) = avatar {
            form = form.part("picture", Self::file_part(avatar)?);
        }

        self.request_multipart(Method::POST, "/api/users/signup", form, "Sign up")
            .await
    }

    pub async fn get_profile(&self) -> ApiResult<UserProfile> {
        self.request_api(
            Method::GET,
            "/api/users/profile",
            None::<&serde_json::Value>,
            "Load profile",
        )
        .await
    }

    // ---- Wines ------------------------------------------------------------

    pub async fn list_wines(&self) -> ApiResult<Vec<WineSummary>> {
        let env: ApiEnvelope<Vec<WineSummary>> = self
            .request_api(
                Method::GET,
                "/api/wines/list",
                None::<&serde_json::Value>,
                "Load wines",
            )
            .await?;
        Self::into_data(env, "Load wines")
    }

    pub async fn get_wine(&self, wine_id: &str) -> ApiResult<Wine> {
        let env: ApiEnvelope<Wine> = self
            .request_api(
                Method::GET,
                &format!("/api/wines/{wine_id}"),
                None::<&serde_json::Value>,
                "Load wine",
            )
            .await?;
        Self::into_data(env, "Load wine")
    }

    pub async fn upload_wine(
        &self,
        fields: &WineFields,
        image: Option<FilePayload>,
    ) -> ApiResult<String> {
        let info = serde_json::to_string(fields).map_err(ApiError::parse)?;
        let mut form = reqwest::multipart::Form::new().text("info", info);
        if let Some(image) = image {
            form = form.part("image", Self::file_part(image)?);
        }

        let env: ApiEnvelope<serde_json::Value> = self
            .request_multipart(Method::POST, "/api/wines/upload", form, "Upload wine")
            .await?;
        let data = Self::into_data(env, "Upload wine")?;

        // The id key has been observed in a couple of shapes; accept both.
        let id = data
            .get("wineId")
            .or_else(|| data.get("id"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        if id.trim().is_empty() {
            return Err(ApiError::parse(format!(
                "Upload wine succeeded but response is missing wineId: {data}"
            )));
        }

        Ok(id)
    }

    pub async fn replace_wine(&self, wine_id: &str, fields: &WineFields) -> ApiResult<()> {
        let env = self
            .request_api(
                Method::PUT,
                &format!("/api/wines/{wine_id}"),
                Some(fields),
                "Save wine",
            )
            .await?;
        Self::ack(env, "Save wine")
    }

    pub async fn delete_wine(&self, wine_id: &str) -> ApiResult<()> {
        let env = self
            .request_api(
                Method::DELETE,
                &format!("/api/wines/{wine_id}"),
                None::<&serde_json::Value>,
                "Delete wine",
            )
            .await?;
        Self::ack(env, "Delete wine")
    }

    pub async fn search_wines(&self, query: &str) -> ApiResult<Vec<Suggestion>> {
        let path = format!("/api/wines/search?query={}", urlencoding::encode(query));
        let env: ApiEnvelope<Vec<Suggestion>> = self
            .request_api(Method::GET, &path, None::<&serde_json::Value>, "Search")
            .await?;
        // An empty result set comes back as success with no data.
        match env.data {
            Some(list) if env.success => Ok(list),
            _ => Ok(vec![]),
        }
    }

    /// Recommendation criteria travel as request headers; the backend
    /// applies `4.3` / `5000` when a header is omitted, and so do we.
    pub async fn recommendations(
        &self,
        rating: Option<&str>,
        price: Option<&str>,
    ) -> ApiResult<Vec<WineSummary>> {
        let client = reqwest::Client::new();
        let url = format!("{}/api/wines/user/recommendations", self.base_url);
        let req = self
            .with_auth(client.get(url))
            .header("rating", rating.filter(|r| !r.trim().is_empty()).unwrap_or("4.3"))
            .header("price", price.filter(|p| !p.trim().is_empty()).unwrap_or("5000"));

        Self::read_response(
            req.send().await.map_err(ApiError::network)?,
            "Recommendations",
        )
        .await
    }

    // ---- Tasting notes ----------------------------------------------------

    pub async fn create_note(&self, wine_id: &str, content: &str) -> ApiResult<TastingNote> {
        let env: ApiEnvelope<CreatedNote> = self
            .request_api(
                Method::POST,
                &format!("/api/wines/{wine_id}/notes"),
                Some(&CreateNoteRequest {
                    content: content.to_string(),
                }),
                "Add note",
            )
            .await?;
        let created = Self::into_data(env, "Add note")?;

        Ok(TastingNote {
            note_id: created.note_id,
            content: content.to_string(),
            created_at: created.created_at,
            updated_at: created.updated_at,
        })
    }

    /// Returns the server-assigned `updatedAt` for the edited note.
    pub async fn update_note(
        &self,
        wine_id: &str,
        note_id: &str,
        content: &str,
    ) -> ApiResult<String> {
        let env: ApiEnvelope<UpdatedNote> = self
            .request_api(
                Method::PUT,
                &format!("/api/wines/{wine_id}/notes/{note_id}"),
                Some(&CreateNoteRequest {
                    content: content.to_string(),
                }),
                "Save note",
            )
            .await?;
        Ok(Self::into_data(env, "Save note")?.updated_at)
    }

    pub async fn delete_note(&self, wine_id: &str, note_id: &str) -> ApiResult<()> {
        let env = self
            .request_api(
                Method::DELETE,
                &format!("/api/wines/{wine_id}/notes/{note_id}"),
                None::<&serde_json::Value>,
                "Delete note",
            )
            .await?;
        Self::ack(env, "Delete note")
    }

    // ---- SAT note ---------------------------------------------------------

    /// A missing SAT note is a well-defined state (the wine simply has
    /// none yet), so 404 maps to `Ok(None)` here instead of an error.
    pub async fn get_sat_note(&self, wine_id: &str) -> ApiResult<Option<SatNote>> {
        let res: ApiResult<ApiEnvelope<SatNote>> = self
            .request_api(
                Method::GET,
                &format!("/api/wines/{wine_id}/sat-note"),
                None::<&serde_json::Value>,
                "Load SAT note",
            )
            .await;

        match res {
            Ok(env) => Self::into_data(env, "Load SAT note").map(Some),
            Err(e) if e.kind == ApiErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_sat_note(&self, wine_id: &str, sat: &SatNote) -> ApiResult<()> {
        let env = self
            .request_api(
                Method::POST,
                &format!("/api/wines/{wine_id}/sat-note"),
                Some(sat),
                "Save SAT note",
            )
            .await?;
        Self::ack(env, "Save SAT note")
    }

    pub async fn replace_sat_note(&self, wine_id: &str, sat: &SatNote) -> ApiResult<()> {
        let env = self
            .request_api(
                Method::PUT,
                &format!("/api/wines/{wine_id}/sat-note"),
                Some(sat),
                "Save SAT note",
            )
            .await?;
        Self::ack(env, "Save SAT note")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_contract_deserialize() {
        // Contract based on notevino backend: POST /api/users/signin
        let json = r#"{"token": "jwt-token"}"#;
        let parsed: LoginResponse =
            serde_json::from_str(json).expect("login response should parse");
        assert_eq!(parsed.token, "jwt-token");
    }

    #[test]
    fn test_envelope_with_data() {
        let json = r#"{"success": true, "data": [{"wineId": "w-1", "name": "Chablis"}]}"#;
        let env: ApiEnvelope<Vec<WineSummary>> =
            serde_json::from_str(json).expect("envelope should parse");
        let wines = ApiClient::into_data(env, "Load wines").expect("should unwrap data");
        assert_eq!(wines.len(), 1);
        assert_eq!(wines[0].name, "Chablis");
    }

    #[test]
    fn test_envelope_without_data_field() {
        // delete/replace acks carry no data
        let json = r#"{"success": true}"#;
        let env: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(json).expect("ack envelope should parse");
        assert!(ApiClient::ack(env, "Delete wine").is_ok());
    }

    #[test]
    fn test_envelope_reported_failure_is_an_error() {
        let json = r#"{"success": false}"#;
        let env: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(json).expect("envelope should parse");
        let err = ApiClient::ack(env, "Delete wine").expect_err("should be an error");
        assert_eq!(err.kind, ApiErrorKind::Http);
    }

    #[test]
    fn test_extract_error_detail_from_backend_body() {
        assert_eq!(
            extract_error_detail(r#"{"error": "Invalid email or password."}"#).as_deref(),
            Some("Invalid email or password.")
        );
        assert!(extract_error_detail("<html>bad gateway</html>").is_none());
    }

    #[test]
    fn test_created_note_contract_deserialize() {
        let json = r#"{
            "noteId": "n-9",
            "createdAt": "2024-05-01T08:00:00.000Z",
            "updatedAt": "2024-05-01T08:00:00.000Z"
        }"#;
        let created: CreatedNote = serde_json::from_str(json).expect("should parse");
        assert_eq!(created.note_id, "n-9");
    }

    #[test]
    fn test_api_client_auth_header() {
        let mut client = ApiClient::new("http://localhost:8080".to_string());
        assert!(client.auth_header().is_none());
        assert!(!client.is_authenticated());

        client.set_token("my-jwt-token".to_string());
        assert_eq!(
            client.auth_header().as_deref(),
            Some("Bearer my-jwt-token")
        );
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_validation_errors_are_local() {
        let err = ApiError::validation("Note content cannot be empty");
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert_eq!(err.to_string(), "Note content cannot be empty");
    }
}
