use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::{ApiError, ErrorCode};
use super::types::{
    ApiSuccess, Blog, BlogPage, Envelope, ListParams, LoginData, LoginRequest, NewBlog,
    RegisterRequest, UpdateBlogRequest, UpdateUserRequest, User,
};
use crate::app::ApiConfig;
use crate::constants::{CONTENT_TYPE_JSON, GENERIC_FAILURE_MESSAGE, PASSWORD_HEADER};
use crate::session::Session;
use crate::utils::{BlogdeskError, Result};

/// Gateway to the blog backend.
///
/// Each call goes to `base_url`, carries a JSON content type and, when the
/// shared [`Session`] holds a token, `Authorization: Bearer <token>`.
/// A 401 from any endpoint clears the session before the error is returned.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request with the headers every call carries
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, self.url(path))
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON);

        if let Some(token) = self.session.token() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        request
    }

    /// Send a prepared request and unwrap the success envelope
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<ApiSuccess<T>> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url().path());

        let (is_json, body) = read_body(response).await?;

        if !status.is_success() {
            let error = error_from_body(status.as_u16(), is_json, body);
            if error.is_unauthorized() {
                warn!("Backend rejected the session token, signing out");
                if let Err(e) = self.session.clear() {
                    warn!("Failed to clear stored token: {}", e);
                }
            }
            return Err(error.into());
        }

        if body.trim().is_empty() {
            // 204 and friends: nothing to decode
            return Ok(ApiSuccess {
                message: String::new(),
                data: None,
            });
        }
        if !is_json {
            return Err(BlogdeskError::NonJsonResponse {
                status: status.as_u16(),
                body,
            });
        }
        decode_success(serde_json::from_str(&body)?)
    }

    pub(crate) async fn call<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<ApiSuccess<T>> {
        self.send(self.request(method, path)).await
    }

    pub(crate) async fn call_with<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiSuccess<T>> {
        let request = self.request(method, path).body(serde_json::to_vec(body)?);
        self.send(request).await
    }

    // Auth

    pub async fn register(&self, input: &RegisterRequest) -> Result<ApiSuccess<serde_json::Value>> {
        self.call_with(Method::POST, "/auth/register", input).await
    }

    /// Exchange credentials for a token. Storing it is the session's job.
    pub async fn login(&self, input: &LoginRequest) -> Result<ApiSuccess<LoginData>> {
        let response: ApiSuccess<LoginData> = self.call_with(Method::POST, "/auth/login", input).await?;
        if response.data.is_none() {
            return Err(BlogdeskError::Decode(<serde_json::Error as serde::de::Error>::missing_field(
                "access_token",
            )));
        }
        Ok(response)
    }

    // User

    pub async fn current_user(&self) -> Result<ApiSuccess<User>> {
        self.call(Method::GET, "/user").await
    }

    pub async fn get_user(&self, id: i64) -> Result<ApiSuccess<User>> {
        self.call(Method::GET, &format!("/user/{}", id)).await
    }

    pub async fn update_user(&self, input: &UpdateUserRequest) -> Result<ApiSuccess<serde_json::Value>> {
        self.call_with(Method::PATCH, "/user", input).await
    }

    /// Delete the signed-in account; the backend re-checks the password
    pub async fn delete_user(&self, password: &str) -> Result<ApiSuccess<serde_json::Value>> {
        let request = self
            .request(Method::DELETE, "/user")
            .header(PASSWORD_HEADER, password);
        self.send(request).await
    }

    pub async fn list_user_blogs(&self, user_id: i64, params: &ListParams) -> Result<ApiSuccess<BlogPage>> {
        let request = self
            .request(Method::GET, &format!("/user/{}/blogs", user_id))
            .query(&params.to_query());
        self.send(request).await
    }

    // Blogs

    pub async fn list_blogs(&self, params: &ListParams) -> Result<ApiSuccess<BlogPage>> {
        let request = self.request(Method::GET, "/blogs").query(&params.to_query());
        self.send(request).await
    }

    pub async fn get_blog(&self, id: i64) -> Result<ApiSuccess<Blog>> {
        self.call(Method::GET, &format!("/blog/{}", id)).await
    }

    /// The backend may or may not echo the created post back in `data`
    pub async fn create_blog(&self, input: &NewBlog) -> Result<ApiSuccess<Blog>> {
        self.call_with(Method::POST, "/blog", input).await
    }

    pub async fn update_blog(&self, id: i64, input: &UpdateBlogRequest) -> Result<ApiSuccess<serde_json::Value>> {
        self.call_with(Method::PATCH, &format!("/blog/{}", id), input).await
    }

    pub async fn delete_blog(&self, id: i64) -> Result<ApiSuccess<serde_json::Value>> {
        self.call(Method::DELETE, &format!("/blog/{}", id)).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

/// Whether the body is JSON (by content type), and the raw body text
async fn read_body(response: Response) -> Result<(bool, String)> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains(CONTENT_TYPE_JSON))
        .unwrap_or(false);

    Ok((is_json, response.text().await?))
}

fn decode_success<T: DeserializeOwned>(value: serde_json::Value) -> Result<ApiSuccess<T>> {
    match serde_json::from_value::<Envelope<T>>(value)? {
        Envelope::Success { message, data } => Ok(ApiSuccess { message, data }),
        // 2xx carrying an error envelope still counts as a failure
        Envelope::Error { error, code, details } => Err(ApiError {
            status: 200,
            code,
            message: error,
            details,
        }
        .into()),
    }
}

/// Build the typed error for a non-2xx response.
///
/// A proper error envelope is taken verbatim; anything else is classified
/// from the status, with the body text as the message.
fn error_from_body(status: u16, is_json: bool, body: String) -> ApiError {
    let parsed = if is_json {
        serde_json::from_str::<serde_json::Value>(&body).ok()
    } else {
        None
    };

    let Some(value) = parsed else {
        let message = if body.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            body
        };
        return ApiError {
            status,
            code: ErrorCode::from_status(status),
            message,
            details: None,
        };
    };

    match serde_json::from_value::<Envelope<serde_json::Value>>(value.clone()) {
        Ok(Envelope::Error { error, code, details }) => ApiError {
            status,
            code,
            message: error,
            details,
        },
        _ => ApiError {
            status,
            code: ErrorCode::from_status(status),
            message: loose_message(&value),
            details: None,
        },
    }
}

/// Best-effort message from a JSON body that is not a proper envelope
fn loose_message(value: &serde_json::Value) -> String {
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}
