//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::{json, Value};
use wiremock::matchers::path_regex;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use blogdesk::api::Blog;
use blogdesk::app::ApiConfig;
use blogdesk::{ApiClient, Session};

/// Client pointed at the mock server, sharing `session`
pub fn client_for(server: &MockServer, session: &Session) -> ApiClient {
    let config = ApiConfig {
        base_url: server.uri(),
        timeout_secs: Some(5),
    };
    ApiClient::new(&config, session.clone()).expect("client builds")
}

pub fn success(message: &str, data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "success",
        "message": message,
        "data": data,
    }))
}

pub fn error(status: u16, code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "status": "error",
        "error": message,
        "code": code,
    }))
}

/// Tiny in-memory blog backend: POST /blog, GET /blog/{id}, GET /blogs.
/// Posts are kept in creation order.
#[derive(Default)]
pub struct FakeBlogBackend {
    blogs: Mutex<Vec<Blog>>,
}

impl FakeBlogBackend {
    pub async fn mount(server: &MockServer) {
        Mock::given(path_regex(r"^/blogs?(/\d+)?$"))
            .respond_with(Self::default())
            .mount(server)
            .await;
    }

    fn create(&self, request: &Request) -> ResponseTemplate {
        if !request.headers.contains_key("authorization") {
            return error(401, "UNAUTHORIZED", "Missing token");
        }
        let input: Value = match serde_json::from_slice(&request.body) {
            Ok(v) => v,
            Err(_) => return error(400, "BAD_REQUEST", "Invalid JSON"),
        };
        let mut blogs = self.blogs.lock();
        let blog = Blog {
            id: blogs.len() as i64 + 1,
            title: input["title"].as_str().unwrap_or_default().to_string(),
            body: input["body"].as_str().unwrap_or_default().to_string(),
        };
        blogs.push(blog.clone());
        ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "message": "Blog created",
            "data": blog,
        }))
    }

    fn get(&self, id: i64) -> ResponseTemplate {
        match self.blogs.lock().iter().find(|b| b.id == id) {
            Some(blog) => success("ok", json!(blog)),
            None => error(404, "NOT_FOUND", "Blog not found"),
        }
    }

    fn list(&self, request: &Request) -> ResponseTemplate {
        let sort = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "sort")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_else(|| "latest".to_string());

        let mut blogs = self.blogs.lock().clone();
        if sort == "latest" {
            blogs.reverse();
        }
        let total = blogs.len();
        success(
            "ok",
            json!({
                "blogs": blogs,
                "pagination": {"page": 1, "limit": 10, "total": total},
            }),
        )
    }
}

impl Respond for FakeBlogBackend {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let path = request.url.path().to_string();
        let method = request.method.as_str();

        if path == "/blogs" && method == "GET" {
            return self.list(request);
        }
        if path == "/blog" && method == "POST" {
            return self.create(request);
        }
        if let Some(id) = path.strip_prefix("/blog/").and_then(|id| id.parse().ok()) {
            if method == "GET" {
                return self.get(id);
            }
        }
        error(404, "NOT_FOUND", "No such route")
    }
}
