//! Auth-header presets and API templates used to pre-fill requests.
//!
//! The catalog is a plain value built by `Catalog::builtin()` and handed to
//! whoever needs it. Nothing in the dispatcher reads it; it only produces the
//! method, URL and header strings the shell feeds into a `Request`.

use crate::headers::HeaderMap;

/// A named set of authentication headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPreset {
    pub key: &'static str,
    pub name: &'static str,
    pub headers: Vec<(&'static str, &'static str)>,
    pub description: &'static str,
    pub docs: Option<&'static str>,
}

impl AuthPreset {
    /// Render as `Key: Value` lines, ready for the header editor.
    pub fn header_text(&self) -> String {
        self.headers
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn header_map(&self) -> HeaderMap {
        self.headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// One example call within an `ApiTemplate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateExample {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// A well-known API with a base URL and example calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub base_url: &'static str,
    /// Key of the `AuthPreset` this API expects.
    pub auth: &'static str,
    pub description: &'static str,
    pub docs: Option<&'static str>,
    pub examples: Vec<TemplateExample>,
}

impl ApiTemplate {
    pub fn url_for(&self, example: &TemplateExample) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), example.path)
    }
}

/// All presets and templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub auth_presets: Vec<AuthPreset>,
    pub templates: Vec<ApiTemplate>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            auth_presets: builtin_auth_presets(),
            templates: builtin_templates(),
        }
    }

    pub fn auth_preset_names(&self) -> Vec<&'static str> {
        self.auth_presets.iter().map(|p| p.name).collect()
    }

    pub fn template_names(&self) -> Vec<&'static str> {
        self.templates.iter().map(|t| t.name).collect()
    }

    pub fn auth_preset(&self, key: &str) -> Option<&AuthPreset> {
        self.auth_presets.iter().find(|p| p.key == key)
    }

    /// Lookup by display name, falling back to the first preset ("No Auth").
    pub fn auth_preset_by_name(&self, name: &str) -> Option<&AuthPreset> {
        self.auth_presets
            .iter()
            .find(|p| p.name == name)
            .or_else(|| self.auth_presets.first())
    }

    /// Lookup by display name, falling back to the first template
    /// ("Localhost").
    pub fn template_by_name(&self, name: &str) -> Option<&ApiTemplate> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .or_else(|| self.templates.first())
    }

    /// The auth preset a template declares.
    pub fn auth_for(&self, template: &ApiTemplate) -> Option<&AuthPreset> {
        self.auth_preset(template.auth)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn example(method: &'static str, path: &'static str, description: &'static str) -> TemplateExample {
    TemplateExample {
        method,
        path,
        description,
    }
}

fn builtin_auth_presets() -> Vec<AuthPreset> {
    vec![
        AuthPreset {
            key: "none",
            name: "No Auth",
            headers: vec![],
            description: "No authentication",
            docs: None,
        },
        AuthPreset {
            key: "bearer",
            name: "Bearer Token",
            headers: vec![("Authorization", "Bearer <YOUR_TOKEN>")],
            description: "JWT or OAuth2 bearer token",
            docs: Some("https://jwt.io/"),
        },
        AuthPreset {
            key: "basic",
            name: "Basic Auth",
            headers: vec![("Authorization", "Basic <BASE64_CREDENTIALS>")],
            description: "Base64 encoded username:password",
            docs: Some("https://developer.mozilla.org/en-US/docs/Web/HTTP/Authentication"),
        },
        AuthPreset {
            key: "api_key_header",
            name: "API Key (Header)",
            headers: vec![("X-Api-Key", "<YOUR_API_KEY>")],
            description: "API key in X-Api-Key header",
            docs: None,
        },
        AuthPreset {
            key: "api_key_auth",
            name: "API Key (Authorization)",
            headers: vec![("Authorization", "ApiKey <YOUR_API_KEY>")],
            description: "API key in Authorization header",
            docs: None,
        },
    ]
}

fn builtin_templates() -> Vec<ApiTemplate> {
    vec![
        ApiTemplate {
            key: "localhost",
            name: "Localhost",
            base_url: "http://localhost:8080",
            auth: "none",
            description: "Local development server",
            docs: None,
            examples: vec![
                example("GET", "/api/health", "Health check"),
                example("GET", "/api/status", "Status endpoint"),
                example("GET", "/api/v1/users", "List users"),
            ],
        },
        ApiTemplate {
            key: "microsoft_graph",
            name: "Microsoft Graph API",
            base_url: "https://graph.microsoft.com/v1.0",
            auth: "bearer",
            description: "Microsoft 365 & Azure AD API",
            docs: Some("https://learn.microsoft.com/en-us/graph/api/overview"),
            examples: vec![
                example("GET", "/me", "Get current user"),
                example("GET", "/me/messages", "List emails"),
                example("GET", "/me/drive/root/children", "OneDrive files"),
                example("GET", "/me/calendar/events", "Calendar events"),
            ],
        },
        ApiTemplate {
            key: "github",
            name: "GitHub API",
            base_url: "https://api.github.com",
            auth: "bearer",
            description: "GitHub REST API v3",
            docs: Some("https://docs.github.com/en/rest"),
            examples: vec![
                example("GET", "/user", "Authenticated user"),
                example("GET", "/user/repos", "List repositories"),
                example("GET", "/repos/:owner/:repo", "Get repository"),
                example("GET", "/repos/:owner/:repo/issues", "List issues"),
            ],
        },
        ApiTemplate {
            key: "jsonplaceholder",
            name: "JSONPlaceholder",
            base_url: "https://jsonplaceholder.typicode.com",
            auth: "none",
            description: "Free fake REST API for testing",
            docs: Some("https://jsonplaceholder.typicode.com/"),
            examples: vec![
                example("GET", "/posts", "List posts"),
                example("GET", "/posts/1", "Get post by ID"),
                example("POST", "/posts", "Create post"),
                example("GET", "/users", "List users"),
                example("GET", "/comments?postId=1", "Comments for post"),
            ],
        },
        ApiTemplate {
            key: "httpbin",
            name: "HTTPBin",
            base_url: "https://httpbin.org",
            auth: "none",
            description: "HTTP request & response testing",
            docs: Some("https://httpbin.org/"),
            examples: vec![
                example("GET", "/get", "Returns GET data"),
                example("POST", "/post", "Returns POST data"),
                example("GET", "/headers", "Returns request headers"),
                example("GET", "/ip", "Returns origin IP"),
                example("GET", "/status/418", "I'm a teapot!"),
            ],
        },
        ApiTemplate {
            key: "reqres",
            name: "ReqRes",
            base_url: "https://reqres.in/api",
            auth: "none",
            description: "Fake API for testing with auth flows",
            docs: Some("https://reqres.in/"),
            examples: vec![
                example("GET", "/users", "List users (paginated)"),
                example("GET", "/users/2", "Single user"),
                example("POST", "/register", "Register user"),
                example("POST", "/login", "Login"),
            ],
        },
    ]
}
