// Copyright 2025 The NoteQ Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Raw request forwarding: anything under `/api-proxy/` goes to the backend
//! origin with the prefix stripped, so browser-side calls share the server's
//! backend configuration.

use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::RawQuery;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::utf8_percent_encode;

use crate::serve::state::ServerState;

// The captured path arrives percent-decoded; re-encode everything that would
// change its meaning in a URL, keeping segment separators.
const PATH_SET: &AsciiSet = &CONTROLS.add(b' ').add(b'?').add(b'#').add(b'%');

pub fn proxied_url(origin: &str, rest: &str, query: Option<&str>) -> String {
    let path = utf8_percent_encode(rest, PATH_SET);
    match query {
        Some(query) => format!("{origin}/{path}?{query}"),
        None => format!("{origin}/{path}"),
    }
}

type ProxyResponse = (StatusCode, [(HeaderName, String); 1], Vec<u8>);

pub async fn forward(
    State(state): State<ServerState>,
    method: Method,
    Path(rest): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> ProxyResponse {
    let url = proxied_url(&state.backend.origin, &rest, query.as_deref());
    let method = match reqwest::Method::from_bytes(method.as_str().as_bytes()) {
        Ok(method) => method,
        Err(_) => return bad_gateway("unsupported method"),
    };
    let mut request = state.backend.http.request(method, &url);
    for name in [CONTENT_TYPE, AUTHORIZATION] {
        if let Some(value) = headers.get(&name).and_then(|v| v.to_str().ok()) {
            request = request.header(name.as_str(), value);
        }
    }
    let response = match request.body(body.to_vec()).send().await {
        Ok(response) => response,
        Err(e) => {
            log::error!("proxying to {url} failed: {e}");
            return bad_gateway("backend unreachable");
        }
    };
    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let body = match response.bytes().await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            log::error!("reading proxied response from {url} failed: {e}");
            return bad_gateway("backend response unreadable");
        }
    };
    (status, [(CONTENT_TYPE, content_type)], body)
}

fn bad_gateway(message: &str) -> ProxyResponse {
    (
        StatusCode::BAD_GATEWAY,
        [(CONTENT_TYPE, "text/plain".to_string())],
        message.as_bytes().to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxied_url_plain() {
        assert_eq!(
            proxied_url("http://127.0.0.1:8000", "api/notes/", None),
            "http://127.0.0.1:8000/api/notes/"
        );
    }

    #[test]
    fn test_proxied_url_keeps_query_and_encodes_path() {
        assert_eq!(
            proxied_url("http://h", "api/a b/%x", Some("q=1")),
            "http://h/api/a%20b/%25x?q=1"
        );
    }
}
