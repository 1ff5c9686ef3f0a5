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

//! Client for the Django backend. Each call performs one HTTP request with a
//! bearer token; there are no retries. A non-2xx response is surfaced as a
//! message string, a transport error as an [ErrorReport](crate::error::ErrorReport).

pub mod auth;
pub mod notes;
pub mod quiz;

use serde_json::Value;

use crate::backend::auth::AuthApi;
use crate::backend::notes::NotesApi;
use crate::backend::quiz::QuizApi;

/// Result of a mutating call: a success flag plus a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// A response the backend produced: either the decoded payload, or a
/// rejection message from a non-2xx status.
#[derive(Clone, Debug)]
pub enum ApiResponse<T> {
    Accepted(T),
    Rejected(String),
}

pub struct Backend {
    pub auth: AuthApi,
    pub quiz: QuizApi,
    pub notes: NotesApi,
    /// Shared client and origin, also used for raw request forwarding.
    pub http: reqwest::Client,
    pub origin: String,
}

impl Backend {
    pub fn new(origin: &str) -> Self {
        let http = reqwest::Client::new();
        let origin = origin.trim_end_matches('/').to_string();
        Self {
            auth: AuthApi::new(http.clone(), origin.clone()),
            quiz: QuizApi::new(http.clone(), origin.clone()),
            notes: NotesApi::new(http.clone(), origin.clone()),
            http,
            origin,
        }
    }
}

/// Extract a rejection message from an error body. The backend variously
/// reports `error`, `detail`, or `message`; fall back to the raw text, or the
/// status code when the body is empty.
pub(crate) fn rejection_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(text) = value.get(key).and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }
    if body.trim().is_empty() {
        format!("request failed with status {status}")
    } else {
        body.trim().to_string()
    }
}

/// Unwrap a list the backend may return bare or under a wrapper key.
pub(crate) fn items<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    if let Some(array) = value.as_array() {
        return Some(array);
    }
    for key in keys {
        if let Some(array) = value.get(key).and_then(Value::as_array) {
            return Some(array);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_rejection_message_fields() {
        let status = reqwest::StatusCode::BAD_REQUEST;
        assert_eq!(
            rejection_message(status, r#"{"error": "bad login"}"#),
            "bad login"
        );
        assert_eq!(
            rejection_message(status, r#"{"detail": "not found"}"#),
            "not found"
        );
        assert_eq!(rejection_message(status, "plain text"), "plain text");
        assert_eq!(
            rejection_message(status, ""),
            "request failed with status 400 Bad Request"
        );
    }

    #[test]
    fn test_items_bare_and_wrapped() {
        let bare = json!([1, 2]);
        assert_eq!(items(&bare, &["data"]).unwrap().len(), 2);
        let wrapped = json!({"results": [1]});
        assert_eq!(items(&wrapped, &["data", "results"]).unwrap().len(), 1);
        let neither = json!({"count": 0});
        assert!(items(&neither, &["data"]).is_none());
    }
}
