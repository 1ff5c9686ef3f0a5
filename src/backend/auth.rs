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

use serde_json::Value;
use serde_json::json;

use crate::backend::ApiResponse;
use crate::backend::Outcome;
use crate::backend::rejection_message;
use crate::error::Fallible;
use crate::error::fail;

/// What a successful login yields. Mirrors the localStorage keys of a
/// browser client: token, user id, and the paid-tier flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub user_id: Option<i64>,
    pub plus: bool,
}

/// Account details from `GET /users/{id}`. Every field is optional, the
/// backend omits what it does not track.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub username: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<String>,
}

impl UserProfile {
    /// Registration date as `yyyy/mm/dd`, when the timestamp parses.
    pub fn member_since(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?;
        let parsed = chrono::DateTime::parse_from_rfc3339(raw).ok()?;
        Some(parsed.format("%Y/%m/%d").to_string())
    }
}

#[derive(Clone)]
pub struct AuthApi {
    http: reqwest::Client,
    origin: String,
}

impl AuthApi {
    pub fn new(http: reqwest::Client, origin: String) -> Self {
        Self { http, origin }
    }

    /// Log in with email and password. The token arrives as either `token`
    /// or `access` depending on the backend route.
    pub async fn login(&self, email: &str, password: &str) -> Fallible<ApiResponse<Credentials>> {
        let url = format!("{}/login/", self.origin);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Ok(ApiResponse::Rejected(rejection_message(status, &body)));
        }
        let value: Value = serde_json::from_str(&body)?;
        let token = value
            .get("token")
            .and_then(Value::as_str)
            .or_else(|| value.get("access").and_then(Value::as_str));
        let token = match token {
            Some(token) => token.to_string(),
            None => return fail("login response carried no token."),
        };
        Ok(ApiResponse::Accepted(Credentials {
            token,
            user_id: value.get("user_id").and_then(Value::as_i64),
            plus: value
                .get("is_paid")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }))
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Fallible<Outcome> {
        let url = format!("{}/register/", self.origin);
        let body = json!({ "username": username, "email": email, "password": password });
        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(Outcome::ok("Account created. You can log in now."))
        } else {
            let body = response.text().await?;
            Ok(Outcome::err(rejection_message(status, &body)))
        }
    }

    pub async fn forgot_password(&self, email: &str) -> Fallible<Outcome> {
        let url = format!("{}/forgot-password/", self.origin);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "email": email }))
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(Outcome::ok("Password reset email sent."))
        } else {
            let body = response.text().await?;
            Ok(Outcome::err(rejection_message(status, &body)))
        }
    }

    /// Fetch the account details shown on the profile page.
    pub async fn profile(&self, token: &str, user_id: i64) -> Fallible<UserProfile> {
        let url = format!("{}/users/{}", self.origin, user_id);
        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return fail(&rejection_message(status, &body));
        }
        let value: Value = serde_json::from_str(&body)?;
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Ok(UserProfile {
            username: field("username"),
            email: field("email"),
            created_at: field("created_at"),
        })
    }

    /// Change the password. [validate_password_change] should pass before
    /// calling this.
    pub async fn change_password(
        &self,
        token: &str,
        old_password: &str,
        new_password: &str,
    ) -> Fallible<Outcome> {
        let url = format!("{}/api/change_password/", self.origin);
        let body = json!({ "old_password": old_password, "new_password": new_password });
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(Outcome::ok("Password changed."))
        } else {
            let body = response.text().await?;
            Ok(Outcome::err(rejection_message(status, &body)))
        }
    }
}

/// Local checks applied before a password change is sent.
pub fn validate_password_change(old_password: &str, new_password: &str) -> Result<(), String> {
    if old_password.is_empty() || new_password.is_empty() {
        return Err("Enter both the old and the new password.".to_string());
    }
    if new_password.len() < 6 {
        return Err("The new password must be at least 6 characters.".to_string());
    }
    if old_password == new_password {
        return Err("The new password must differ from the old one.".to_string());
    }
    Ok(())
}
