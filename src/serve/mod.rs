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

mod get;
mod post;
mod proxy;
pub mod server;
mod state;
mod template;
mod view;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::time::Duration;

    use axum::Json;
    use axum::Router;
    use axum::extract::Path;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::delete;
    use axum::routing::get;
    use axum::routing::patch;
    use axum::routing::post;
    use serde_json::Value;
    use serde_json::json;
    use serial_test::serial;
    use tokio::net::TcpListener;
    use tokio::net::TcpStream;
    use tokio::spawn;
    use tokio::time::sleep;

    use crate::config::Config;
    use crate::error::Fallible;
    use crate::serve::server::start_server;

    /// In-memory stand-in for the Django backend.
    #[derive(Default)]
    struct Stub {
        notes: Vec<Value>,
        subjects: Vec<String>,
        next_id: i64,
    }

    type StubState = Arc<Mutex<Stub>>;

    async fn stub_login() -> Json<Value> {
        Json(json!({ "token": "test-token", "user_id": 1, "is_paid": true }))
    }

    async fn stub_quiz(Json(body): Json<Value>) -> Json<Value> {
        let topic = body
            .get("topic")
            .and_then(Value::as_str)
            .unwrap_or("algebra");
        Json(json!({
            "quiz": {
                "id": 1,
                "quiz_topic": topic,
                "difficulty": body.get("difficulty"),
                "question_count": body.get("question_count"),
                "user": 1
            },
            "topics": [
                {
                    "id": 11,
                    "title": "What is 2 + 2?",
                    "option_A": "4",
                    "option_B": "5",
                    "option_C": "6",
                    "option_D": "7",
                    "Ai_answer": "A",
                    "explanation_text": "Two and two make four."
                },
                {
                    "id": 12,
                    "title": "What is 3 * 3?",
                    "option_A": "9",
                    "option_B": "6",
                    "option_C": "8",
                    "option_D": "12",
                    "Ai_answer": "A"
                }
            ]
        }))
    }

    async fn stub_user(Path(id): Path<i64>) -> Json<Value> {
        Json(json!({
            "id": id,
            "username": "testuser",
            "email": "user@example.com",
            "created_at": "2024-03-01T09:30:00Z"
        }))
    }

    async fn stub_submit() -> Json<Value> {
        Json(json!({ "familiarity": 0.5, "updated": true }))
    }

    async fn stub_familiarity() -> Json<Value> {
        Json(json!([
            { "quiz_topic": { "id": 1, "quiz_topic": "algebra" }, "familiarity": 0.5 }
        ]))
    }

    async fn stub_list_notes(State(stub): State<StubState>) -> Json<Value> {
        Json(json!(stub.lock().unwrap().notes))
    }

    async fn stub_create_note(
        State(stub): State<StubState>,
        Json(mut body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let mut stub = stub.lock().unwrap();
        stub.next_id += 1;
        body["id"] = json!(stub.next_id);
        stub.notes.push(body.clone());
        (StatusCode::CREATED, Json(body))
    }

    async fn stub_update_note(
        State(stub): State<StubState>,
        Path(id): Path<i64>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let mut stub = stub.lock().unwrap();
        for note in &mut stub.notes {
            if note.get("id").and_then(Value::as_i64) == Some(id) {
                for key in ["title", "content", "subject"] {
                    if let Some(value) = body.get(key) {
                        note[key] = value.clone();
                    }
                }
                return StatusCode::OK;
            }
        }
        StatusCode::NOT_FOUND
    }

    async fn stub_delete_note(State(stub): State<StubState>, Path(id): Path<i64>) -> StatusCode {
        stub.lock()
            .unwrap()
            .notes
            .retain(|note| note.get("id").and_then(Value::as_i64) != Some(id));
        StatusCode::NO_CONTENT
    }

    async fn stub_move_note(
        State(stub): State<StubState>,
        Path(id): Path<i64>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let mut stub = stub.lock().unwrap();
        for note in &mut stub.notes {
            if note.get("id").and_then(Value::as_i64) == Some(id) {
                note["subject"] = body["subject"].clone();
                return StatusCode::OK;
            }
        }
        StatusCode::NOT_FOUND
    }

    async fn stub_list_subjects(State(stub): State<StubState>) -> Json<Value> {
        Json(json!(stub.lock().unwrap().subjects))
    }

    async fn stub_create_subject(
        State(stub): State<StubState>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let name = body
            .get("quiz_topic")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        stub.lock().unwrap().subjects.push(name);
        (StatusCode::CREATED, Json(body))
    }

    async fn stub_delete_subject(
        State(stub): State<StubState>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let name = body
            .get("quiz_topic")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let mut stub = stub.lock().unwrap();
        stub.subjects.retain(|s| *s != name);
        stub.notes
            .retain(|note| note.get("subject").and_then(Value::as_str) != Some(name.as_str()));
        StatusCode::OK
    }

    fn stub_router(initial_subjects: &[&str]) -> Router {
        let state: StubState = Arc::new(Mutex::new(Stub {
            subjects: initial_subjects.iter().map(|s| s.to_string()).collect(),
            ..Stub::default()
        }));
        Router::new()
            .route("/login/", post(stub_login))
            .route("/users/{id}", get(stub_user))
            .route("/api/quiz/", post(stub_quiz))
            .route("/api/submit_answer/", post(stub_submit))
            .route("/api/familiarity/", get(stub_familiarity))
            .route("/api/notes/", get(stub_list_notes))
            .route("/api/notes/", post(stub_create_note))
            .route("/api/notes/{id}/", patch(stub_update_note))
            .route("/api/notes/{id}/", delete(stub_delete_note))
            .route("/api/notes/{id}/move/", post(stub_move_note))
            .route("/api/quiz_topics/", get(stub_list_subjects))
            .route("/api/quiz_topics/", post(stub_create_subject))
            .route("/api/quiz_topics/soft_delete/", post(stub_delete_subject))
            .with_state(state)
    }

    async fn wait_for(bind: &str) {
        loop {
            if let Ok(stream) = TcpStream::connect(bind).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
    }

    /// Boot the stub backend and the app on unused ports, returning the app's
    /// base URL.
    async fn boot(initial_subjects: &'static [&'static str]) -> Fallible<String> {
        let backend_port = portpicker::pick_unused_port().unwrap();
        let app_port = portpicker::pick_unused_port().unwrap();
        spawn(async move {
            let bind = format!("127.0.0.1:{backend_port}");
            let listener = TcpListener::bind(&bind).await.unwrap();
            axum::serve(listener, stub_router(initial_subjects))
                .await
                .unwrap();
        });
        wait_for(&format!("127.0.0.1:{backend_port}")).await;
        let config = Config {
            backend_origin: format!("http://127.0.0.1:{backend_port}"),
            port: app_port,
        };
        spawn(async move { start_server(config, false).await });
        wait_for(&format!("127.0.0.1:{app_port}")).await;
        Ok(format!("http://127.0.0.1:{app_port}"))
    }

    async fn login(client: &reqwest::Client, base: &str) -> Fallible<()> {
        let response = client
            .post(format!("{base}/login"))
            .form(&[
                ("action", "Login"),
                ("email", "user@example.com"),
                ("password", "hunter22"),
            ])
            .send()
            .await?;
        assert!(response.status().is_success());
        Ok(())
    }

    /// Resolve the live dialog the way the in-page form would.
    async fn answer_dialog(
        client: &reqwest::Client,
        base: &str,
        kind: &str,
        choice: &str,
        value: &str,
        from: &str,
    ) -> Fallible<()> {
        let response = client
            .post(format!("{base}/dialog"))
            .form(&[
                ("kind", kind),
                ("choice", choice),
                ("value", value),
                ("from", from),
            ])
            .send()
            .await?;
        assert!(response.status().is_success());
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn test_static_routes() -> Fallible<()> {
        let base = boot(&[]).await?;

        let response = reqwest::get(format!("{base}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        let response = reqwest::get(format!("{base}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = reqwest::get(format!("{base}/")).await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("NoteQ"));
        assert!(html.contains("/login"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn test_play_through_to_results() -> Fallible<()> {
        let base = boot(&["algebra"]).await?;
        let client = reqwest::Client::new();
        login(&client, &base).await?;

        // Home now shows the Plus badge from the stub login.
        let html = client.get(format!("{base}/")).send().await?.text().await?;
        assert!(html.contains("Plus"));
        assert!(html.contains("Signed in"));

        // Start a two-question challenge. The redirect lands on the play page.
        let response = client
            .post(format!("{base}/start"))
            .form(&[
                ("action", "Start"),
                ("topic", "algebra"),
                ("difficulty", "advanced"),
                ("question_count", "2"),
            ])
            .send()
            .await?;
        let html = response.text().await?;
        assert!(html.contains("Question 1 / 2"));
        assert!(html.contains("What is 2 + 2?"));

        // Right answer, then wrong answer.
        let response = client
            .post(format!("{base}/play"))
            .form(&[("action", "A")])
            .send()
            .await?;
        let html = response.text().await?;
        assert!(html.contains("Question 2 / 2"));
        assert!(html.contains("What is 3 * 3?"));

        client
            .post(format!("{base}/play"))
            .form(&[("action", "B")])
            .send()
            .await?;
        let response = client
            .post(format!("{base}/play"))
            .form(&[("action", "Complete")])
            .send()
            .await?;
        let html = response.text().await?;
        assert!(html.contains("Results: algebra"));
        assert!(html.contains("50%"));
        assert!(html.contains("Two and two make four."));

        // Favorite the second question into the notebook.
        let response = client
            .post(format!("{base}/results"))
            .form(&[("action", "Favorite"), ("number", "2"), ("subject", "algebra")])
            .send()
            .await?;
        let html = response.text().await?;
        assert!(html.contains("custom-alert-modal active"));
        answer_dialog(&client, &base, "alert", "ok", "", "/results").await?;

        let html = client
            .get(format!("{base}/notes?subject=algebra"))
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("What is 3 * 3?"));
        assert!(html.contains("Correct answer: A. 9"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn test_start_validation() -> Fallible<()> {
        let base = boot(&[]).await?;
        let client = reqwest::Client::new();

        // Difficulty is checked before everything else.
        let response = client
            .post(format!("{base}/start"))
            .form(&[("topic", "algebra")])
            .send()
            .await?;
        let html = response.text().await?;
        assert!(html.contains("custom-alert-modal active"));
        assert!(html.contains("Choose a difficulty level first."));
        answer_dialog(&client, &base, "alert", "ok", "", "/start").await?;

        // The count must be between 1 and 3.
        let response = client
            .post(format!("{base}/start"))
            .form(&[
                ("topic", "algebra"),
                ("difficulty", "beginner"),
                ("question_count", "7"),
            ])
            .send()
            .await?;
        let html = response.text().await?;
        assert!(html.contains("The question count must be between 1 and 3."));
        answer_dialog(&client, &base, "alert", "ok", "", "/start").await?;

        // A valid form without a login redirects to the login page.
        let response = client
            .post(format!("{base}/start"))
            .form(&[
                ("topic", "algebra"),
                ("difficulty", "beginner"),
                ("question_count", "2"),
            ])
            .send()
            .await?;
        let html = response.text().await?;
        assert!(html.contains("Log in"));
        assert!(html.contains("Log in to start a challenge."));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn test_notebook_flow() -> Fallible<()> {
        let base = boot(&["algebra"]).await?;
        let client = reqwest::Client::new();
        login(&client, &base).await?;

        // Adding a subject goes through a prompt dialog.
        let response = client
            .post(format!("{base}/notes"))
            .form(&[("action", "AddSubject"), ("subject", "algebra")])
            .send()
            .await?;
        let html = response.text().await?;
        assert!(html.contains("custom-prompt-modal active"));
        assert!(html.contains("Name the new subject"));
        answer_dialog(
            &client,
            &base,
            "prompt",
            "ok",
            "chemistry",
            "/notes?subject=algebra",
        )
        .await?;
        let html = client
            .get(format!("{base}/notes?subject=chemistry"))
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("chemistry"));

        // Add a note, then delete it through the confirm dialog.
        let response = client
            .post(format!("{base}/notes"))
            .form(&[
                ("action", "AddNote"),
                ("subject", "chemistry"),
                ("title", "Moles"),
                ("content", "One mole is 6.02e23 of anything."),
            ])
            .send()
            .await?;
        let html = response.text().await?;
        assert!(html.contains("custom-alert-modal active"));
        answer_dialog(&client, &base, "alert", "ok", "", "/notes?subject=chemistry").await?;
        let html = client
            .get(format!("{base}/notes?subject=chemistry"))
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("Moles"));

        let response = client
            .post(format!("{base}/notes"))
            .form(&[
                ("action", "DeleteNote"),
                ("subject", "chemistry"),
                ("id", "1"),
            ])
            .send()
            .await?;
        let html = response.text().await?;
        assert!(html.contains("custom-confirm-modal active"));
        answer_dialog(
            &client,
            &base,
            "confirm",
            "ok",
            "",
            "/notes?subject=chemistry",
        )
        .await?;
        answer_dialog(&client, &base, "alert", "ok", "", "/notes?subject=chemistry").await?;
        let html = client
            .get(format!("{base}/notes?subject=chemistry"))
            .send()
            .await?
            .text()
            .await?;
        assert!(!html.contains("Moles"));

        // Cancelling a confirm leaves everything in place.
        let response = client
            .post(format!("{base}/notes"))
            .form(&[("action", "DeleteSubject"), ("subject", "chemistry")])
            .send()
            .await?;
        assert!(response.status().is_success());
        answer_dialog(
            &client,
            &base,
            "confirm",
            "cancel",
            "",
            "/notes?subject=chemistry",
        )
        .await?;
        let html = client
            .get(format!("{base}/notes?subject=chemistry"))
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("chemistry"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn test_proxy_forwards_to_backend() -> Fallible<()> {
        let base = boot(&["algebra"]).await?;
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{base}/api-proxy/api/quiz_topics/"))
            .send()
            .await?;
        assert!(response.status().is_success());
        let body: Value = response.json().await?;
        assert_eq!(body, json!(["algebra"]));

        let response = client
            .get(format!("{base}/api-proxy/api/nope/"))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn test_profile_shows_account() -> Fallible<()> {
        let base = boot(&[]).await?;
        let client = reqwest::Client::new();
        login(&client, &base).await?;
        let html = client
            .get(format!("{base}/profile"))
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("testuser"));
        assert!(html.contains("user@example.com"));
        assert!(html.contains("Member since 2024/03/01"));
        // The familiarity table renders alongside the account details.
        assert!(html.contains("algebra"));
        assert!(html.contains("50%"));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn test_profile_requires_login() -> Fallible<()> {
        let base = boot(&[]).await?;
        let client = reqwest::Client::new();
        let response = client.get(format!("{base}/profile")).send().await?;
        // The redirect is followed to the login page.
        let html = response.text().await?;
        assert!(html.contains("No account yet?"));
        Ok(())
    }
}
