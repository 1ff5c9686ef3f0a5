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

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::any;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::backend::Backend;
use crate::config::Config;
use crate::error::Fallible;
use crate::notebook::Notebook;
use crate::serve::get as pages;
use crate::serve::post as forms;
use crate::serve::proxy;
use crate::serve::state::MutableState;
use crate::serve::state::ServerState;

pub async fn start_server(config: Config, open_browser: bool) -> Fallible<()> {
    let backend = Arc::new(Backend::new(&config.backend_origin));
    let notebook = Arc::new(Notebook::new(backend.notes.clone()));
    let state = ServerState {
        backend,
        notebook,
        mutable: Arc::new(Mutex::new(MutableState::new())),
    };

    let app = Router::new();
    let app = app.route("/", get(pages::home));
    let app = app.route("/login", get(pages::login_page));
    let app = app.route("/login", post(forms::login));
    let app = app.route("/start", get(pages::start_page));
    let app = app.route("/start", post(forms::start));
    let app = app.route("/play", get(pages::play_page));
    let app = app.route("/play", post(forms::play));
    let app = app.route("/results", get(pages::results_page));
    let app = app.route("/results", post(forms::results));
    let app = app.route("/notes", get(pages::notes_page));
    let app = app.route("/notes", post(forms::notes));
    let app = app.route("/profile", get(pages::profile_page));
    let app = app.route("/profile", post(forms::profile));
    let app = app.route("/dialog", post(forms::dialog));
    let app = app.route("/api-proxy/{*rest}", any(proxy::forward));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("127.0.0.1:{}", config.port);

    // Start a separate task to open the browser.
    if open_browser {
        let url = format!("http://{bind}/");
        let poll = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&poll).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    // Start the server.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
