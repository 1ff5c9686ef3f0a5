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

//! Form handlers. Every POST ends in a redirect; feedback reaches the user
//! through the dialog layer rendered by the next GET.

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::backend::ApiResponse;
use crate::backend::auth::validate_password_change;
use crate::dialog;
use crate::dialog::Kind;
use crate::results::build_view_model;
use crate::serve::get::notes_path;
use crate::serve::state::Command;
use crate::serve::state::ServerState;
use crate::text::clean_text_content;
use crate::types::difficulty::Difficulty;
use crate::types::letter::Letter;
use crate::types::note::Note;
use crate::types::note::NotePatch;

fn alert(state: &ServerState, message: impl Into<String>) {
    state.mutable.lock().unwrap().dialogs.alert(message);
}

const PLUS_REQUIRED: &str = "The notebook is a Plus feature. Upgrade on the profile page to use it.";

#[derive(Deserialize)]
pub enum LoginAction {
    Login,
    Register,
    Forgot,
}

#[derive(Deserialize)]
pub struct LoginForm {
    action: LoginAction,
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn login(State(state): State<ServerState>, Form(form): Form<LoginForm>) -> Redirect {
    match form.action {
        LoginAction::Login => {
            if form.email.is_empty() || form.password.is_empty() {
                alert(&state, "Enter your email and password.");
                return Redirect::to("/login");
            }
            match state.backend.auth.login(&form.email, &form.password).await {
                Ok(ApiResponse::Accepted(credentials)) => {
                    let token = credentials.token.clone();
                    state.mutable.lock().unwrap().session.login(credentials);
                    state.notebook.refresh(Some(&token)).await;
                    Redirect::to("/")
                }
                Ok(ApiResponse::Rejected(message)) => {
                    alert(&state, message);
                    Redirect::to("/login")
                }
                Err(e) => {
                    log::error!("login failed: {e}");
                    alert(&state, "Could not reach the backend.");
                    Redirect::to("/login")
                }
            }
        }
        LoginAction::Register => {
            if form.username.is_empty() || form.email.is_empty() || form.password.is_empty() {
                alert(&state, "Enter a username, email, and password.");
                return Redirect::to("/login");
            }
            match state
                .backend
                .auth
                .register(&form.username, &form.email, &form.password)
                .await
            {
                Ok(outcome) => alert(&state, outcome.message),
                Err(e) => {
                    log::error!("registration failed: {e}");
                    alert(&state, "Could not reach the backend.");
                }
            }
            Redirect::to("/login")
        }
        LoginAction::Forgot => {
            if form.email.is_empty() {
                alert(&state, "Enter your email first.");
                return Redirect::to("/login");
            }
            match state.backend.auth.forgot_password(&form.email).await {
                Ok(outcome) => alert(&state, outcome.message),
                Err(e) => {
                    log::error!("password reset failed: {e}");
                    alert(&state, "Could not reach the backend.");
                }
            }
            Redirect::to("/login")
        }
    }
}

#[derive(Deserialize)]
pub struct StartForm {
    #[serde(default)]
    topic: String,
    difficulty: Option<String>,
    #[serde(default)]
    question_count: String,
}

pub async fn start(State(state): State<ServerState>, Form(form): Form<StartForm>) -> Redirect {
    // Checks run in the order the user fills the form.
    let difficulty = match form.difficulty.as_deref() {
        Some(id) => match id.parse::<Difficulty>() {
            Ok(difficulty) => difficulty,
            Err(_) => {
                alert(&state, "Choose a difficulty level first.");
                return Redirect::to("/start");
            }
        },
        None => {
            alert(&state, "Choose a difficulty level first.");
            return Redirect::to("/start");
        }
    };
    let topic = form.topic.trim().to_string();
    if topic.is_empty() {
        alert(&state, "Enter a topic.");
        return Redirect::to("/start");
    }
    let question_count = match form.question_count.trim().parse::<u32>() {
        Ok(n) if (1..=3).contains(&n) => n,
        _ => {
            alert(&state, "The question count must be between 1 and 3.");
            return Redirect::to("/start");
        }
    };
    let (token, user_id) = {
        let mutable = state.mutable.lock().unwrap();
        (mutable.session.token.clone(), mutable.session.user_id)
    };
    let Some(token) = token else {
        alert(&state, "Log in to start a challenge.");
        return Redirect::to("/login");
    };
    match state
        .backend
        .quiz
        .create_quiz(&token, user_id, &topic, difficulty, question_count)
        .await
    {
        Ok(ApiResponse::Accepted(bundle)) => {
            log::debug!(
                "quiz {} created for user {:?} ({} questions, created_at {:?})",
                bundle.quiz.id,
                bundle.quiz.user,
                bundle.questions.len(),
                bundle.quiz.created_at,
            );
            state
                .mutable
                .lock()
                .unwrap()
                .session
                .start_quiz(bundle, question_count as usize);
            Redirect::to("/play")
        }
        Ok(ApiResponse::Rejected(message)) => {
            alert(&state, message);
            Redirect::to("/start")
        }
        Err(e) => {
            log::error!("quiz creation failed: {e}");
            alert(&state, "Could not reach the backend.");
            Redirect::to("/start")
        }
    }
}

#[derive(Deserialize)]
pub enum PlayAction {
    A,
    B,
    C,
    D,
    Back,
    Complete,
}

#[derive(Deserialize)]
pub struct PlayForm {
    action: PlayAction,
}

pub async fn play(State(state): State<ServerState>, Form(form): Form<PlayForm>) -> Redirect {
    let selected = match form.action {
        PlayAction::A => Some(Letter::A),
        PlayAction::B => Some(Letter::B),
        PlayAction::C => Some(Letter::C),
        PlayAction::D => Some(Letter::D),
        PlayAction::Back => {
            state.mutable.lock().unwrap().session.rewind();
            return Redirect::to("/play");
        }
        PlayAction::Complete => None,
    };
    if let Some(selected) = selected {
        state.mutable.lock().unwrap().session.record_answer(selected);
        return Redirect::to("/play");
    }
    let submission = {
        let mut mutable = state.mutable.lock().unwrap();
        if !mutable.session.complete() {
            return Redirect::to("/");
        }
        mutable
            .session
            .token
            .clone()
            .map(|token| (token, mutable.session.answers.clone()))
    };
    // The grade submission runs in the background; the results page does not
    // depend on it.
    if let Some((token, answers)) = submission {
        let backend = state.backend.clone();
        tokio::task::spawn(async move {
            match backend.quiz.submit_answers(&token, &answers).await {
                Ok(receipt) => log::info!("answers submitted: {}", receipt.describe()),
                Err(e) => log::error!("answer submission failed: {e}"),
            }
        });
    }
    Redirect::to("/results")
}

#[derive(Deserialize)]
pub enum ResultsAction {
    Favorite,
    Analysis,
}

#[derive(Deserialize)]
pub struct ResultsForm {
    action: ResultsAction,
    number: Option<usize>,
    subject: Option<String>,
}

pub async fn results(State(state): State<ServerState>, Form(form): Form<ResultsForm>) -> Redirect {
    match form.action {
        ResultsAction::Analysis => {
            alert(
                &state,
                "Explanations are a Plus feature. Upgrade on the profile page to see them.",
            );
            Redirect::to("/results")
        }
        ResultsAction::Favorite => {
            let (plus, token, vm) = {
                let mutable = state.mutable.lock().unwrap();
                let Some(active) = mutable.session.quiz.as_ref() else {
                    return Redirect::to("/");
                };
                (
                    mutable.session.plus_subscribed,
                    mutable.session.token.clone(),
                    build_view_model(
                        &active.questions,
                        &mutable.session.answers,
                        Some(active.question_count),
                    ),
                )
            };
            if !plus {
                alert(&state, PLUS_REQUIRED);
                return Redirect::to("/results");
            }
            let Some(question) = form
                .number
                .and_then(|n| vm.questions.into_iter().find(|q| q.number == n))
            else {
                alert(&state, "No such question to favorite.");
                return Redirect::to("/results");
            };
            let subject = form.subject.unwrap_or_default();
            if subject.is_empty() {
                alert(&state, "Pick a subject for the note.");
                return Redirect::to("/results");
            }
            let answer_index = question.ai_answer as usize;
            let mut content = format!(
                "Question: {}\n\nCorrect answer: {}. {}",
                question.title,
                question.ai_answer.as_str(),
                question.options[answer_index],
            );
            if let Some(explanation) = &question.explanation {
                content.push_str(&format!("\n\nExplanation: {explanation}"));
            }
            let note = Note::new(0, &question.title, &clean_text_content(&content), &subject);
            let outcome = state.notebook.add_note(token.as_deref(), note).await;
            alert(&state, outcome.message);
            Redirect::to("/results")
        }
    }
}

#[derive(Deserialize)]
pub enum NotesAction {
    AddNote,
    SaveNote,
    MoveNote,
    DeleteNote,
    AddSubject,
    DeleteSubject,
}

#[derive(Deserialize)]
pub struct NotesForm {
    action: NotesAction,
    #[serde(default)]
    subject: String,
    id: Option<i64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    target: String,
}

pub async fn notes(State(state): State<ServerState>, Form(form): Form<NotesForm>) -> Redirect {
    let (plus, token) = {
        let mutable = state.mutable.lock().unwrap();
        (
            mutable.session.plus_subscribed,
            mutable.session.token.clone(),
        )
    };
    let back = notes_path(&form.subject);
    if !plus {
        alert(&state, PLUS_REQUIRED);
        return Redirect::to(&back);
    }
    match form.action {
        NotesAction::AddNote => {
            let title = form.title.trim().to_string();
            let content = clean_text_content(&form.content);
            if title.is_empty() || content.is_empty() {
                alert(&state, "Enter a title and some content.");
                return Redirect::to(&back);
            }
            let note = Note::new(0, &title, &content, &form.subject);
            let outcome = state.notebook.add_note(token.as_deref(), note).await;
            alert(&state, outcome.message);
            Redirect::to(&back)
        }
        NotesAction::SaveNote => {
            let Some(id) = form.id else {
                return Redirect::to(&back);
            };
            let patch = NotePatch {
                title: Some(form.title.trim().to_string()),
                content: Some(clean_text_content(&form.content)),
                subject: None,
            };
            let outcome = state.notebook.update_note(token.as_deref(), id, patch).await;
            alert(&state, outcome.message);
            Redirect::to(&back)
        }
        NotesAction::MoveNote => {
            let Some(id) = form.id else {
                return Redirect::to(&back);
            };
            if form.target.is_empty() {
                alert(&state, "Pick a subject to move the note to.");
                return Redirect::to(&back);
            }
            let outcome = state
                .notebook
                .move_note(token.as_deref(), id, &form.target)
                .await;
            alert(&state, outcome.message);
            Redirect::to(&back)
        }
        NotesAction::DeleteNote => {
            let Some(id) = form.id else {
                return Redirect::to(&back);
            };
            state
                .mutable
                .lock()
                .unwrap()
                .dialogs
                .confirm("Delete this note?", move |yes| {
                    yes.then_some(Command::DeleteNote(id))
                });
            Redirect::to(&back)
        }
        NotesAction::AddSubject => {
            state
                .mutable
                .lock()
                .unwrap()
                .dialogs
                .prompt("Name the new subject", |value| {
                    value
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                        .map(Command::AddSubject)
                });
            Redirect::to(&back)
        }
        NotesAction::DeleteSubject => {
            if form.subject.is_empty() {
                return Redirect::to(&back);
            }
            let name = form.subject.clone();
            state.mutable.lock().unwrap().dialogs.confirm(
                format!("Delete \"{name}\" and every note under it?"),
                move |yes| yes.then_some(Command::DeleteSubject(name)),
            );
            Redirect::to(&back)
        }
    }
}

#[derive(Deserialize)]
pub enum ProfileAction {
    ChangePassword,
    Logout,
}

#[derive(Deserialize)]
pub struct ProfileForm {
    action: ProfileAction,
    #[serde(default)]
    old_password: String,
    #[serde(default)]
    new_password: String,
}

pub async fn profile(State(state): State<ServerState>, Form(form): Form<ProfileForm>) -> Redirect {
    match form.action {
        ProfileAction::ChangePassword => {
            let token = state.mutable.lock().unwrap().session.token.clone();
            let Some(token) = token else {
                return Redirect::to("/login");
            };
            if let Err(message) = validate_password_change(&form.old_password, &form.new_password)
            {
                alert(&state, message);
                return Redirect::to("/profile");
            }
            match state
                .backend
                .auth
                .change_password(&token, &form.old_password, &form.new_password)
                .await
            {
                Ok(outcome) => alert(&state, outcome.message),
                Err(e) => {
                    log::error!("password change failed: {e}");
                    alert(&state, "Could not reach the backend.");
                }
            }
            Redirect::to("/profile")
        }
        ProfileAction::Logout => {
            state
                .mutable
                .lock()
                .unwrap()
                .dialogs
                .confirm("Log out?", |yes| yes.then_some(Command::Logout));
            Redirect::to("/profile")
        }
    }
}

#[derive(Deserialize)]
pub struct DialogForm {
    kind: String,
    choice: String,
    value: Option<String>,
    #[serde(default)]
    from: String,
}

/// Resolve a live dialog: fire its callback and run whatever command the
/// callback produced, then return to the page the dialog was shown on.
pub async fn dialog(State(state): State<ServerState>, Form(form): Form<DialogForm>) -> Redirect {
    let kind = match form.kind.as_str() {
        "alert" => Kind::Alert,
        "confirm" => Kind::Confirm,
        "prompt" => Kind::Prompt,
        _ => return Redirect::to("/"),
    };
    let outcome = if form.choice == "ok" {
        dialog::Outcome::Ok(form.value)
    } else {
        dialog::Outcome::Cancel
    };
    // There is no client-side animation, so the closing transition ends
    // immediately.
    let (command, token) = {
        let mut mutable = state.mutable.lock().unwrap();
        let command = mutable.dialogs.resolve(kind, outcome);
        mutable.dialogs.transition_end(kind);
        (command, mutable.session.token.clone())
    };
    if let Some(command) = command {
        run_command(&state, token.as_deref(), command).await;
    }
    if form.from.starts_with('/') {
        Redirect::to(&form.from)
    } else {
        Redirect::to("/")
    }
}

async fn run_command(state: &ServerState, token: Option<&str>, command: Command) {
    match command {
        Command::Logout => {
            state.mutable.lock().unwrap().session.logout();
        }
        Command::AddSubject(name) => {
            let outcome = state.notebook.add_subject(token, &name).await;
            alert(state, outcome.message);
        }
        Command::DeleteNote(id) => {
            let outcome = state.notebook.delete_note(token, id).await;
            alert(state, outcome.message);
        }
        Command::DeleteSubject(name) => {
            let outcome = state.notebook.delete_subject(token, &name).await;
            alert(state, outcome.message);
        }
    }
}
