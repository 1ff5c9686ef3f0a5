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

use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::Redirect;
use maud::Markup;
use maud::PreEscaped;
use maud::html;
use serde::Deserialize;

use crate::backend::auth::UserProfile;
use crate::results::build_view_model;
use crate::serve::state::ServerState;
use crate::serve::template::page_template;
use crate::serve::view::dialog_layer;
use crate::serve::view::nav_bar;
use crate::text::markdown_to_html;
use crate::types::difficulty::Difficulty;
use crate::types::familiarity::TopicFamiliarity;
use crate::types::letter::Letter;
use crate::types::note::Note;

fn render(state: &ServerState, from: &str, body: Markup) -> (StatusCode, Html<String>) {
    let mutable = state.mutable.lock().unwrap();
    let page = page_template(html! {
        (nav_bar(&mutable.session))
        main { (body) }
        (dialog_layer(&mutable.dialogs, from))
    });
    (StatusCode::OK, Html(page.into_string()))
}

pub async fn home(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let logged_in = state.mutable.lock().unwrap().session.logged_in();
    let body = html! {
        div.home {
            h1 { "NoteQ" }
            p.tagline { "Pick a topic, answer AI-generated questions, keep the ones worth remembering." }
            div.home-actions {
                a.button href="/start" { "Start a challenge" }
                a.button href="/notes" { "Open the notebook" }
                @if !logged_in {
                    a.button.secondary href="/login" { "Log in" }
                }
            }
        }
    };
    render(&state, "/", body)
}

pub async fn login_page(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let body = html! {
        div.login {
            h1 { "Log in" }
            form.card action="/login" method="post" {
                input type="email" name="email" placeholder="Email";
                input type="password" name="password" placeholder="Password";
                button name="action" value="Login" { "Log in" }
                button.secondary name="action" value="Forgot" { "Forgot password" }
            }
            h2 { "No account yet?" }
            form.card action="/login" method="post" {
                input type="text" name="username" placeholder="Username";
                input type="email" name="email" placeholder="Email";
                input type="password" name="password" placeholder="Password";
                button name="action" value="Register" { "Register" }
            }
        }
    };
    render(&state, "/login", body)
}

pub async fn start_page(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let body = html! {
        div.start {
            h1 { "Difficulty" }
            form.card action="/start" method="post" {
                input type="text" name="topic" placeholder="Enter a topic";
                div.difficulty-hub {
                    @for option in Difficulty::ALL {
                        label.difficulty-button {
                            input type="radio" name="difficulty" value=(option.id());
                            span { (option.label()) }
                        }
                    }
                }
                input type="number" name="question_count" placeholder="Question count" min="1" max="50";
                button { "Start the challenge" }
            }
        }
    };
    render(&state, "/start", body)
}

pub async fn play_page(
    State(state): State<ServerState>,
) -> Result<(StatusCode, Html<String>), Redirect> {
    let body = {
        let mutable = state.mutable.lock().unwrap();
        // No quiz data means the user never started a challenge.
        let Some(active) = mutable.session.quiz.as_ref() else {
            return Err(Redirect::to("/"));
        };
        let Some(question) = active.current_question() else {
            return Err(Redirect::to("/"));
        };
        let number = active.current + 1;
        let total = active.question_count;
        let percent = (number as f64 / total as f64) * 100.0;
        let complete_ready = active.is_last();
        html! {
            div.play {
                h2.question-number { "Question " (number) " / " (total) }
                div.progress-bar {
                    div.progress-fill style=(format!("width: {percent:.0}%")) {}
                }
                p.question-text { (question.title) }
                form action="/play" method="post" {
                    div.answer-grid {
                        @for (letter, text) in question.options() {
                            button.answer-option name="action" value=(letter.as_str()) {
                                span.option-letter { (letter.as_str()) }
                                " " (text)
                            }
                        }
                    }
                    div.play-controls {
                        @if number > 1 {
                            button.secondary name="action" value="Back" { "Previous question" }
                        }
                        @if complete_ready {
                            button.complete name="action" value="Complete" { "Complete the challenge" }
                        }
                    }
                }
            }
        }
    };
    Ok(render(&state, "/play", body))
}

pub async fn results_page(
    State(state): State<ServerState>,
) -> Result<(StatusCode, Html<String>), Redirect> {
    let (quiz, questions, answers, question_count, plus, token) = {
        let mutable = state.mutable.lock().unwrap();
        let Some(active) = mutable.session.quiz.as_ref() else {
            return Err(Redirect::to("/"));
        };
        if !mutable.session.completed {
            return Err(Redirect::to("/"));
        }
        (
            active.quiz.clone(),
            active.questions.clone(),
            mutable.session.answers.clone(),
            active.question_count,
            mutable.session.plus_subscribed,
            mutable.session.token.clone(),
        )
    };
    let subjects = state.notebook.subjects(token.as_deref()).await;
    let vm = build_view_model(&questions, &answers, Some(question_count));
    let summary = vm.summary;
    let body = html! {
        div.results {
            div.results-card {
                h1 { "Results: " (quiz.quiz_topic) }
                p.quiz-meta {
                    @if let Some(difficulty) = &quiz.difficulty { (difficulty) }
                    @if let Some(count) = quiz.question_count { " · " (count) " questions" }
                }
                div.stats {
                    div.stat { span.value { (summary.total) } span.label { "Total" } }
                    div.stat { span.value { (summary.correct) } span.label { "Correct" } }
                    div.stat { span.value { (summary.wrong) } span.label { "Wrong" } }
                    div.stat { span.value.accuracy { (summary.accuracy) "%" } span.label { "Accuracy" } }
                }
            }
            div.questions-grid {
                @for q in &vm.questions {
                    div class=(format!("question-card {}", q.status())) {
                        div.question-header {
                            span.number { "#" (q.number) }
                            span.status { (q.status()) }
                        }
                        p.title { (q.title) }
                        ul.options {
                            @for (letter, text) in Letter::ALL.iter().zip(q.options.iter()) {
                                li class=(option_class(*letter, q.ai_answer, q.user_selected)) {
                                    (letter.as_str()) " " (text)
                                }
                            }
                        }
                        @if plus {
                            @if let Some(explanation) = &q.explanation {
                                div.analysis { (PreEscaped(markdown_to_html(explanation))) }
                            }
                            form.favorite action="/results" method="post" {
                                input type="hidden" name="action" value="Favorite";
                                input type="hidden" name="number" value=(q.number);
                                select name="subject" {
                                    option value=(quiz.quiz_topic) { (quiz.quiz_topic) }
                                    @for subject in &subjects {
                                        @if *subject != quiz.quiz_topic {
                                            option value=(subject) { (subject) }
                                        }
                                    }
                                }
                                button { "Favorite" }
                            }
                        } @else {
                            form action="/results" method="post" {
                                input type="hidden" name="action" value="Analysis";
                                button.secondary { "Analysis (Plus)" }
                            }
                        }
                    }
                }
            }
            div.results-actions {
                a.button href="/start" { "Play again" }
                a.button.secondary href="/notes" { "Open the notebook" }
            }
        }
    };
    Ok(render(&state, "/results", body))
}

fn option_class(letter: Letter, correct: Letter, selected: Option<Letter>) -> &'static str {
    if letter == correct {
        "option correct"
    } else if selected == Some(letter) {
        "option selected-wrong"
    } else {
        "option"
    }
}

#[derive(Deserialize)]
pub struct NotesQuery {
    subject: Option<String>,
    edit: Option<i64>,
}

pub async fn notes_page(
    State(state): State<ServerState>,
    Query(query): Query<NotesQuery>,
) -> (StatusCode, Html<String>) {
    let token = state.mutable.lock().unwrap().session.token.clone();
    let notes = state.notebook.notes(token.as_deref()).await;
    let subjects = state.notebook.subjects(token.as_deref()).await;
    // Fall back to the first subject when the requested one is gone.
    let current = query
        .subject
        .filter(|s| subjects.contains(s))
        .or_else(|| subjects.first().cloned())
        .unwrap_or_default();
    let shown: Vec<&Note> = notes.iter().filter(|n| n.subject == current).collect();
    let from = notes_path(&current);
    let body = html! {
        div.notes {
            div.notes-toolbar {
                h1 { "Notebook" }
                div.subject-picker {
                    @for subject in &subjects {
                        a class=(if *subject == current { "subject-tab selected" } else { "subject-tab" })
                            href=(notes_path(subject)) { (subject) }
                    }
                }
                form.inline action="/notes" method="post" {
                    input type="hidden" name="subject" value=(current);
                    button name="action" value="AddSubject" { "New subject" }
                    @if !current.is_empty() {
                        button.danger name="action" value="DeleteSubject" { "Delete subject" }
                    }
                }
            }
            @if subjects.is_empty() {
                p.empty { "No subjects yet. Add one to start collecting notes." }
            } @else {
                form.card action="/notes" method="post" {
                    input type="hidden" name="action" value="AddNote";
                    input type="hidden" name="subject" value=(current);
                    input type="text" name="title" placeholder="Note title";
                    textarea name="content" placeholder="Note content (markdown)" {}
                    button { "Add note" }
                }
                @if shown.is_empty() {
                    p.empty { "No notes under this subject yet." }
                }
                div.note-list {
                    @for note in &shown {
                        div.note-card {
                            @if query.edit == Some(note.id) {
                                form action="/notes" method="post" {
                                    input type="hidden" name="action" value="SaveNote";
                                    input type="hidden" name="id" value=(note.id);
                                    input type="hidden" name="subject" value=(current);
                                    input type="text" name="title" value=(note.title);
                                    textarea name="content" { (note.content) }
                                    button { "Save" }
                                    a.button.secondary href=(from) { "Cancel" }
                                }
                            } @else {
                                h3 { (note.title) }
                                @if let Some(stamp) = note.updated_at.as_ref().or(note.created_at.as_ref()) {
                                    p.note-meta { (stamp) }
                                }
                                div.note-content { (PreEscaped(markdown_to_html(&note.content))) }
                                div.note-actions {
                                    a.button.secondary href=(format!("{from}&edit={}", note.id)) { "Edit" }
                                    form.inline action="/notes" method="post" {
                                        input type="hidden" name="id" value=(note.id);
                                        input type="hidden" name="subject" value=(current);
                                        select name="target" {
                                            @for subject in &subjects {
                                                @if *subject != current {
                                                    option value=(subject) { (subject) }
                                                }
                                            }
                                        }
                                        button name="action" value="MoveNote" { "Move" }
                                        button.danger name="action" value="DeleteNote" { "Delete" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };
    render(&state, &from, body)
}

pub(crate) fn notes_path(subject: &str) -> String {
    use percent_encoding::NON_ALPHANUMERIC;
    use percent_encoding::utf8_percent_encode;
    format!(
        "/notes?subject={}",
        utf8_percent_encode(subject, NON_ALPHANUMERIC)
    )
}

pub async fn profile_page(
    State(state): State<ServerState>,
) -> Result<(StatusCode, Html<String>), Redirect> {
    let (token, user_id, plus) = {
        let mutable = state.mutable.lock().unwrap();
        // The profile page is meaningless without a login.
        let Some(token) = mutable.session.token.clone() else {
            return Err(Redirect::to("/login"));
        };
        (token, mutable.session.user_id, mutable.session.plus_subscribed)
    };
    let profile = match user_id {
        Some(id) => match state.backend.auth.profile(&token, id).await {
            Ok(profile) => profile,
            Err(e) => {
                log::error!("failed to fetch profile: {e}");
                UserProfile::default()
            }
        },
        None => UserProfile::default(),
    };
    let familiarity: Vec<TopicFamiliarity> = match state.backend.quiz.familiarity(&token).await {
        Ok(list) => list,
        Err(e) => {
            log::error!("failed to fetch familiarity: {e}");
            Vec::new()
        }
    };
    let body = html! {
        div.profile {
            h1 { "Profile" }
            p.user-line {
                @if let Some(name) = &profile.username { (name) " · " }
                @if profile.username.is_none() {
                    @if let Some(id) = user_id { "User #" (id) " · " }
                }
                @if plus { "Plus subscription" } @else { "Free tier" }
            }
            @if let Some(email) = &profile.email {
                p.user-line { (email) }
            }
            @if let Some(date) = profile.member_since() {
                p.user-line { "Member since " (date) }
            }
            @if !plus {
                a.button href="/api-proxy/api/ecpay/checkout/" { "Upgrade to Plus" }
            }
            h2 { "Topic familiarity" }
            @if familiarity.is_empty() {
                p.empty { "No familiarity data yet. Play a challenge first." }
            } @else {
                table.familiarity {
                    @for topic in &familiarity {
                        tr {
                            td { (topic.name) }
                            td.score { (format!("{:.0}%", topic.familiarity * 100.0)) }
                            td.quiz-id {
                                @if let Some(id) = topic.quiz_id { "quiz #" (id) }
                            }
                        }
                    }
                }
            }
            h2 { "Change password" }
            form.card action="/profile" method="post" {
                input type="password" name="old_password" placeholder="Old password";
                input type="password" name="new_password" placeholder="New password";
                button name="action" value="ChangePassword" { "Change password" }
            }
            form action="/profile" method="post" {
                button.danger name="action" value="Logout" { "Log out" }
            }
        }
    };
    Ok(render(&state, "/profile", body))
}
