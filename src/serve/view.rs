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

//! Markup shared across pages: the navigation bar and the dialog layer.

use maud::Markup;
use maud::html;

use crate::dialog::Dialogs;
use crate::dialog::Kind;
use crate::dialog::Phase;
use crate::serve::state::Command;
use crate::session::Session;

pub fn nav_bar(session: &Session) -> Markup {
    html! {
        nav.topnav {
            a.brand href="/" { "NoteQ" }
            a href="/start" { "Challenge" }
            a href="/notes" { "Notebook" }
            a href="/profile" { "Profile" }
            div.spacer {}
            @if session.plus_subscribed {
                span.plus-badge { "Plus" }
            }
            @if session.logged_in() {
                span.login-state { "Signed in" }
            } @else {
                a href="/login" { "Log in" }
            }
        }
    }
}

/// Render the live dialogs. Each form posts back to `/dialog` with the kind,
/// the button pressed, and the page to return to.
pub fn dialog_layer(dialogs: &Dialogs<Command>, from: &str) -> Markup {
    if !dialogs.any_live() {
        return html! {};
    }
    html! {
        @if let Some(dialog) = dialogs.live(Kind::Alert) {
            div class=(modal_class("custom-alert-modal", dialog.phase)) {
                div.dialog-content {
                    div.dialog-message { (dialog.message) }
                    form action="/dialog" method="post" {
                        input type="hidden" name="kind" value="alert";
                        input type="hidden" name="from" value=(from);
                        button name="choice" value="ok" { "OK" }
                    }
                }
            }
        }
        @if let Some(dialog) = dialogs.live(Kind::Confirm) {
            div class=(modal_class("custom-confirm-modal", dialog.phase)) {
                div.dialog-content {
                    div.dialog-message { (dialog.message) }
                    form action="/dialog" method="post" {
                        input type="hidden" name="kind" value="confirm";
                        input type="hidden" name="from" value=(from);
                        button.secondary name="choice" value="cancel" { "Cancel" }
                        button name="choice" value="ok" { "OK" }
                    }
                }
            }
        }
        @if let Some(dialog) = dialogs.live(Kind::Prompt) {
            div class=(modal_class("custom-prompt-modal", dialog.phase)) {
                div.dialog-content {
                    div.dialog-title { (dialog.message) }
                    form action="/dialog" method="post" {
                        input type="hidden" name="kind" value="prompt";
                        input type="hidden" name="from" value=(from);
                        input type="text" name="value" placeholder="Type here...";
                        button.secondary name="choice" value="cancel" { "Cancel" }
                        button name="choice" value="ok" { "OK" }
                    }
                }
            }
        }
    }
}

fn modal_class(base: &str, phase: Phase) -> String {
    match phase {
        Phase::Opening | Phase::Open => format!("{base} active"),
        Phase::Closing => base.to_string(),
    }
}
