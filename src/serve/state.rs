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

use crate::backend::Backend;
use crate::dialog::Dialogs;
use crate::notebook::Notebook;
use crate::session::Session;

/// Follow-up work a dialog callback can schedule, executed once the dialog
/// is resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Logout,
    AddSubject(String),
    DeleteNote(i64),
    DeleteSubject(String),
}

#[derive(Clone)]
pub struct ServerState {
    pub backend: Arc<Backend>,
    pub notebook: Arc<Notebook>,
    pub mutable: Arc<Mutex<MutableState>>,
}

pub struct MutableState {
    pub session: Session,
    pub dialogs: Dialogs<Command>,
}

impl MutableState {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            dialogs: Dialogs::new(),
        }
    }
}
