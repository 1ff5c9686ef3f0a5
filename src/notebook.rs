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

//! The notebook: notes grouped by subject. Server-side CRUD through
//! [NotesApi], mirrored into an in-memory [LocalStore] that serves as an
//! optimistic cache and as a fallback when there is no token or the backend
//! is unreachable. Failures are terminal per call; there is no retry or
//! offline queue.

use std::sync::Mutex;

use crate::backend::Outcome;
use crate::backend::notes::NotesApi;
use crate::types::note::Note;
use crate::types::note::NotePatch;

/// In-memory mirror of the notebook.
#[derive(Debug, Default)]
pub struct LocalStore {
    notes: Vec<Note>,
    subjects: Vec<String>,
    next_id: i64,
}

impl LocalStore {
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            subjects: Vec::new(),
            next_id: 1,
        }
    }

    /// Overwrite the mirror with a fresh server listing.
    pub fn replace(&mut self, notes: Vec<Note>, subjects: Vec<String>) {
        self.next_id = notes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        self.notes = notes;
        self.subjects = subjects;
        // Subjects referenced by notes but missing from the listing are kept
        // visible.
        let extra: Vec<String> = self
            .notes
            .iter()
            .map(|n| n.subject.clone())
            .filter(|s| !s.is_empty() && !self.subjects.contains(s))
            .collect();
        for subject in extra {
            if !self.subjects.contains(&subject) {
                self.subjects.push(subject);
            }
        }
    }

    pub fn notes(&self) -> Vec<Note> {
        self.notes.clone()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.subjects.clone()
    }

    pub fn notes_by_subject(&self, subject: &str) -> Vec<Note> {
        self.notes
            .iter()
            .filter(|note| note.subject == subject)
            .cloned()
            .collect()
    }

    pub fn note(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Add a note. A note is a duplicate when an existing note in the same
    /// subject already contains the first line of its content.
    pub fn add_note(&mut self, mut note: Note) -> Outcome {
        let first_line = note.content.lines().next().unwrap_or("").to_string();
        let duplicate = self
            .notes
            .iter()
            .any(|n| n.subject == note.subject && n.content.contains(&first_line));
        if duplicate {
            return Outcome::err("This content is already in your notebook.");
        }
        if note.id == 0 {
            note.id = self.next_id;
        }
        // Local notes never pass through the backend, so the timestamp is
        // assigned here.
        if note.created_at.is_none() {
            note.created_at = Some(chrono::Utc::now().to_rfc3339());
        }
        self.next_id = self.next_id.max(note.id) + 1;
        self.register_subject(&note.subject);
        self.notes.push(note);
        Outcome::ok("Note added.")
    }

    pub fn update_note(&mut self, id: i64, patch: &NotePatch) -> Outcome {
        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                if let Some(title) = &patch.title {
                    note.title = title.clone();
                }
                if let Some(content) = &patch.content {
                    note.content = content.clone();
                }
                if let Some(subject) = &patch.subject {
                    note.subject = subject.clone();
                }
                Outcome::ok("Note updated.")
            }
            None => Outcome::err("No such note to edit."),
        }
    }

    pub fn delete_note(&mut self, id: i64) -> Outcome {
        self.notes.retain(|note| note.id != id);
        Outcome::ok("Note deleted.")
    }

    pub fn move_note(&mut self, id: i64, new_subject: &str) -> Outcome {
        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                note.subject = new_subject.to_string();
                let message = format!("Note moved to {new_subject}.");
                self.register_subject(new_subject);
                Outcome::ok(message)
            }
            None => Outcome::err("No such note to move."),
        }
    }

    pub fn add_subject(&mut self, name: &str) -> Outcome {
        if self.subjects.iter().any(|s| s == name) {
            return Outcome::err("This subject already exists.");
        }
        self.subjects.push(name.to_string());
        Outcome::ok(format!("Subject \"{name}\" added."))
    }

    /// Drop the subject and every note filed under it.
    pub fn delete_subject(&mut self, name: &str) -> Outcome {
        self.notes.retain(|note| note.subject != name);
        self.subjects.retain(|subject| subject != name);
        Outcome::ok(format!("Subject \"{name}\" deleted."))
    }

    fn register_subject(&mut self, name: &str) {
        if !name.is_empty() && !self.subjects.iter().any(|s| s == name) {
            self.subjects.push(name.to_string());
        }
    }
}

/// The notebook service used by the page handlers.
pub struct Notebook {
    api: NotesApi,
    store: Mutex<LocalStore>,
}

impl Notebook {
    pub fn new(api: NotesApi) -> Self {
        Self {
            api,
            store: Mutex::new(LocalStore::new()),
        }
    }

    /// Re-fetch notes and subjects and overwrite the mirror. A failure
    /// leaves the mirror as it was.
    pub async fn refresh(&self, token: Option<&str>) {
        let Some(token) = token else {
            return;
        };
        let notes = self.api.fetch_notes(token).await;
        let subjects = self.api.fetch_subjects(token).await;
        match (notes, subjects) {
            (Ok(notes), Ok(subjects)) => {
                self.store.lock().unwrap().replace(notes, subjects);
            }
            (Err(e), _) | (_, Err(e)) => {
                log::error!("failed to refresh notebook: {e}");
            }
        }
    }

    pub async fn notes(&self, token: Option<&str>) -> Vec<Note> {
        if let Some(token) = token {
            match self.api.fetch_notes(token).await {
                Ok(notes) => return notes,
                Err(e) => log::error!("failed to fetch notes: {e}"),
            }
        }
        self.store.lock().unwrap().notes()
    }

    pub async fn subjects(&self, token: Option<&str>) -> Vec<String> {
        if let Some(token) = token {
            match self.api.fetch_subjects(token).await {
                Ok(subjects) => return subjects,
                Err(e) => log::error!("failed to fetch subjects: {e}"),
            }
        }
        self.store.lock().unwrap().subjects()
    }

    pub async fn add_note(&self, token: Option<&str>, note: Note) -> Outcome {
        match token {
            Some(token) => match self.api.create_note(token, &note).await {
                Ok(outcome) => {
                    if outcome.success {
                        self.refresh(Some(token)).await;
                    }
                    outcome
                }
                Err(e) => {
                    log::error!("failed to add note via API: {e}");
                    self.store.lock().unwrap().add_note(note)
                }
            },
            None => self.store.lock().unwrap().add_note(note),
        }
    }

    pub async fn update_note(&self, token: Option<&str>, id: i64, patch: NotePatch) -> Outcome {
        match token {
            Some(token) => match self.api.update_note(token, id, &patch).await {
                Ok(outcome) => {
                    if outcome.success {
                        self.refresh(Some(token)).await;
                    }
                    outcome
                }
                Err(e) => {
                    log::error!("failed to update note via API: {e}");
                    self.store.lock().unwrap().update_note(id, &patch)
                }
            },
            None => self.store.lock().unwrap().update_note(id, &patch),
        }
    }

    pub async fn delete_note(&self, token: Option<&str>, id: i64) -> Outcome {
        match token {
            Some(token) => match self.api.delete_note(token, id).await {
                Ok(outcome) => {
                    if outcome.success {
                        self.refresh(Some(token)).await;
                    }
                    outcome
                }
                Err(e) => {
                    log::error!("failed to delete note via API: {e}");
                    self.store.lock().unwrap().delete_note(id)
                }
            },
            None => self.store.lock().unwrap().delete_note(id),
        }
    }

    pub async fn move_note(&self, token: Option<&str>, id: i64, new_subject: &str) -> Outcome {
        match token {
            Some(token) => match self.api.move_note(token, id, new_subject).await {
                Ok(outcome) => {
                    if outcome.success {
                        self.refresh(Some(token)).await;
                    }
                    outcome
                }
                Err(e) => {
                    log::error!("failed to move note via API: {e}");
                    self.store.lock().unwrap().move_note(id, new_subject)
                }
            },
            None => self.store.lock().unwrap().move_note(id, new_subject),
        }
    }

    pub async fn add_subject(&self, token: Option<&str>, name: &str) -> Outcome {
        match token {
            Some(token) => match self.api.create_subject(token, name).await {
                Ok(outcome) => {
                    if outcome.success {
                        self.refresh(Some(token)).await;
                    }
                    outcome
                }
                Err(e) => {
                    log::error!("failed to add subject via API: {e}");
                    self.store.lock().unwrap().add_subject(name)
                }
            },
            None => self.store.lock().unwrap().add_subject(name),
        }
    }

    pub async fn delete_subject(&self, token: Option<&str>, name: &str) -> Outcome {
        match token {
            Some(token) => match self.api.delete_subject(token, name).await {
                Ok(outcome) => {
                    if outcome.success {
                        self.refresh(Some(token)).await;
                    }
                    outcome
                }
                Err(e) => {
                    log::error!("failed to delete subject via API: {e}");
                    self.store.lock().unwrap().delete_subject(name)
                }
            },
            None => self.store.lock().unwrap().delete_subject(name),
        }
    }
}
