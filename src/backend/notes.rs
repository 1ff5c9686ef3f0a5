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

//! Raw HTTP calls for the notes and subject endpoints, with response-shape
//! normalization. Older backend revisions name a note's subject `subject`,
//! newer ones `quiz_topic` (as a string or as a nested entity); lists arrive
//! bare or under a wrapper key. All variants are accepted.

use serde_json::Value;
use serde_json::json;

use crate::backend::Outcome;
use crate::backend::items;
use crate::backend::rejection_message;
use crate::error::Fallible;
use crate::types::note::Note;
use crate::types::note::NotePatch;

#[derive(Clone)]
pub struct NotesApi {
    http: reqwest::Client,
    origin: String,
}

impl NotesApi {
    pub fn new(http: reqwest::Client, origin: String) -> Self {
        Self { http, origin }
    }

    pub async fn fetch_notes(&self, token: &str) -> Fallible<Vec<Note>> {
        let url = format!("{}/api/notes/", self.origin);
        let value = self.get_json(&url, token).await?;
        Ok(notes_from_value(&value))
    }

    pub async fn fetch_subjects(&self, token: &str) -> Fallible<Vec<String>> {
        let url = format!("{}/api/quiz_topics/", self.origin);
        let value = self.get_json(&url, token).await?;
        Ok(subjects_from_value(&value))
    }

    pub async fn create_note(&self, token: &str, note: &Note) -> Fallible<Outcome> {
        let url = format!("{}/api/notes/", self.origin);
        let body = json!({
            "title": note.title,
            "content": note.content,
            "subject": note.subject,
        });
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        self.mutation_outcome(response, "Note added.").await
    }

    pub async fn update_note(&self, token: &str, id: i64, patch: &NotePatch) -> Fallible<Outcome> {
        let url = format!("{}/api/notes/{id}/", self.origin);
        let response = self
            .http
            .patch(&url)
            .bearer_auth(token)
            .json(patch)
            .send()
            .await?;
        self.mutation_outcome(response, "Note updated.").await
    }

    pub async fn delete_note(&self, token: &str, id: i64) -> Fallible<Outcome> {
        let url = format!("{}/api/notes/{id}/", self.origin);
        let response = self.http.delete(&url).bearer_auth(token).send().await?;
        self.mutation_outcome(response, "Note deleted.").await
    }

    pub async fn move_note(&self, token: &str, id: i64, new_subject: &str) -> Fallible<Outcome> {
        let url = format!("{}/api/notes/{id}/move/", self.origin);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "subject": new_subject }))
            .send()
            .await?;
        self.mutation_outcome(response, format!("Note moved to {new_subject}."))
            .await
    }

    pub async fn create_subject(&self, token: &str, name: &str) -> Fallible<Outcome> {
        let url = format!("{}/api/quiz_topics/", self.origin);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "quiz_topic": name }))
            .send()
            .await?;
        self.mutation_outcome(response, format!("Subject \"{name}\" added."))
            .await
    }

    /// Soft-deletes the subject backend-side; its notes go with it.
    pub async fn delete_subject(&self, token: &str, name: &str) -> Fallible<Outcome> {
        let url = format!("{}/api/quiz_topics/soft_delete/", self.origin);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "quiz_topic": name }))
            .send()
            .await?;
        self.mutation_outcome(response, format!("Subject \"{name}\" deleted."))
            .await
    }

    async fn get_json(&self, url: &str, token: &str) -> Fallible<Value> {
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return crate::error::fail(&rejection_message(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn mutation_outcome(
        &self,
        response: reqwest::Response,
        success_message: impl Into<String>,
    ) -> Fallible<Outcome> {
        let status = response.status();
        if status.is_success() {
            Ok(Outcome::ok(success_message))
        } else {
            let body = response.text().await?;
            Ok(Outcome::err(rejection_message(status, &body)))
        }
    }
}

/// Normalize a notes listing.
pub fn notes_from_value(value: &Value) -> Vec<Note> {
    let Some(list) = items(value, &["notes", "data", "results"]) else {
        return Vec::new();
    };
    list.iter().filter_map(note_from_value).collect()
}

/// Normalize a subjects listing.
pub fn subjects_from_value(value: &Value) -> Vec<String> {
    let Some(list) = items(value, &["subjects", "topics", "data", "results"]) else {
        return Vec::new();
    };
    list.iter().filter_map(subject_from_value).collect()
}

fn note_from_value(value: &Value) -> Option<Note> {
    let id = value.get("id").and_then(Value::as_i64)?;
    let title = value.get("title").and_then(Value::as_str)?.to_string();
    let content = value
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let subject = value
        .get("subject")
        .or_else(|| value.get("quiz_topic"))
        .and_then(subject_from_value)
        .unwrap_or_default();
    Some(Note {
        id,
        title,
        content,
        subject,
        created_at: value
            .get("created_at")
            .and_then(Value::as_str)
            .map(str::to_string),
        updated_at: value
            .get("updated_at")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn subject_from_value(value: &Value) -> Option<String> {
    if let Some(name) = value.as_str() {
        return Some(name.to_string());
    }
    for key in ["quiz_topic", "subject", "name"] {
        if let Some(name) = value.get(key).and_then(Value::as_str) {
            return Some(name.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_notes_bare_array() {
        let value = json!([
            {"id": 1, "title": "t", "content": "c", "subject": "math"}
        ]);
        let notes = notes_from_value(&value);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].subject, "math");
    }

    #[test]
    fn test_notes_wrapped_with_nested_topic() {
        let value = json!({"notes": [
            {"id": 2, "title": "t", "content": "c", "quiz_topic": {"id": 9, "quiz_topic": "physics"}}
        ]});
        let notes = notes_from_value(&value);
        assert_eq!(notes[0].subject, "physics");
    }

    #[test]
    fn test_notes_topic_as_string() {
        let value = json!({"data": [
            {"id": 3, "title": "t", "content": "c", "quiz_topic": "history"}
        ]});
        let notes = notes_from_value(&value);
        assert_eq!(notes[0].subject, "history");
    }

    #[test]
    fn test_notes_skip_malformed_items() {
        let value = json!([
            {"title": "no id", "content": "c", "subject": "s"},
            {"id": 4, "title": "good", "content": "c", "subject": "s"}
        ]);
        let notes = notes_from_value(&value);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, 4);
    }

    #[test]
    fn test_subjects_variants() {
        assert_eq!(
            subjects_from_value(&json!(["math", "physics"])),
            vec!["math", "physics"]
        );
        assert_eq!(
            subjects_from_value(&json!({"topics": [{"id": 1, "quiz_topic": "math"}]})),
            vec!["math"]
        );
        assert_eq!(
            subjects_from_value(&json!({"results": [{"name": "art"}]})),
            vec!["art"]
        );
        assert!(subjects_from_value(&json!({"count": 2})).is_empty());
    }
}
