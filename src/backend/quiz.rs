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
use crate::backend::items;
use crate::backend::rejection_message;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::answer::UserAnswer;
use crate::types::difficulty::Difficulty;
use crate::types::familiarity::AnswerReceipt;
use crate::types::familiarity::TopicFamiliarity;
use crate::types::question::Question;
use crate::types::quiz::Quiz;

/// A freshly created quiz: metadata plus its questions.
#[derive(Clone, Debug)]
pub struct QuizBundle {
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

#[derive(Clone)]
pub struct QuizApi {
    http: reqwest::Client,
    origin: String,
}

impl QuizApi {
    pub fn new(http: reqwest::Client, origin: String) -> Self {
        Self { http, origin }
    }

    /// Ask the backend to generate a quiz. The response carries the quiz
    /// metadata under `quiz` and the questions under `topics`.
    pub async fn create_quiz(
        &self,
        token: &str,
        user_id: Option<i64>,
        topic: &str,
        difficulty: Difficulty,
        question_count: u32,
    ) -> Fallible<ApiResponse<QuizBundle>> {
        let url = format!("{}/api/quiz/", self.origin);
        let body = json!({
            "user_id": user_id,
            "topic": topic,
            "difficulty": difficulty.id(),
            "question_count": question_count,
        });
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Ok(ApiResponse::Rejected(rejection_message(status, &body)));
        }
        let value: Value = serde_json::from_str(&body)?;
        let quiz: Quiz = match value.get("quiz") {
            Some(quiz) => serde_json::from_value(quiz.clone())?,
            None => return fail("quiz response carried no quiz."),
        };
        let questions: Vec<Question> = match value.get("topics") {
            Some(topics) => serde_json::from_value(topics.clone())?,
            None => Vec::new(),
        };
        Ok(ApiResponse::Accepted(QuizBundle { quiz, questions }))
    }

    /// Submit the answers of a finished quiz and read back the updated
    /// familiarity. Absent fields default rather than erroring.
    pub async fn submit_answers(
        &self,
        token: &str,
        updates: &[UserAnswer],
    ) -> Fallible<AnswerReceipt> {
        let url = format!("{}/api/submit_answer/", self.origin);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "updates": updates }))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return fail(&rejection_message(status, &body));
        }
        let value: Value = serde_json::from_str(&body)?;
        Ok(receipt_from_value(&value))
    }

    /// Fetch the per-topic familiarity list.
    pub async fn familiarity(&self, token: &str) -> Fallible<Vec<TopicFamiliarity>> {
        let url = format!("{}/api/familiarity/", self.origin);
        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return fail(&rejection_message(status, &body));
        }
        let value: Value = serde_json::from_str(&body)?;
        Ok(familiarity_from_value(&value))
    }
}

fn receipt_from_value(value: &Value) -> AnswerReceipt {
    AnswerReceipt {
        familiarity: value
            .get("familiarity")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        quiz_topic_id: value.get("quiz_topic_id").and_then(Value::as_i64),
        difficulty_level: value
            .get("difficulty_level")
            .and_then(Value::as_str)
            .map(str::to_string),
        difficulty_cap: value
            .get("difficulty_cap")
            .and_then(Value::as_str)
            .map(str::to_string),
        already_reached_cap: value
            .get("already_reached_cap")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        updated: value.get("updated").and_then(Value::as_bool).unwrap_or(false),
    }
}

/// Normalize the familiarity list. Items come either flat
/// (`{name, familiarity, quiz_id}`) or nested
/// (`{quiz_topic: {id, quiz_topic}, familiarity}`); missing familiarity
/// defaults to zero, an unnamed topic gets a placeholder.
pub fn familiarity_from_value(value: &Value) -> Vec<TopicFamiliarity> {
    let Some(list) = items(value, &["data", "results"]) else {
        return Vec::new();
    };
    list.iter()
        .map(|item| {
            let nested = item.get("quiz_topic");
            let name = item
                .get("name")
                .and_then(Value::as_str)
                .or_else(|| nested.and_then(|t| t.get("quiz_topic")).and_then(Value::as_str))
                .or_else(|| nested.and_then(Value::as_str))
                .unwrap_or("Unnamed topic")
                .to_string();
            let familiarity = item
                .get("familiarity")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            let quiz_id = item
                .get("quiz_id")
                .and_then(Value::as_i64)
                .or_else(|| nested.and_then(|t| t.get("id")).and_then(Value::as_i64));
            TopicFamiliarity {
                name,
                familiarity,
                quiz_id,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_familiarity_nested_shape() {
        let value = json!([
            {"quiz_topic": {"id": 5, "quiz_topic": "algebra"}, "familiarity": 0.4},
            {"quiz_topic": {"id": 6, "quiz_topic": "history"}}
        ]);
        let list = familiarity_from_value(&value);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "algebra");
        assert_eq!(list[0].familiarity, 0.4);
        assert_eq!(list[0].quiz_id, Some(5));
        assert_eq!(list[1].familiarity, 0.0);
    }

    #[test]
    fn test_familiarity_flat_shape() {
        let value = json!({"results": [{"name": "physics", "familiarity": 1.0, "quiz_id": 9}]});
        let list = familiarity_from_value(&value);
        assert_eq!(
            list,
            vec![TopicFamiliarity {
                name: "physics".to_string(),
                familiarity: 1.0,
                quiz_id: Some(9),
            }]
        );
    }

    #[test]
    fn test_familiarity_unnamed_topic() {
        let value = json!([{ "familiarity": 0.1 }]);
        let list = familiarity_from_value(&value);
        assert_eq!(list[0].name, "Unnamed topic");
    }

    #[test]
    fn test_familiarity_non_array() {
        assert!(familiarity_from_value(&json!({"count": 3})).is_empty());
    }

    #[test]
    fn test_receipt_defaults() {
        let receipt = receipt_from_value(&json!({}));
        assert_eq!(receipt, AnswerReceipt::default());
        let receipt = receipt_from_value(&json!({
            "familiarity": 0.7,
            "quiz_topic_id": 3,
            "updated": true
        }));
        assert_eq!(receipt.familiarity, 0.7);
        assert_eq!(receipt.quiz_topic_id, Some(3));
        assert!(receipt.updated);
        assert!(!receipt.already_reached_cap);
    }
}
