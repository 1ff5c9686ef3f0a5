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

use serde::Deserialize;
use serde::Serialize;

/// The server-derived proficiency score for one quiz topic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopicFamiliarity {
    pub name: String,
    pub familiarity: f64,
    pub quiz_id: Option<i64>,
}

/// What the backend reports after a batch of answers is submitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnswerReceipt {
    pub familiarity: f64,
    pub quiz_topic_id: Option<i64>,
    pub difficulty_level: Option<String>,
    pub difficulty_cap: Option<String>,
    pub already_reached_cap: bool,
    pub updated: bool,
}

impl AnswerReceipt {
    /// One-line description for the log.
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("familiarity {:.2}", self.familiarity)];
        if let Some(id) = self.quiz_topic_id {
            parts.push(format!("topic #{id}"));
        }
        if let Some(level) = &self.difficulty_level {
            parts.push(format!("level {level}"));
        }
        if let Some(cap) = &self.difficulty_cap {
            if self.already_reached_cap {
                parts.push(format!("at cap {cap}"));
            } else {
                parts.push(format!("cap {cap}"));
            }
        }
        if !self.updated {
            parts.push("not updated".to_string());
        }
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let receipt = AnswerReceipt {
            familiarity: 0.5,
            quiz_topic_id: Some(3),
            difficulty_level: Some("beginner".to_string()),
            difficulty_cap: Some("advanced".to_string()),
            already_reached_cap: false,
            updated: true,
        };
        assert_eq!(
            receipt.describe(),
            "familiarity 0.50, topic #3, level beginner, cap advanced"
        );
        assert_eq!(AnswerReceipt::default().describe(), "familiarity 0.00, not updated");
    }
}
