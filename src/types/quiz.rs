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

/// Metadata for one quiz, as created by the backend. Every field except the
/// id is optional on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub quiz_topic: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub question_count: Option<u32>,
    #[serde(default)]
    pub user: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_wire_shape() {
        let quiz: Quiz = serde_json::from_str(r#"{"id": 3, "quiz_topic": "algebra"}"#).unwrap();
        assert_eq!(quiz.id, 3);
        assert_eq!(quiz.quiz_topic, "algebra");
        assert!(quiz.question_count.is_none());
    }
}
