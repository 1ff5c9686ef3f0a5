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

use crate::types::letter::Letter;

/// A generated multiple-choice question. Immutable once fetched.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub title: String,
    #[serde(rename = "option_A")]
    pub option_a: String,
    #[serde(rename = "option_B")]
    pub option_b: String,
    #[serde(rename = "option_C")]
    pub option_c: String,
    #[serde(rename = "option_D")]
    pub option_d: String,
    /// The correct answer, as graded by the backend.
    #[serde(rename = "Ai_answer")]
    pub ai_answer: Letter,
    #[serde(default)]
    pub explanation_text: Option<String>,
}

impl Question {
    pub fn options(&self) -> [(Letter, &str); 4] {
        [
            (Letter::A, self.option_a.as_str()),
            (Letter::B, self.option_b.as_str()),
            (Letter::C, self.option_c.as_str()),
            (Letter::D, self.option_d.as_str()),
        ]
    }
}
