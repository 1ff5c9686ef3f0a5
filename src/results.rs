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

use std::collections::HashMap;

use crate::types::answer::UserAnswer;
use crate::types::letter::Letter;
use crate::types::question::Question;

/// Per-question row of the results page.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionResult {
    /// 1-based position in the quiz.
    pub number: usize,
    pub id: i64,
    pub title: String,
    pub options: [String; 4],
    pub ai_answer: Letter,
    pub user_selected: Option<Letter>,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

impl QuestionResult {
    pub fn status(&self) -> &'static str {
        if self.is_correct { "correct" } else { "wrong" }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub correct: usize,
    pub wrong: usize,
    /// Percentage in `0..=100`, rounded half-up.
    pub accuracy: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ViewModel {
    pub questions: Vec<QuestionResult>,
    pub summary: Summary,
}

/// Merge questions with the user's answers into per-question correctness
/// rows and an aggregate summary.
///
/// Malformed input is treated permissively: a question without an answer
/// counts as wrong, answers for unknown topic ids are ignored, and when the
/// same question was answered twice the last answer wins. `question_count`,
/// when given, overrides the total used for the summary.
pub fn build_view_model(
    questions: &[Question],
    answers: &[UserAnswer],
    question_count: Option<usize>,
) -> ViewModel {
    let answer_map: HashMap<i64, Letter> = answers
        .iter()
        .map(|a| (a.topic_id, a.selected))
        .collect();
    let questions: Vec<QuestionResult> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let user_selected = answer_map.get(&q.id).copied();
            let is_correct = user_selected == Some(q.ai_answer);
            QuestionResult {
                number: i + 1,
                id: q.id,
                title: q.title.clone(),
                options: [
                    q.option_a.clone(),
                    q.option_b.clone(),
                    q.option_c.clone(),
                    q.option_d.clone(),
                ],
                ai_answer: q.ai_answer,
                user_selected,
                is_correct,
                explanation: q.explanation_text.clone(),
            }
        })
        .collect();
    let correct = questions.iter().filter(|q| q.is_correct).count();
    let total = question_count.unwrap_or(questions.len());
    let wrong = total.saturating_sub(correct);
    let accuracy = if total == 0 {
        0
    } else {
        ((correct as f64 / total as f64) * 100.0).round() as u32
    };
    ViewModel {
        questions,
        summary: Summary {
            total,
            correct,
            wrong,
            accuracy,
        },
    }
}
