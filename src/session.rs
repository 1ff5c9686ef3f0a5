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

//! Per-session state: credentials and the current play-through. This is the
//! analogue of the browser's local and session storage; everything here lives
//! for one server run.

use crate::backend::auth::Credentials;
use crate::backend::quiz::QuizBundle;
use crate::types::answer::UserAnswer;
use crate::types::letter::Letter;
use crate::types::question::Question;
use crate::types::quiz::Quiz;

/// One quiz being played: the quiz, its questions, and a cursor.
#[derive(Clone, Debug)]
pub struct ActiveQuiz {
    pub quiz: Quiz,
    pub questions: Vec<Question>,
    pub question_count: usize,
    /// 0-based index of the question being shown.
    pub current: usize,
}

impl ActiveQuiz {
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.question_count
    }
}

#[derive(Default)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<i64>,
    pub plus_subscribed: bool,
    pub quiz: Option<ActiveQuiz>,
    pub answers: Vec<UserAnswer>,
    /// Set once the user completes the challenge; the results page requires
    /// it.
    pub completed: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn login(&mut self, credentials: Credentials) {
        self.token = Some(credentials.token);
        self.user_id = credentials.user_id;
        self.plus_subscribed = credentials.plus;
    }

    /// Clear everything, credentials and play-through alike.
    pub fn logout(&mut self) {
        *self = Session::new();
    }

    /// Begin a play-through with a freshly created quiz. Any earlier
    /// play-through is discarded.
    pub fn start_quiz(&mut self, bundle: QuizBundle, question_count: usize) {
        let question_count = question_count.min(bundle.questions.len()).max(1);
        self.quiz = Some(ActiveQuiz {
            quiz: bundle.quiz,
            questions: bundle.questions,
            question_count,
            current: 0,
        });
        self.answers.clear();
        self.completed = false;
    }

    /// Record an answer for the current question and advance. Returns `false`
    /// when there is no current question. Answers are appended, never
    /// overwritten; when a question is re-answered after going back, the
    /// results merge takes the last answer.
    pub fn record_answer(&mut self, selected: Letter) -> bool {
        let Some(active) = self.quiz.as_mut() else {
            return false;
        };
        let Some(question) = active.current_question() else {
            return false;
        };
        self.answers.push(UserAnswer {
            topic_id: question.id,
            selected,
        });
        if !active.is_last() {
            active.current += 1;
        }
        true
    }

    /// Step back to the previous question.
    pub fn rewind(&mut self) {
        if let Some(active) = self.quiz.as_mut() {
            active.current = active.current.saturating_sub(1);
        }
    }

    /// Persist the answers and mark the play-through finished.
    pub fn complete(&mut self) -> bool {
        if self.quiz.is_some() {
            self.completed = true;
        }
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64) -> Question {
        Question {
            id,
            title: format!("q{id}"),
            option_a: "a".to_string(),
            option_b: "b".to_string(),
            option_c: "c".to_string(),
            option_d: "d".to_string(),
            ai_answer: Letter::A,
            explanation_text: None,
        }
    }

    fn bundle(n: i64) -> QuizBundle {
        QuizBundle {
            quiz: Quiz {
                id: 1,
                quiz_topic: "algebra".to_string(),
                difficulty: None,
                question_count: Some(n as u32),
                user: None,
                created_at: None,
            },
            questions: (0..n).map(question).collect(),
        }
    }

    #[test]
    fn test_login_logout() {
        let mut session = Session::new();
        session.login(Credentials {
            token: "t".to_string(),
            user_id: Some(4),
            plus: true,
        });
        assert!(session.logged_in());
        assert!(session.plus_subscribed);
        session.logout();
        assert!(!session.logged_in());
        assert!(!session.plus_subscribed);
    }

    #[test]
    fn test_play_through() {
        let mut session = Session::new();
        session.start_quiz(bundle(2), 2);
        assert_eq!(session.quiz.as_ref().unwrap().current, 0);
        assert!(session.record_answer(Letter::A));
        assert_eq!(session.quiz.as_ref().unwrap().current, 1);
        assert!(session.quiz.as_ref().unwrap().is_last());
        assert!(session.record_answer(Letter::B));
        // The cursor stays on the last question until completion.
        assert_eq!(session.quiz.as_ref().unwrap().current, 1);
        assert!(session.complete());
        assert_eq!(session.answers.len(), 2);
    }

    #[test]
    fn test_rewind_then_reanswer_appends() {
        let mut session = Session::new();
        session.start_quiz(bundle(2), 2);
        session.record_answer(Letter::A);
        session.rewind();
        assert_eq!(session.quiz.as_ref().unwrap().current, 0);
        session.record_answer(Letter::C);
        assert_eq!(session.answers.len(), 2);
        assert_eq!(session.answers[1].selected, Letter::C);
    }

    #[test]
    fn test_no_quiz_no_answers() {
        let mut session = Session::new();
        assert!(!session.record_answer(Letter::A));
        assert!(!session.complete());
    }

    #[test]
    fn test_question_count_clamped_to_fetched_questions() {
        let mut session = Session::new();
        session.start_quiz(bundle(2), 5);
        assert_eq!(session.quiz.as_ref().unwrap().question_count, 2);
    }
}
