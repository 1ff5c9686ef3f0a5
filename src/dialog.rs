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

//! Non-blocking replacements for the browser's native alert/confirm/prompt.
//!
//! At most one dialog of each kind is live at a time. Each dialog walks
//! `Closed -> Opening -> Open -> Closing -> Closed`, where the opening and
//! closing legs are animation boundaries crossed via [Dialogs::transition_end].
//! A confirm or prompt carries a stored callback invoked exactly once when the
//! dialog closes, with the cancel value when dismissed. The callback may
//! produce a command of type `C` for the caller to run afterwards.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Alert,
    Confirm,
    Prompt,
}

/// Phase of a live dialog. `Closed` is represented by the absence of the
/// dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Opening,
    Open,
    Closing,
}

/// How a dialog was closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The OK button, with the entered text for prompts.
    Ok(Option<String>),
    Cancel,
}

type Callback<C> = Box<dyn FnOnce(&Outcome) -> Option<C> + Send>;

pub struct Dialog<C> {
    pub phase: Phase,
    /// The message for alerts and confirms, the title for prompts.
    pub message: String,
    callback: Option<Callback<C>>,
}

impl<C> Dialog<C> {
    fn fire(&mut self, outcome: &Outcome) -> Option<C> {
        // The callback slot is emptied on first use, so a dialog resolved
        // twice fires only once.
        self.callback.take().and_then(|cb| cb(outcome))
    }
}

/// The set of live dialogs, one slot per kind.
pub struct Dialogs<C> {
    alert: Option<Dialog<C>>,
    confirm: Option<Dialog<C>>,
    prompt: Option<Dialog<C>>,
}

impl<C> Default for Dialogs<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Dialogs<C> {
    pub fn new() -> Self {
        Self {
            alert: None,
            confirm: None,
            prompt: None,
        }
    }

    fn slot(&mut self, kind: Kind) -> &mut Option<Dialog<C>> {
        match kind {
            Kind::Alert => &mut self.alert,
            Kind::Confirm => &mut self.confirm,
            Kind::Prompt => &mut self.prompt,
        }
    }

    pub fn live(&self, kind: Kind) -> Option<&Dialog<C>> {
        match kind {
            Kind::Alert => self.alert.as_ref(),
            Kind::Confirm => self.confirm.as_ref(),
            Kind::Prompt => self.prompt.as_ref(),
        }
    }

    pub fn any_live(&self) -> bool {
        self.alert.is_some() || self.confirm.is_some() || self.prompt.is_some()
    }

    /// Show an alert with no follow-up.
    pub fn alert(&mut self, message: impl Into<String>) -> Option<C> {
        self.alert_with(message, |_| None)
    }

    /// Show an alert whose callback runs when it is dismissed.
    pub fn alert_with(
        &mut self,
        message: impl Into<String>,
        callback: impl FnOnce(&Outcome) -> Option<C> + Send + 'static,
    ) -> Option<C> {
        self.open(Kind::Alert, message.into(), Box::new(callback))
    }

    /// Show a confirm. The callback receives `true` on OK, `false` on cancel.
    pub fn confirm(
        &mut self,
        message: impl Into<String>,
        callback: impl FnOnce(bool) -> Option<C> + Send + 'static,
    ) -> Option<C> {
        let wrapped: Callback<C> =
            Box::new(move |outcome| callback(matches!(outcome, Outcome::Ok(_))));
        self.open(Kind::Confirm, message.into(), wrapped)
    }

    /// Show a prompt. The callback receives the entered value, or `None` on
    /// cancel.
    pub fn prompt(
        &mut self,
        title: impl Into<String>,
        callback: impl FnOnce(Option<String>) -> Option<C> + Send + 'static,
    ) -> Option<C> {
        let wrapped: Callback<C> = Box::new(move |outcome| match outcome {
            Outcome::Ok(value) => callback(value.clone()),
            Outcome::Cancel => callback(None),
        });
        self.open(Kind::Prompt, title.into(), wrapped)
    }

    /// Place a dialog in its slot. A dialog already live in that slot is
    /// cancelled first; its command, if any, is returned.
    fn open(&mut self, kind: Kind, message: String, callback: Callback<C>) -> Option<C> {
        let displaced = self
            .slot(kind)
            .take()
            .and_then(|mut old| old.fire(&Outcome::Cancel));
        *self.slot(kind) = Some(Dialog {
            phase: Phase::Opening,
            message,
            callback: Some(callback),
        });
        displaced
    }

    /// Close the live dialog of the given kind, firing its callback. The
    /// dialog enters `Closing` and is removed at the next transition end.
    pub fn resolve(&mut self, kind: Kind, outcome: Outcome) -> Option<C> {
        match self.slot(kind).as_mut() {
            Some(dialog) if dialog.phase != Phase::Closing => {
                dialog.phase = Phase::Closing;
                dialog.fire(&outcome)
            }
            _ => None,
        }
    }

    /// An animation finished: opening dialogs become open, closing dialogs
    /// are removed.
    pub fn transition_end(&mut self, kind: Kind) {
        let slot = self.slot(kind);
        match slot.as_mut() {
            Some(dialog) => match dialog.phase {
                Phase::Opening => dialog.phase = Phase::Open,
                Phase::Open => {}
                Phase::Closing => *slot = None,
            },
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;

    #[derive(Debug, PartialEq)]
    enum Cmd {
        Confirmed,
        Entered(String),
    }

    #[test]
    fn test_lifecycle() {
        let mut dialogs: Dialogs<Cmd> = Dialogs::new();
        assert!(!dialogs.any_live());
        dialogs.alert("hello");
        assert_eq!(dialogs.live(Kind::Alert).unwrap().phase, Phase::Opening);
        dialogs.transition_end(Kind::Alert);
        assert_eq!(dialogs.live(Kind::Alert).unwrap().phase, Phase::Open);
        dialogs.resolve(Kind::Alert, Outcome::Ok(None));
        assert_eq!(dialogs.live(Kind::Alert).unwrap().phase, Phase::Closing);
        dialogs.transition_end(Kind::Alert);
        assert!(!dialogs.any_live());
    }

    #[test]
    fn test_confirm_outcomes() {
        let mut dialogs: Dialogs<Cmd> = Dialogs::new();
        dialogs.confirm("sure?", |yes| yes.then_some(Cmd::Confirmed));
        let cmd = dialogs.resolve(Kind::Confirm, Outcome::Ok(None));
        assert_eq!(cmd, Some(Cmd::Confirmed));
        dialogs.transition_end(Kind::Confirm);

        dialogs.confirm("sure?", |yes| yes.then_some(Cmd::Confirmed));
        let cmd = dialogs.resolve(Kind::Confirm, Outcome::Cancel);
        assert_eq!(cmd, None);
    }

    #[test]
    fn test_prompt_value() {
        let mut dialogs: Dialogs<Cmd> = Dialogs::new();
        dialogs.prompt("name?", |value| value.map(Cmd::Entered));
        let cmd = dialogs.resolve(Kind::Prompt, Outcome::Ok(Some("chemistry".to_string())));
        assert_eq!(cmd, Some(Cmd::Entered("chemistry".to_string())));
    }

    #[test]
    fn test_callback_fires_exactly_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut dialogs: Dialogs<Cmd> = Dialogs::new();
        let c = count.clone();
        dialogs.confirm("sure?", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            None
        });
        dialogs.resolve(Kind::Confirm, Outcome::Ok(None));
        // A second resolve before the closing animation finishes is a no-op.
        dialogs.resolve(Kind::Confirm, Outcome::Cancel);
        dialogs.transition_end(Kind::Confirm);
        dialogs.resolve(Kind::Confirm, Outcome::Cancel);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_open_replaces_and_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut dialogs: Dialogs<Cmd> = Dialogs::new();
        let c = count.clone();
        dialogs.prompt("first", move |value| {
            assert!(value.is_none());
            c.fetch_add(1, Ordering::SeqCst);
            None
        });
        // Opening a second prompt cancels the first, exactly once.
        dialogs.prompt("second", |_| None);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(dialogs.live(Kind::Prompt).unwrap().message, "second");
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut dialogs: Dialogs<Cmd> = Dialogs::new();
        dialogs.alert("a");
        dialogs.confirm("b", |_| None);
        assert!(dialogs.live(Kind::Alert).is_some());
        assert!(dialogs.live(Kind::Confirm).is_some());
        dialogs.resolve(Kind::Alert, Outcome::Ok(None));
        dialogs.transition_end(Kind::Alert);
        assert!(dialogs.live(Kind::Alert).is_none());
        assert!(dialogs.live(Kind::Confirm).is_some());
    }
}
