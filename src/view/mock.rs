//! Recording doubles for the view's collaborators.
//!
//! ```rust
//! use product_catalog::view::mock::{RecordingNotifier, ScriptedConfirmer};
//! use product_catalog::view::{Confirmation, Notification, Notifier};
//!
//! let notifier = RecordingNotifier::new();
//! notifier.notify(Notification::error("ID already exists"));
//! assert_eq!(notifier.details(), vec!["ID already exists"]);
//!
//! let confirmer = ScriptedConfirmer::new([Confirmation::Rejected]);
//! assert_eq!(confirmer.remaining(), 1);
//! ```

use crate::view::collaborators::{
    ConfirmPrompt, Confirmation, Confirmer, Notification, Notifier, Severity,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Keeps every notification it receives.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn details(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.detail).collect()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Answers prompts from a script, then rejects once the script runs out.
#[derive(Clone, Default)]
pub struct ScriptedConfirmer {
    answers: Arc<Mutex<VecDeque<Confirmation>>>,
    prompts: Arc<Mutex<Vec<ConfirmPrompt>>>,
}

impl ScriptedConfirmer {
    pub fn new(answers: impl IntoIterator<Item = Confirmation>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            prompts: Arc::default(),
        }
    }

    pub fn push(&self, answer: Confirmation) {
        self.answers.lock().unwrap().push_back(answer);
    }

    pub fn prompts(&self) -> Vec<ConfirmPrompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, prompt: ConfirmPrompt) -> Confirmation {
        self.prompts.lock().unwrap().push(prompt);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Confirmation::Rejected)
    }
}
