//! User confirmation and alert capability.
//!
//! Destructive actions ask for confirmation and storage-quota failures raise
//! an alert. Both go through [`Prompt`] so the decision logic can run without
//! a terminal attached.

use std::io::{BufRead, Write};

use parking_lot::Mutex;

/// Confirmation and alert channel to the user.
pub trait Prompt: Send + Sync {
    /// Ask a yes/no question. `true` means proceed.
    fn confirm(&self, message: &str) -> bool;

    /// Show a warning the user should act on.
    fn alert(&self, message: &str);
}

/// Prompts on stderr and reads answers from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    /// With `assume_yes`, every confirmation is answered yes without asking.
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            tracing::debug!("Auto-confirmed: {}", message);
            return true;
        }

        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{} [y/N] ", message);
        let _ = stderr.flush();

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }

    fn alert(&self, message: &str) {
        tracing::warn!("{}", message);
        eprintln!("⚠ {}", message);
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}

/// Answers every confirmation the same way and records what was asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answer: bool,
    confirmations: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            ..Default::default()
        }
    }

    /// Confirmation questions asked so far.
    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().clone()
    }

    /// Alerts raised so far.
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.confirmations.lock().push(message.to_string());
        self.answer
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }
}
