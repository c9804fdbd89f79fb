// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `login`, `register`, `logout`, and `onboard` commands.

use std::io::BufRead;

use clap::Args;
use colored::Colorize;
use schediora_core::types::{KNOWN_GOALS, KNOWN_TOPICS};
use schediora_core::{FocusTopics, OnboardingDraft, SchedioraError};
use secrecy::SecretString;

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct CredentialArgs {
    #[arg(long)]
    pub email: String,

    /// Read the password from the first line of stdin instead of prompting.
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Args, Debug)]
pub struct OnboardArgs {
    /// Study goal, e.g. "Semester Exam", "UTBK", "Certification".
    #[arg(long, default_value = KNOWN_GOALS[0])]
    pub goal: String,

    /// Study hours per day (1-8).
    #[arg(long, default_value_t = 2)]
    pub hours: u8,

    /// Focus topic; repeat for up to three.
    #[arg(long = "topic")]
    pub topics: Vec<String>,
}

impl OnboardArgs {
    pub fn to_draft(&self) -> OnboardingDraft {
        let topics = if self.topics.is_empty() {
            OnboardingDraft::default().focus_topics
        } else {
            FocusTopics::from_topics(self.topics.iter().cloned())
        };
        OnboardingDraft::new(self.goal.clone(), self.hours, topics)
    }
}

fn read_password(args: &CredentialArgs) -> Result<SecretString, SchedioraError> {
    let raw = if args.password_stdin {
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| SchedioraError::Internal(format!("failed to read password: {e}")))?;
        line.trim_end_matches(['\r', '\n']).to_string()
    } else {
        rpassword::prompt_password("Password: ")
            .map_err(|e| SchedioraError::Internal(format!("failed to read password: {e}")))?
    };
    if raw.is_empty() {
        return Err(SchedioraError::Validation("Password must not be empty.".to_string()));
    }
    Ok(SecretString::from(raw))
}

pub async fn run_login(
    ctx: &AppContext,
    args: &CredentialArgs,
    register: bool,
) -> Result<(), SchedioraError> {
    let password = read_password(args)?;
    if register {
        ctx.session.register(&args.email, &password).await;
    } else {
        ctx.session.login(&args.email, &password).await;
    }

    let session = ctx.session.snapshot();
    match session.auth_error {
        Some(message) => Err(SchedioraError::Validation(message)),
        None => {
            println!("{} signed in as {}", "✓".green(), session.user_name.bold());
            Ok(())
        }
    }
}

pub async fn run_logout(ctx: &AppContext) -> Result<(), SchedioraError> {
    ctx.session.sign_out().await;
    println!("{} signed out", "✓".green());
    Ok(())
}

pub async fn run_onboard(ctx: &AppContext, args: &OnboardArgs) -> Result<(), SchedioraError> {
    for topic in &args.topics {
        if !KNOWN_TOPICS.contains(&topic.as_str()) {
            println!("{} custom topic {topic:?}", "note:".yellow());
        }
    }

    let draft = args.to_draft();
    ctx.session
        .complete_onboarding(draft.clone())
        .await
        .map_err(|e| SchedioraError::Internal(format!("onboarding write task failed: {e}")))?;

    println!("{} onboarding saved", "✓".green());
    println!("  Goal:   {}", draft.goal);
    println!("  Hours:  {} per day", draft.daily_hours);
    println!("  Topics: {}", draft.focus_topics.as_slice().join(", "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onboard_args_clamp_and_truncate() {
        let args = OnboardArgs {
            goal: "UTBK".into(),
            hours: 12,
            topics: vec!["Math".into(), "Physics".into(), "English".into(), "Biology".into()],
        };
        let draft = args.to_draft();
        assert_eq!(draft.daily_hours, 8);
        assert_eq!(draft.focus_topics.len(), 3);
        assert!(!draft.focus_topics.contains("Biology"));
    }

    #[test]
    fn onboard_args_default_topics() {
        let args = OnboardArgs {
            goal: "Semester Exam".into(),
            hours: 0,
            topics: vec![],
        };
        let draft = args.to_draft();
        assert_eq!(draft.daily_hours, 1);
        assert_eq!(draft.primary_topic(), "Math");
    }
}
