// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Rule-based command classification
//!
//! Matches natural-language input against an ordered list of regex rules.
//! The first matching rule wins; input no rule recognizes classifies as
//! [`Command::Fallback`], which the chat engine hands to the language model.

use regex::Regex;

/// A classified user command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a task with the captured title
    Add { title: String },
    /// List all tasks
    List,
    /// Rename the task matching `target` to `new_title`
    Update { target: String, new_title: String },
    /// Delete the task matching `target`
    Delete { target: String },
    /// Flip the completion state of the task matching `target`
    Toggle { target: String },
    /// A greeting, answered without touching the store
    Greet,
    /// A request for the command list
    Help,
    /// A recognized verb with a malformed argument; answer with usage text
    Usage(UsageHint),
    /// Unrecognized input, deferred to the language model
    Fallback,
}

/// Which usage message to show when a verb matched but its argument did not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageHint {
    Add,
    Update,
    Delete,
    Toggle,
}

impl UsageHint {
    /// The usage text returned to the user
    pub fn message(self) -> &'static str {
        match self {
            UsageHint::Add => {
                "Please specify a task to add. Format: 'add task <task description>'"
            }
            UsageHint::Update => {
                "Please specify the task to update and the new description. \
                 Format: 'update task <old description> to <new description>'"
            }
            UsageHint::Delete => {
                "Please specify a task to delete. Format: 'delete task <task description>'"
            }
            UsageHint::Toggle => {
                "Please specify a task to complete. Format: 'complete task <task description>'"
            }
        }
    }
}

/// Ordered rule-based classifier
///
/// All patterns are compiled once at construction. Input is lowercased and
/// trimmed before matching, so rules are written in lowercase.
pub struct Classifier {
    add_trigger: Regex,
    add_capture: Regex,
    update_trigger: Regex,
    update_capture: Regex,
    delete_trigger: Regex,
    delete_capture: Regex,
    toggle_trigger: Regex,
    toggle_capture: Regex,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        // Static patterns; a failure here is a programming error
        Self {
            add_trigger: Regex::new(r"(?:add|create|new|make)\s+(?:a\s+)?(?:task|todo)").unwrap(),
            add_capture: Regex::new(r"(?:add|create|new|make)\s+(?:a\s+)?(?:task|todo)\s+(.+)")
                .unwrap(),
            update_trigger: Regex::new(r"(?:update|change|modify|edit|rename)\s+task").unwrap(),
            update_capture: Regex::new(
                r"(?:update|change|modify|edit|rename)\s+task\s+(.+?)\s+to\s+(.+)",
            )
            .unwrap(),
            delete_trigger: Regex::new(r"(?:delete|remove)\s+task").unwrap(),
            delete_capture: Regex::new(r"(?:delete|remove)\s+task\s+(.+)").unwrap(),
            toggle_trigger: Regex::new(r"(?:complete|finish|toggle)\s+task|mark\s+task").unwrap(),
            toggle_capture: Regex::new(
                r"(?:complete|finish|toggle|mark)\s+task\s+(.+?)(?:\s+as\s+(?:done|completed))?$",
            )
            .unwrap(),
        }
    }

    /// Classify one line of user input
    pub fn classify(&self, input: &str) -> Command {
        let text = input.trim().to_lowercase();

        if self.add_trigger.is_match(&text) {
            return match self.add_capture.captures(&text) {
                Some(caps) => Command::Add {
                    title: caps[1].trim().to_string(),
                },
                None => Command::Usage(UsageHint::Add),
            };
        }

        if self.update_trigger.is_match(&text) {
            return match self.update_capture.captures(&text) {
                Some(caps) => Command::Update {
                    target: caps[1].trim().to_string(),
                    new_title: caps[2].trim().to_string(),
                },
                None => Command::Usage(UsageHint::Update),
            };
        }

        if self.delete_trigger.is_match(&text) {
            return match self.delete_capture.captures(&text) {
                Some(caps) => Command::Delete {
                    target: caps[1].trim().to_string(),
                },
                None => Command::Usage(UsageHint::Delete),
            };
        }

        if self.toggle_trigger.is_match(&text) {
            return match self.toggle_capture.captures(&text) {
                Some(caps) => Command::Toggle {
                    target: caps[1].trim().to_string(),
                },
                None => Command::Usage(UsageHint::Toggle),
            };
        }

        if ["list tasks", "show tasks", "my tasks", "all tasks", "view tasks"]
            .iter()
            .any(|phrase| text.contains(phrase))
        {
            return Command::List;
        }

        if text.is_empty() || ["hello", "hi", "hey", "start"].contains(&text.as_str()) {
            return Command::Greet;
        }

        if text.contains("help") || text.contains("commands") {
            return Command::Help;
        }

        Command::Fallback
    }
}
