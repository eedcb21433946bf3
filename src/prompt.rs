//! Interactive prompting primitives.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, anyhow};

/// One selectable entry: `name` is returned, `message` is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub name: String,
    pub message: String,
}

pub trait Prompter {
    /// Pick one of `choices`; `None` when the user picks nothing.
    fn select(&mut self, message: &str, choices: &[Choice]) -> Result<Option<String>>;

    fn confirm(&mut self, message: &str) -> Result<bool>;

    /// Free-text answer; an empty answer yields `initial`.
    fn input(&mut self, message: &str, initial: &str) -> Result<String>;
}

/// Line-based prompts: questions on stderr, answers from stdin.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read answer")?;
        if read == 0 {
            return Err(anyhow!("Prompt cancelled: no more input"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn select(&mut self, message: &str, choices: &[Choice]) -> Result<Option<String>> {
        writeln!(self.output, "{}", message)?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(self.output, "  {:>2}) {}", i + 1, choice.message)?;
        }

        let answer = self.ask("Number or SPDX id (empty to cancel): ")?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(None);
        }

        if let Ok(index) = answer.parse::<usize>()
            && (1..=choices.len()).contains(&index)
        {
            return Ok(Some(choices[index - 1].name.clone()));
        }

        Ok(choices
            .iter()
            .find(|choice| choice.name.eq_ignore_ascii_case(answer))
            .map(|choice| choice.name.clone()))
    }

    fn confirm(&mut self, message: &str) -> Result<bool> {
        let answer = self.ask(&format!("{} (y/N) ", message))?;
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }

    fn input(&mut self, message: &str, initial: &str) -> Result<String> {
        let question = if initial.is_empty() {
            format!("{}: ", message)
        } else {
            format!("{} ({}): ", message, initial)
        };
        let answer = self.ask(&question)?;
        if answer.trim().is_empty() {
            Ok(initial.to_string())
        } else {
            Ok(answer)
        }
    }
}

/// Prompter answering from a queue, for tests and scripted runs.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    selections: VecDeque<Option<String>>,
    confirmations: VecDeque<bool>,
    inputs: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_select(mut self, name: Option<&str>) -> Self {
        self.selections.push_back(name.map(str::to_string));
        self
    }

    pub fn answer_confirm(mut self, yes: bool) -> Self {
        self.confirmations.push_back(yes);
        self
    }

    pub fn answer_input(mut self, value: &str) -> Self {
        self.inputs.push_back(value.to_string());
        self
    }

    /// Every question asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, message: &str, _choices: &[Choice]) -> Result<Option<String>> {
        self.asked.push(message.to_string());
        self.selections
            .pop_front()
            .ok_or_else(|| anyhow!("Unexpected prompt: {}", message))
    }

    fn confirm(&mut self, message: &str) -> Result<bool> {
        self.asked.push(message.to_string());
        self.confirmations
            .pop_front()
            .ok_or_else(|| anyhow!("Unexpected prompt: {}", message))
    }

    fn input(&mut self, message: &str, initial: &str) -> Result<String> {
        if initial.is_empty() {
            self.asked.push(message.to_string());
        } else {
            self.asked.push(format!("{} [{}]", message, initial));
        }
        let answer = self
            .inputs
            .pop_front()
            .ok_or_else(|| anyhow!("Unexpected prompt: {}", message))?;
        if answer.trim().is_empty() {
            Ok(initial.to_string())
        } else {
            Ok(answer)
        }
    }
}
