//! Interactive prompts behind a trait, so that resolution and sync can be
//! driven by a script in tests.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use color_print::cformat;

use crate::styling::{PROMPT_SYMBOL, hint_message};

/// The blocking questions the core may ask.
pub trait Prompt {
    /// Pick one of `options`. `None` means the user backed out.
    fn choose(&mut self, header: &str, options: &[String]) -> anyhow::Result<Option<usize>>;

    /// `[y/N]` question; anything but yes declines.
    fn confirm(&mut self, question: &str) -> anyhow::Result<bool>;

    /// Free-text answer. `None` on end of input.
    fn input(&mut self, question: &str) -> anyhow::Result<Option<String>>;
}

/// Line-based prompt over any reader/writer pair.
///
/// The binary wires it to stdin and stderr so that stdout stays free for the
/// resolved path.
pub struct TerminalPrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// `None` on end of input.
    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            // End the prompt line so later output starts cleanly
            writeln!(self.writer)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl TerminalPrompt<std::io::StdinLock<'static>, anstream::Stderr> {
    /// Stdin and stderr; styling is stripped when stderr is not a terminal.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), anstream::stderr())
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn choose(&mut self, header: &str, options: &[String]) -> anyhow::Result<Option<usize>> {
        writeln!(self.writer, "{header}")?;
        let width = options.len().to_string().len();
        for (i, option) in options.iter().enumerate() {
            let number = format!("{:>width$}", i + 1);
            writeln!(self.writer, "{}", cformat!("  <bold>{number}</>) {option}"))?;
        }
        let count = options.len();

        loop {
            write!(
                self.writer,
                "{}",
                cformat!("{PROMPT_SYMBOL} Select <bold>[1-{count}]</>, q to cancel: ")
            )?;
            self.writer.flush()?;

            let Some(answer) = self.read_line()? else {
                return Ok(None);
            };
            if answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(
                    self.writer,
                    "{}",
                    hint_message(format!("Enter a number between 1 and {}", options.len()))
                )?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        write!(
            self.writer,
            "{}",
            cformat!("{PROMPT_SYMBOL} {question} <bold>[y/N]</> ")
        )?;
        self.writer.flush()?;

        let answer = self.read_line()?.unwrap_or_default().to_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }

    fn input(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        write!(self.writer, "{}", cformat!("{PROMPT_SYMBOL} {question} "))?;
        self.writer.flush()?;
        self.read_line()
    }
}

/// A pre-recorded answer for [`ScriptedPrompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Choose(Option<usize>),
    Confirm(bool),
    Input(Option<String>),
}

/// Replays answers in order and records how often it was asked.
///
/// Asking a question with no matching answer left is an error, which makes an
/// unexpected prompt fail the test instead of hanging it.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<Answer>,
    asked: usize,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: 0,
        }
    }

    /// A prompt that must never be consulted.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Number of questions asked so far.
    pub fn asked(&self) -> usize {
        self.asked
    }

    fn next(&mut self, question: &str) -> anyhow::Result<Answer> {
        self.asked += 1;
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("Unexpected prompt: {question}"))
    }
}

impl Prompt for ScriptedPrompt {
    fn choose(&mut self, header: &str, options: &[String]) -> anyhow::Result<Option<usize>> {
        match self.next(header)? {
            Answer::Choose(Some(i)) if i >= options.len() => {
                anyhow::bail!("Scripted choice {i} out of range for {} options", options.len())
            }
            Answer::Choose(choice) => Ok(choice),
            other => anyhow::bail!("Expected a choice for {header:?}, script has {other:?}"),
        }
    }

    fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        match self.next(question)? {
            Answer::Confirm(yes) => Ok(yes),
            other => anyhow::bail!("Expected a confirmation for {question:?}, script has {other:?}"),
        }
    }

    fn input(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        match self.next(question)? {
            Answer::Input(text) => Ok(text),
            other => anyhow::bail!("Expected input for {question:?}, script has {other:?}"),
        }
    }
}
