//! Interactive practice loop.
//!
//! Items are numbered from 1 at the prompt and mapped to 0-based session
//! indices here.

use crate::config::app_dir;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use std::path::PathBuf;
use switchlang_domain::traits::{HistoryStore, LlmProvider};
use switchlang_domain::DifficultyTier;
use switchlang_tutor::{PracticeSession, Tutor};
use tracing::debug;

/// Everything the practice loop works on.
pub struct PracticeContext<L, H>
where
    L: LlmProvider,
    H: HistoryStore,
{
    tutor: Tutor<L>,
    history: H,
    session: PracticeSession,
    tier: DifficultyTier,
    count: usize,
    last_unresolved: Vec<usize>,
}

impl<L, H> PracticeContext<L, H>
where
    L: LlmProvider,
    L::Error: Display,
    H: HistoryStore,
    H::Error: Display,
{
    /// Create a context around an initial session.
    pub fn new(
        tutor: Tutor<L>,
        history: H,
        session: PracticeSession,
        tier: DifficultyTier,
        count: usize,
    ) -> Self {
        Self {
            tutor,
            history,
            session,
            tier,
            count,
            last_unresolved: Vec::new(),
        }
    }

    /// The current session.
    pub fn session(&self) -> &PracticeSession {
        &self.session
    }

    /// The history store.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// The tutor.
    pub fn tutor(&self) -> &Tutor<L> {
        &self.tutor
    }

    /// Items the last batch check sent but got no feedback for.
    pub fn last_unresolved(&self) -> &[usize] {
        &self.last_unresolved
    }
}

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A parsed practice-loop command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PracticeCommand {
    /// Set the answer for an item
    Answer { index: usize, text: String },
    /// Batch-check all pending items, or single-check one
    Check(Option<usize>),
    /// Re-check items the last batch left without feedback
    Retry,
    /// Show all items
    List,
    /// Show one item's feedback
    Show(usize),
    /// Switch language pair
    Lang { source: String, target: String },
    /// Replace the session with freshly generated expressions
    New,
    Help,
    Exit,
}

/// Run the interactive practice loop.
pub fn run_practice<L, H>(context: &mut PracticeContext<L, H>, formatter: &Formatter) -> Result<()>
where
    L: LlmProvider,
    L::Error: Display,
    H: HistoryStore,
    H::Error: Display,
{
    println!(
        "{}",
        formatter.info("SwitchLang practice - Type 'help' for commands, 'exit' to quit")
    );
    println!();
    if !context.session.is_empty() {
        println!("{}", formatter.format_session(&context.session));
    }

    let mut editor = DefaultEditor::new()?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        let prompt = format!(
            "[{} → {}]> ",
            context.session.source_language(),
            context.session.target_language()
        );

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_practice_command(line) {
                    Ok(command) => match execute_practice_command(command, context, formatter) {
                        Ok(Flow::Exit) => break,
                        Ok(Flow::Continue) => {}
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();
    println!("{}", formatter.format_progress(&context.session.progress()));

    Ok(())
}

/// Parse one input line.
pub fn parse_practice_command(line: &str) -> Result<PracticeCommand> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "exit" | "quit" | "q" => Ok(PracticeCommand::Exit),
        "help" | "?" => Ok(PracticeCommand::Help),
        "list" | "ls" => Ok(PracticeCommand::List),
        "retry" => Ok(PracticeCommand::Retry),
        "new" => Ok(PracticeCommand::New),
        "check" => {
            if rest.is_empty() {
                Ok(PracticeCommand::Check(None))
            } else {
                Ok(PracticeCommand::Check(Some(parse_item_number(rest)?)))
            }
        }
        "show" => {
            if rest.is_empty() {
                return Err(CliError::InvalidInput("Usage: show <n>".to_string()));
            }
            Ok(PracticeCommand::Show(parse_item_number(rest)?))
        }
        "answer" | "a" => parse_answer(rest),
        "lang" => {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            match parts.as_slice() {
                [source, target] => Ok(PracticeCommand::Lang {
                    source: source.to_string(),
                    target: target.to_string(),
                }),
                _ => Err(CliError::InvalidInput(
                    "Usage: lang <source> <target>".to_string(),
                )),
            }
        }
        // "<n> <text>" is shorthand for answer
        _ if head.chars().all(|c| c.is_ascii_digit()) => parse_answer(line),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            head
        ))),
    }
}

/// Execute one command against the context.
pub fn execute_practice_command<L, H>(
    command: PracticeCommand,
    context: &mut PracticeContext<L, H>,
    formatter: &Formatter,
) -> Result<Flow>
where
    L: LlmProvider,
    L::Error: Display,
    H: HistoryStore,
    H::Error: Display,
{
    match command {
        PracticeCommand::Exit => {
            println!("{}", formatter.info("Goodbye!"));
            return Ok(Flow::Exit);
        }
        PracticeCommand::Help => print_help(formatter),
        PracticeCommand::List => {
            println!("{}", formatter.format_session(&context.session));
            println!("{}", formatter.format_progress(&context.session.progress()));
        }
        PracticeCommand::Answer { index, text } => {
            context.session.set_input(index, text)?;
            println!("{}", formatter.success(&format!("Saved answer for #{}", index + 1)));
        }
        PracticeCommand::Check(Some(index)) => {
            let result = context
                .session
                .check_item(index, &context.tutor, &mut context.history)?;
            if context.session.item(index).is_some_and(|i| i.feedback.is_some()) {
                context.last_unresolved.retain(|&i| i != index);
            }
            println!("#{}", index + 1);
            println!("{}", formatter.format_evaluation(&result)?);
        }
        PracticeCommand::Check(None) => {
            if context.session.pending_indices().is_empty() {
                println!(
                    "{}",
                    formatter.info("Nothing to check. Answer an item first with 'answer <n> <text>'.")
                );
            } else {
                check_pending(context, None, formatter)?;
            }
        }
        PracticeCommand::Retry => {
            if context.last_unresolved.is_empty() {
                println!("{}", formatter.info("Nothing to retry."));
            } else {
                let unresolved = context.last_unresolved.clone();
                check_pending(context, Some(&unresolved), formatter)?;
            }
        }
        PracticeCommand::Show(index) => {
            let item = context
                .session
                .item(index)
                .ok_or_else(|| CliError::InvalidInput(format!("No item #{}", index + 1)))?;
            println!("#{} {}", index + 1, item.source_text);
            match &item.feedback {
                Some(feedback) => {
                    println!("{}", formatter.format_evaluation(feedback)?);
                }
                None => println!("{}", formatter.info("Not evaluated yet.")),
            }
        }
        PracticeCommand::Lang { source, target } => {
            context.session = context.session.with_languages(source, target);
            context.last_unresolved.clear();
            println!(
                "{}",
                formatter.success(&format!(
                    "Now practicing {} → {}. Answers were cleared.",
                    context.session.source_language(),
                    context.session.target_language()
                ))
            );
        }
        PracticeCommand::New => {
            let session = PracticeSession::generate(
                &context.tutor,
                context.session.source_language(),
                context.session.target_language(),
                context.count,
                context.tier,
            );
            if session.is_empty() {
                println!(
                    "{}",
                    formatter.warning("The backend returned no expressions; keeping the current items.")
                );
            } else {
                context.session = session;
                context.last_unresolved.clear();
                println!("{}", formatter.format_session(&context.session));
            }
        }
    }

    Ok(Flow::Continue)
}

/// Batch-check every pending item, or only `only` when given.
fn check_pending<L, H>(
    context: &mut PracticeContext<L, H>,
    only: Option<&[usize]>,
    formatter: &Formatter,
) -> Result<()>
where
    L: LlmProvider,
    L::Error: Display,
    H: HistoryStore,
    H::Error: Display,
{
    let outcome = match only {
        Some(indices) => context
            .session
            .check_only(indices, &context.tutor, &mut context.history),
        None => context
            .session
            .check_pending(&context.tutor, &mut context.history),
    };
    debug!(
        "Batch check applied {:?}, unresolved {:?}",
        outcome.applied, outcome.unresolved
    );

    for &index in &outcome.applied {
        if let Some(feedback) = context.session.item(index).and_then(|i| i.feedback.as_ref()) {
            println!("#{}", index + 1);
            println!("{}", formatter.format_evaluation(feedback)?);
        }
    }

    if !outcome.applied.is_empty() {
        println!(
            "{}",
            formatter.success(&format!("Evaluated {} item(s)", outcome.applied.len()))
        );
    }
    if !outcome.unresolved.is_empty() {
        let numbers: Vec<String> = outcome
            .unresolved
            .iter()
            .map(|i| format!("#{}", i + 1))
            .collect();
        println!(
            "{}",
            formatter.warning(&format!(
                "No feedback for {}. Type 'retry' to try again.",
                numbers.join(", ")
            ))
        );
    }

    context.last_unresolved = outcome.unresolved;
    Ok(())
}

/// Parse "<n> <text>".
fn parse_answer(args: &str) -> Result<PracticeCommand> {
    let usage = || CliError::InvalidInput("Usage: answer <n> <text>".to_string());

    let (number, text) = args.trim().split_once(char::is_whitespace).ok_or_else(usage)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(usage());
    }

    Ok(PracticeCommand::Answer {
        index: parse_item_number(number)?,
        text: text.to_string(),
    })
}

/// Parse a 1-based item number into a session index.
fn parse_item_number(s: &str) -> Result<usize> {
    match s.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CliError::InvalidInput(format!(
            "'{}' is not an item number (items start at 1)",
            s.trim()
        ))),
    }
}

fn get_history_path() -> Result<PathBuf> {
    let dir = app_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("practice_history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  answer <n> <text>     - Set your answer for item n (or just: <n> <text>)");
    println!("  check                 - Evaluate every answered item in one request");
    println!("  check <n>             - Evaluate item n on its own");
    println!("  retry                 - Re-check items the last check left without feedback");
    println!("  list                  - Show all items and their status");
    println!("  show <n>              - Show feedback for item n");
    println!("  lang <source> <target> - Switch languages (clears answers)");
    println!("  new                   - Generate a fresh set of expressions");
    println!("  help, ?               - Show this help");
    println!("  exit, quit, q         - Leave practice");
    println!();
}
