//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chrono::DateTime;
use colored::*;
use switchlang_domain::{EvaluationResult, HistoryRecord};
use switchlang_tutor::{PracticeSession, SessionProgress};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Widest cell shown in history and session tables
const CELL_CHARS: usize = 40;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format one evaluation.
    pub fn format_evaluation(&self, result: &EvaluationResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Quiet => Ok(if result.is_error() {
                "error".to_string()
            } else if result.is_correct {
                "correct".to_string()
            } else {
                "incorrect".to_string()
            }),
            OutputFormat::Table => Ok(self.format_evaluation_table(result)),
        }
    }

    fn format_evaluation_table(&self, result: &EvaluationResult) -> String {
        if result.is_no_input() {
            return self.warning(&result.explanation);
        }
        if result.is_error() {
            return self.error(&result.explanation);
        }

        let verdict = if result.is_correct {
            self.success("Correct")
        } else {
            self.colorize("✗ Needs work", "red")
        };

        let mut builder = Builder::default();
        builder.push_record(["Corrected", result.corrected.as_str()]);
        builder.push_record(["Natural", result.better_expression.as_str()]);
        builder.push_record(["Why", result.explanation.as_str()]);

        let mut table = builder.build();
        table.with(Style::rounded());

        format!("{}\n{}", verdict, table)
    }

    /// Format generated expressions.
    pub fn format_expressions(&self, expressions: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(expressions)?),
            OutputFormat::Quiet => Ok(expressions.join("\n")),
            OutputFormat::Table => {
                if expressions.is_empty() {
                    return Ok(self.colorize("No expressions generated.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "Expression"]);
                for (idx, expression) in expressions.iter().enumerate() {
                    builder.push_record([(idx + 1).to_string(), expression.clone()]);
                }

                Ok(self.finish_table(builder))
            }
        }
    }

    /// Format history records.
    pub fn format_history(&self, records: &[HistoryRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json_records: Vec<serde_json::Value> = records
                    .iter()
                    .map(|r| {
                        // Older rows may hold feedback that no longer decodes
                        let feedback = serde_json::from_str::<serde_json::Value>(&r.feedback)
                            .unwrap_or_else(|_| serde_json::Value::String(r.feedback.clone()));
                        serde_json::json!({
                            "id": r.id,
                            "timestamp": r.timestamp,
                            "source_language": r.source_language,
                            "target_language": r.target_language,
                            "source_text": r.source_text,
                            "user_input": r.user_input,
                            "feedback": feedback,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json_records)?)
            }
            OutputFormat::Quiet => Ok(records
                .iter()
                .map(|r| r.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if records.is_empty() {
                    return Ok(self.colorize("No history yet.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["When", "Languages", "Source", "Answer", "Result"]);
                for record in records {
                    builder.push_record([
                        format_timestamp(record.timestamp),
                        format!("{} → {}", record.source_language, record.target_language),
                        truncate(&record.source_text, CELL_CHARS),
                        truncate(&record.user_input, CELL_CHARS),
                        verdict_label(&record.feedback).to_string(),
                    ]);
                }

                Ok(self.finish_table(builder))
            }
        }
    }

    /// Format a model list.
    pub fn format_models(&self, models: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(models)?),
            OutputFormat::Quiet => Ok(models.join("\n")),
            OutputFormat::Table => {
                if models.is_empty() {
                    return Ok(self.colorize("No models support content generation.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Model"]);
                for model in models {
                    builder.push_record([model.as_str()]);
                }

                Ok(self.finish_table(builder))
            }
        }
    }

    /// Format the items of a practice session.
    ///
    /// Numbers are 1-based, matching what the practice loop accepts.
    pub fn format_session(&self, session: &PracticeSession) -> String {
        if session.is_empty() {
            return self.colorize("No practice items.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", session.source_language(), session.target_language(), "Status"]);
        for (idx, item) in session.items().iter().enumerate() {
            let status = match &item.feedback {
                Some(feedback) if feedback.is_error() => self.colorize("error", "red"),
                Some(feedback) if feedback.is_correct => self.colorize("correct", "green"),
                Some(_) => self.colorize("incorrect", "yellow"),
                None if item.has_input() => "pending".to_string(),
                None => String::new(),
            };
            builder.push_record([
                (idx + 1).to_string(),
                truncate(&item.source_text, CELL_CHARS),
                truncate(&item.user_input, CELL_CHARS),
                status,
            ]);
        }

        self.finish_table(builder)
    }

    /// Format session progress.
    pub fn format_progress(&self, progress: &SessionProgress) -> String {
        self.info(&format!(
            "{}/{} answered, {} evaluated, {} correct",
            progress.answered, progress.total, progress.evaluated, progress.correct
        ))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn finish_table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Short verdict for a stored feedback payload.
fn verdict_label(feedback: &str) -> &'static str {
    match serde_json::from_str::<EvaluationResult>(feedback) {
        Ok(result) if result.is_error() => "error",
        Ok(result) if result.is_correct => "correct",
        Ok(_) => "incorrect",
        Err(_) => "unreadable",
    }
}

fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
