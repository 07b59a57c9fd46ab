//! History module - append-only records of evaluated answers

/// A history entry to be appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryRecord {
    /// Language of the source sentence
    pub source_language: String,

    /// Language the learner answered in
    pub target_language: String,

    /// Sentence shown to the learner
    pub source_text: String,

    /// The learner's answer
    pub user_input: String,

    /// Serialized `EvaluationResult`
    pub feedback: String,
}

/// A stored history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Store-assigned identifier
    pub id: i64,

    /// Unix timestamp (seconds) of the append
    pub timestamp: u64,

    /// Language of the source sentence
    pub source_language: String,

    /// Language the learner answered in
    pub target_language: String,

    /// Sentence shown to the learner
    pub source_text: String,

    /// The learner's answer
    pub user_input: String,

    /// Serialized `EvaluationResult`
    pub feedback: String,
}
