//! Integration tests for the Tutor

#[cfg(test)]
mod tests {
    use crate::{PracticeSession, Tutor, TutorConfig};
    use switchlang_domain::traits::HistoryStore;
    use switchlang_domain::{DifficultyTier, EvaluationResult, PracticeItem};
    use switchlang_llm::MockProvider;
    use switchlang_store::{InMemoryHistoryStore, SqliteHistoryStore};

    fn entry(corrected: &str) -> String {
        format!(
            r#"{{"is_correct": false, "corrected": "{0}", "better_expression": "{0}!", "explanation": "Check the verb."}}"#,
            corrected
        )
    }

    fn answered(source: &str, answer: &str) -> PracticeItem {
        PracticeItem {
            source_text: source.to_string(),
            user_input: answer.to_string(),
            feedback: None,
        }
    }

    #[test]
    fn test_batch_partial_response() {
        let response = format!(r#"{{"0": {}, "2": {}}}"#, entry("zero"), entry("two"));
        let tutor = Tutor::new(MockProvider::new(response), TutorConfig::default());

        let items = vec![
            answered("하나", "one"),
            answered("둘", "two"),
            answered("셋", "three"),
        ];

        let results = tutor.evaluate_batch(&items, "Korean", "English");
        assert_eq!(results.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(results[&0].corrected, "zero");
        assert_eq!(results[&2].corrected, "two");
        assert!(!results.contains_key(&1));
        assert_eq!(tutor.provider().call_count(), 1);
    }

    #[test]
    fn test_batch_without_eligible_items_makes_no_call() {
        let tutor = Tutor::new(MockProvider::new("{}"), TutorConfig::default());

        let items = vec![
            answered("하나", ""),
            PracticeItem {
                feedback: Some(EvaluationResult::error("done")),
                ..answered("둘", "two")
            },
        ];

        let results = tutor.evaluate_batch(&items, "Korean", "English");
        assert!(results.is_empty());
        assert_eq!(tutor.provider().call_count(), 0);
    }

    #[test]
    fn test_batch_uses_original_indices() {
        let response = format!(r#"{{"1": {}, "3": {}}}"#, entry("b"), entry("d"));
        let tutor = Tutor::new(MockProvider::new(response), TutorConfig::default());

        let items = vec![
            answered("a", ""),
            answered("b", "bee"),
            answered("c", "   "),
            answered("d", "dee"),
        ];

        let results = tutor.evaluate_batch(&items, "English", "Korean");
        assert_eq!(results.keys().copied().collect::<Vec<_>>(), vec![1, 3]);

        let prompt = &tutor.provider().prompts()[0];
        assert!(prompt.contains(r#""id": 1"#));
        assert!(prompt.contains(r#""id": 3"#));
        assert!(!prompt.contains(r#""id": 0"#));
        assert!(!prompt.contains(r#""id": 2"#));
    }

    #[test]
    fn test_batch_backend_failure_is_empty() {
        let tutor = Tutor::new(MockProvider::failing(), TutorConfig::default());
        let items = vec![answered("a", "x")];
        assert!(tutor.evaluate_batch(&items, "English", "Korean").is_empty());
        assert_eq!(tutor.provider().call_count(), 1);
    }

    #[test]
    fn test_batch_unparsable_response_is_empty() {
        let tutor = Tutor::new(MockProvider::new("Sorry, I cannot help."), TutorConfig::default());
        let items = vec![answered("a", "x"), answered("b", "y")];
        assert!(tutor.evaluate_batch(&items, "English", "Korean").is_empty());
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let tutor = Tutor::new(MockProvider::new("unused"), TutorConfig::default());
        let result = tutor.evaluate("", "", "", "");
        assert_eq!(result, EvaluationResult::no_input());
        assert_eq!(tutor.provider().call_count(), 0);
    }

    #[test]
    fn test_blank_answer_short_circuits_with_source_text() {
        let tutor = Tutor::new(MockProvider::new("unused"), TutorConfig::default());

        let empty = tutor.evaluate("Bonjour", "", "French", "English");
        let blank = tutor.evaluate("Bonjour", "  \t\n ", "French", "English");

        assert!(empty.is_no_input());
        assert!(blank.is_no_input());
        assert_eq!(tutor.provider().call_count(), 0);
    }

    #[test]
    fn test_single_evaluation_is_idempotent() {
        let tutor = Tutor::new(MockProvider::new(entry("I went")), TutorConfig::default());
        let first = tutor.evaluate("나는 갔다", "I goed", "Korean", "English");
        let second = tutor.evaluate("나는 갔다", "I goed", "Korean", "English");
        assert_eq!(first, second);
        assert_eq!(first.corrected, "I went");
    }

    #[test]
    fn test_single_evaluation_malformed_output() {
        let tutor = Tutor::new(MockProvider::new("```json\n{oops}\n```"), TutorConfig::default());
        let result = tutor.evaluate("a", "b", "English", "Korean");
        assert!(result.is_error());
        assert!(result.explanation.contains("{oops}"));
    }

    #[test]
    fn test_session_check_pending_records_history() {
        let response = format!(r#"{{"0": {}}}"#, entry("Hello"));
        let tutor = Tutor::new(MockProvider::new(response), TutorConfig::default());
        let mut history = InMemoryHistoryStore::new();

        let mut session = PracticeSession::new(
            "Korean",
            "English",
            vec!["안녕하세요".to_string(), "감사합니다".to_string()],
        );
        session.set_input(0, "Helo").unwrap();
        session.set_input(1, "Thank").unwrap();

        let outcome = session.check_pending(&tutor, &mut history);
        assert_eq!(outcome.applied, vec![0]);
        assert_eq!(outcome.unresolved, vec![1]);
        assert_eq!(session.pending_indices(), vec![1]);

        let records = history.query_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_text, "안녕하세요");
        assert_eq!(records[0].user_input, "Helo");
        let stored: EvaluationResult = serde_json::from_str(&records[0].feedback).unwrap();
        assert_eq!(stored.corrected, "Hello");
    }

    #[test]
    fn test_session_retry_only_sends_unresolved() {
        let mut llm = MockProvider::new(format!(r#"{{"0": {}}}"#, entry("first")));
        let tutor_first = Tutor::new(llm.clone(), TutorConfig::default());
        let mut history = InMemoryHistoryStore::new();

        let mut session = PracticeSession::new("Korean", "English", vec!["a".into(), "b".into()]);
        session.set_input(0, "x").unwrap();
        session.set_input(1, "y").unwrap();
        session.check_pending(&tutor_first, &mut history);

        // Second round: the backend answers for item 1 only
        let retry_prompt = crate::build_batch_evaluation_prompt(
            &session.batch_request(),
            "Korean",
            "English",
        );
        llm.add_response(retry_prompt, format!(r#"{{"1": {}}}"#, entry("second")));
        let tutor_retry = Tutor::new(llm.clone(), TutorConfig::default());

        let outcome = session.check_pending(&tutor_retry, &mut history);
        assert_eq!(outcome.applied, vec![1]);
        assert!(outcome.unresolved.is_empty());
        assert_eq!(session.progress().evaluated, 2);
        assert_eq!(history.len(), 2);
        assert_eq!(llm.call_count(), 2);
    }

    #[test]
    fn test_session_check_item_error_result_is_kept() {
        let tutor = Tutor::new(MockProvider::failing(), TutorConfig::default());
        let mut history = InMemoryHistoryStore::new();

        let mut session = PracticeSession::new("Korean", "English", vec!["a".into()]);
        session.set_input(0, "x").unwrap();

        let result = session.check_item(0, &tutor, &mut history).unwrap();
        assert!(result.is_error());
        assert!(session.items()[0].feedback.as_ref().unwrap().is_error());
        assert_eq!(history.len(), 1);
        assert!(session.check_item(0, &tutor, &mut history).is_err());
    }

    #[test]
    fn test_session_check_item_empty_input_leaves_item_pending() {
        let tutor = Tutor::new(MockProvider::new("unused"), TutorConfig::default());
        let mut history = InMemoryHistoryStore::new();

        let mut session = PracticeSession::new("Korean", "English", vec!["a".into()]);
        let result = session.check_item(0, &tutor, &mut history).unwrap();

        assert!(result.is_no_input());
        assert!(session.items()[0].feedback.is_none());
        assert!(history.is_empty());
        assert_eq!(tutor.provider().call_count(), 0);
    }

    #[test]
    fn test_session_check_item_records_sentinel_shaped_feedback() {
        let sentinel = serde_json::to_string(&EvaluationResult::no_input()).unwrap();
        let tutor = Tutor::new(MockProvider::new(sentinel), TutorConfig::default());
        let mut history = InMemoryHistoryStore::new();

        let mut session = PracticeSession::new("Korean", "English", vec!["a".into()]);
        session.set_input(0, "real answer").unwrap();
        let result = session.check_item(0, &tutor, &mut history).unwrap();

        assert_eq!(tutor.provider().call_count(), 1);
        assert_eq!(session.items()[0].feedback.as_ref(), Some(&result));
        assert!(session.pending_indices().is_empty());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_session_check_only_limits_request() {
        let llm = MockProvider::new(format!(r#"{{"1": {}}}"#, entry("b")));
        let tutor = Tutor::new(llm, TutorConfig::default());
        let mut history = InMemoryHistoryStore::new();

        let mut session =
            PracticeSession::new("Korean", "English", vec!["a".into(), "b".into(), "c".into()]);
        session.set_input(0, "x").unwrap();
        session.set_input(1, "y").unwrap();
        session.set_input(2, "z").unwrap();

        let outcome = session.check_only(&[1, 7], &tutor, &mut history);
        assert_eq!(outcome.applied, vec![1]);
        assert!(outcome.unresolved.is_empty());
        assert_eq!(session.pending_indices(), vec![0, 2]);

        let prompt = &tutor.provider().prompts()[0];
        assert!(prompt.contains(r#""id": 1"#));
        assert!(!prompt.contains(r#""id": 0"#));
        assert!(!prompt.contains(r#""id": 2"#));

        assert_eq!(session.check_only(&[], &tutor, &mut history), Default::default());
        assert_eq!(tutor.provider().call_count(), 1);
    }

    #[test]
    fn test_session_with_sqlite_history() {
        let tutor = Tutor::new(MockProvider::new(entry("Thank you")), TutorConfig::default());
        let mut history = SqliteHistoryStore::new(":memory:").unwrap();

        let mut session = PracticeSession::new("Korean", "English", vec!["감사합니다".into()]);
        session.set_input(0, "Thanks you").unwrap();
        session.check_item(0, &tutor, &mut history).unwrap();

        let records = history.query_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target_language, "English");
    }

    #[test]
    fn test_generated_session() {
        let tutor = Tutor::new(
            MockProvider::new("좋은 아침이에요\n배고파요\n"),
            TutorConfig::default(),
        );
        let session =
            PracticeSession::generate(&tutor, "Korean", "English", 5, DifficultyTier::Beginner);
        assert_eq!(session.len(), 2);
        assert_eq!(session.source_language(), "Korean");
        assert!(tutor.provider().prompts()[0].contains("Beginner"));
    }

    #[test]
    fn test_generated_session_backend_failure() {
        let tutor = Tutor::new(MockProvider::failing(), TutorConfig::default());
        let session =
            PracticeSession::generate(&tutor, "Korean", "English", 5, DifficultyTier::Advanced);
        assert!(session.is_empty());
    }
}
