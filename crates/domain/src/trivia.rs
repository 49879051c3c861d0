use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::ReadError;

#[allow(async_fn_in_trait)]
pub trait TriviaService {
    async fn get_questions(&self, prompt: &str) -> Result<Vec<QuestionCard>, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait TriviaRepository {
    /// Returns the raw text produced by the generative endpoint. The
    /// requested response schema is advisory only, so the result must be
    /// treated as untrusted.
    async fn generate_questions(&self, prompt: &str) -> Result<String, ReadError>;
}

/// A quiz question reconstructed from an untrusted payload.
///
/// `options` is non-empty and `correct_option` is a valid index into it.
/// Instances are only produced by [`parse_questions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCard {
    pub question: String,
    pub options: Vec<String>,
    pub correct_option: usize,
}

/// Rebuilds quiz questions from the parsed body of a generative-model
/// response.
///
/// Malformed input never fails: a non-array payload yields an empty list
/// and malformed entries are dropped individually. Options that are not
/// strings are filtered out; an entry whose options all disappear is
/// dropped. `correctOption` is accepted only as an unsigned integer below
/// the filtered option count; anything else, including fractional values
/// an untyped consumer would tolerate, falls back to `0`, trading
/// correctness for availability.
#[must_use]
pub fn parse_questions(payload: &Value) -> Vec<QuestionCard> {
    let Some(items) = payload.as_array() else {
        return Vec::new();
    };
    items.iter().filter_map(parse_question).collect()
}

fn parse_question(item: &Value) -> Option<QuestionCard> {
    let question = item.get("question")?.as_str()?;
    let options = item
        .get("options")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect::<Vec<_>>();

    if options.is_empty() {
        return None;
    }

    // Validated against the filtered length, as filtering may have shifted
    // or removed the originally intended option.
    let correct_option = item
        .get("correctOption")
        .and_then(Value::as_u64)
        .and_then(|index| usize::try_from(index).ok())
        .filter(|index| *index < options.len())
        .unwrap_or(0);

    Some(QuestionCard {
        question: question.to_string(),
        options,
        correct_option,
    })
}

/// A token identifying one refresh attempt, see [`Quiz::begin_refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshToken(u64);

/// Navigation state over a list of quiz questions.
///
/// An empty question list is a valid state with no current question. There
/// is no terminal state, the quiz is freely navigable.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Quiz {
    questions: Vec<QuestionCard>,
    current_index: usize,
    selections: BTreeMap<usize, usize>,
    revealed: BTreeSet<usize>,
    generation: u64,
}

impl Quiz {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionCard] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuestionCard> {
        self.questions.get(self.current_index)
    }

    /// The selected option of the current question, if any.
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.selections.get(&self.current_index).copied()
    }

    /// Whether the answer of the current question is shown.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed.contains(&self.current_index)
    }

    /// Records `option` as the selection for the current question and hides
    /// a previously revealed answer.
    pub fn select_option(&mut self, option: usize) {
        if self.questions.is_empty() {
            return;
        }
        self.selections.insert(self.current_index, option);
        self.revealed.remove(&self.current_index);
    }

    /// Shows the answer of the current question. No-op without a selection.
    pub fn reveal(&mut self) {
        if self.selections.contains_key(&self.current_index) {
            self.revealed.insert(self.current_index);
        }
    }

    pub fn next(&mut self) {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
        }
    }

    pub fn previous(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
    }

    /// Replaces the questions and resets navigation, selections, and
    /// revealed answers.
    pub fn refresh(&mut self, questions: Vec<QuestionCard>) {
        let token = self.begin_refresh();
        self.apply_refresh(token, questions);
    }

    /// Starts a refresh and supersedes all earlier refresh attempts. The
    /// returned token must be passed to [`Quiz::apply_refresh`] once the
    /// new questions are available.
    pub fn begin_refresh(&mut self) -> RefreshToken {
        self.generation += 1;
        RefreshToken(self.generation)
    }

    /// Applies the result of a refresh attempt. A stale token is ignored so
    /// that an outdated response cannot overwrite a later one. Returns
    /// whether the questions were applied.
    pub fn apply_refresh(&mut self, token: RefreshToken, questions: Vec<QuestionCard>) -> bool {
        if token.0 != self.generation {
            return false;
        }
        self.questions = questions;
        self.current_index = 0;
        self.selections.clear();
        self.revealed.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn card(question: &str, options: &[&str], correct_option: usize) -> QuestionCard {
        QuestionCard {
            question: question.to_string(),
            options: options.iter().map(ToString::to_string).collect(),
            correct_option,
        }
    }

    #[rstest]
    #[case::not_an_array(json!("not an array"), vec![])]
    #[case::null(json!(null), vec![])]
    #[case::object(json!({"question": "Q", "options": ["A"]}), vec![])]
    #[case::empty_array(json!([]), vec![])]
    #[case::well_formed(
        json!([{"question": "Q", "options": ["A", "B"], "correctOption": 1}]),
        vec![card("Q", &["A", "B"], 1)]
    )]
    #[case::out_of_range_defaults_to_zero(
        json!([{"question": "Q", "options": ["A", "B"], "correctOption": 5}]),
        vec![card("Q", &["A", "B"], 0)]
    )]
    #[case::negative_defaults_to_zero(
        json!([{"question": "Q", "options": ["A", "B"], "correctOption": -1}]),
        vec![card("Q", &["A", "B"], 0)]
    )]
    #[case::non_integer_defaults_to_zero(
        json!([{"question": "Q", "options": ["A", "B"], "correctOption": 1.5}]),
        vec![card("Q", &["A", "B"], 0)]
    )]
    #[case::missing_correct_option_defaults_to_zero(
        json!([{"question": "Q", "options": ["A", "B"]}]),
        vec![card("Q", &["A", "B"], 0)]
    )]
    #[case::empty_options_drop_the_entry(
        json!([{"question": "Q", "options": []}]),
        vec![]
    )]
    #[case::non_string_options_are_filtered(
        json!([{"question": "Q", "options": ["A", 42, "C"], "correctOption": 2}]),
        vec![card("Q", &["A", "C"], 0)]
    )]
    #[case::only_non_string_options_drop_the_entry(
        json!([{"question": "Q", "options": [1, 2, 3], "correctOption": 0}]),
        vec![]
    )]
    #[case::missing_question_drops_the_entry(
        json!([{"options": ["A", "B"], "correctOption": 0}]),
        vec![]
    )]
    #[case::non_string_question_drops_the_entry(
        json!([{"question": 7, "options": ["A"], "correctOption": 0}]),
        vec![]
    )]
    #[case::non_array_options_drop_the_entry(
        json!([{"question": "Q", "options": "A", "correctOption": 0}]),
        vec![]
    )]
    #[case::non_object_entries_are_dropped_individually(
        json!([
            "garbage",
            {"question": "Q1", "options": ["A"], "correctOption": 0},
            42,
            {"question": "Q2", "options": ["A", "B"], "correctOption": 1},
        ]),
        vec![card("Q1", &["A"], 0), card("Q2", &["A", "B"], 1)]
    )]
    fn test_parse_questions(#[case] payload: Value, #[case] expected: Vec<QuestionCard>) {
        assert_eq!(parse_questions(&payload), expected);
    }

    fn quiz_with_questions(count: usize) -> Quiz {
        let mut quiz = Quiz::new();
        quiz.refresh(
            (0..count)
                .map(|i| card(&format!("Q{i}"), &["A", "B", "C"], 0))
                .collect(),
        );
        quiz
    }

    #[test]
    fn test_initial_state() {
        let quiz = Quiz::new();
        assert_eq!(quiz.questions(), &[]);
        assert_eq!(quiz.current_index(), 0);
        assert_eq!(quiz.current_question(), None);
        assert_eq!(quiz.selection(), None);
        assert!(!quiz.is_revealed());
    }

    #[test]
    fn test_next_stops_at_last_index() {
        let mut quiz = quiz_with_questions(2);
        quiz.next();
        assert_eq!(quiz.current_index(), 1);
        quiz.next();
        assert_eq!(quiz.current_index(), 1);
    }

    #[test]
    fn test_previous_stops_at_first_index() {
        let mut quiz = quiz_with_questions(2);
        quiz.previous();
        assert_eq!(quiz.current_index(), 0);
        quiz.next();
        quiz.previous();
        assert_eq!(quiz.current_index(), 0);
    }

    #[test]
    fn test_navigation_on_empty_quiz() {
        let mut quiz = Quiz::new();
        quiz.next();
        assert_eq!(quiz.current_index(), 0);
        quiz.previous();
        assert_eq!(quiz.current_index(), 0);
        quiz.select_option(1);
        assert_eq!(quiz.selection(), None);
    }

    #[test]
    fn test_select_and_reveal_affect_only_current_question() {
        let mut quiz = quiz_with_questions(3);
        quiz.select_option(2);
        quiz.reveal();
        assert_eq!(quiz.selection(), Some(2));
        assert!(quiz.is_revealed());

        quiz.next();
        assert_eq!(quiz.selection(), None);
        assert!(!quiz.is_revealed());

        quiz.previous();
        assert_eq!(quiz.selection(), Some(2));
        assert!(quiz.is_revealed());
    }

    #[test]
    fn test_reveal_without_selection_is_noop() {
        let mut quiz = quiz_with_questions(1);
        quiz.reveal();
        assert!(!quiz.is_revealed());
    }

    #[test]
    fn test_reselecting_hides_revealed_answer() {
        let mut quiz = quiz_with_questions(1);
        quiz.select_option(0);
        quiz.reveal();
        assert!(quiz.is_revealed());

        quiz.select_option(1);
        assert_eq!(quiz.selection(), Some(1));
        assert!(!quiz.is_revealed());
    }

    #[test]
    fn test_refresh_resets_navigation_state() {
        let mut quiz = quiz_with_questions(3);
        quiz.next();
        quiz.select_option(1);
        quiz.reveal();

        quiz.refresh(vec![card("Q", &["A"], 0)]);

        assert_eq!(quiz.current_index(), 0);
        assert_eq!(quiz.selection(), None);
        assert!(!quiz.is_revealed());
        assert_eq!(quiz.questions().len(), 1);
    }

    #[test]
    fn test_stale_refresh_is_ignored() {
        let mut quiz = Quiz::new();
        let first = quiz.begin_refresh();
        let second = quiz.begin_refresh();

        assert!(quiz.apply_refresh(second, vec![card("new", &["A"], 0)]));
        assert!(!quiz.apply_refresh(first, vec![card("stale", &["A"], 0)]));

        assert_eq!(quiz.questions(), &[card("new", &["A"], 0)]);
    }
}
