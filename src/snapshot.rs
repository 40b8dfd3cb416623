//! Untrusted persisted-roadmap input.
//!
//! A persisted snapshot may have been written by any earlier build, so nothing
//! about its shape is taken on faith. The raw payload is first gated as a whole
//! (JSON, array, first element carries an `id`), then every node is converted
//! field by field into the `Persisted*` types below. A field that is missing,
//! `null` or of the wrong type reads as "not set"; a node without a usable
//! identity is skipped. Only payload-level failures discard the snapshot.

use std::collections::BTreeMap;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::ValidationMode;
use crate::roadmap_model::{
    Attempt, ProblemStatus, ProgrammingLanguage, SolutionLink, SubTask, TestCase, TestRun,
};

/// Reason a persisted payload was rejected as a whole.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("persisted roadmap is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("persisted roadmap is {0}, expected an array of topics")]
    NotAnArray(&'static str),
    #[error("first persisted topic has no `id` field")]
    MissingId,
    #[error("persisted topic at index {index} is not an object with a string `id`")]
    MalformedTopic { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTopic {
    pub id: String,
    pub is_expanded: Option<bool>,
    pub sub_topics: Option<Vec<PersistedSubTopic>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSubTopic {
    pub id: String,
    pub notes: Option<String>,
    pub completed: Option<bool>,
    pub leetcode_problems: Option<Vec<PersistedProblem>>,
}

/// A persisted problem with every field optional.
///
/// `id` is optional because snapshots from builds that predate problem ids
/// only carry `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedProblem {
    pub id: Option<String>,
    pub name: Option<String>,

    pub status: Option<ProblemStatus>,
    pub is_priority: Option<bool>,
    pub deadline: Option<String>,
    pub description: Option<String>,
    pub problem_specific_notes: Option<String>,
    pub current_language: Option<ProgrammingLanguage>,
    pub time_spent: Option<u64>,
    pub last_practiced_date: Option<String>,

    pub custom_tags: Option<Vec<String>>,
    pub attempts: Option<Vec<Attempt>>,
    pub sub_tasks: Option<Vec<SubTask>>,
    pub solution_links: Option<Vec<SolutionLink>>,
    pub test_cases: Option<Vec<TestCase>>,

    pub user_solutions: Option<BTreeMap<String, String>>,
    pub last_test_run: Option<TestRun>,
}

/// Parses and validates a raw persisted payload.
///
/// # Errors
///
/// Returns a [`SnapshotError`] when the payload is not JSON, is not an array,
/// or fails the topic-level check selected by `mode`.
pub fn parse_snapshot(
    raw: &str,
    mode: ValidationMode,
) -> Result<Vec<PersistedTopic>, SnapshotError> {
    let value: Value = serde_json::from_str(raw)?;

    let items = match value {
        Value::Array(items) => items,
        other => return Err(SnapshotError::NotAnArray(kind_of(&other))),
    };

    if let Some(first) = items.first() {
        let has_id = first.as_object().is_some_and(|obj| obj.contains_key("id"));
        if !has_id {
            return Err(SnapshotError::MissingId);
        }
    }

    if mode == ValidationMode::Strict {
        if let Some(index) = items
            .iter()
            .position(|item| !item.get("id").is_some_and(Value::is_string))
        {
            return Err(SnapshotError::MalformedTopic { index });
        }
    }

    Ok(items.iter().filter_map(PersistedTopic::from_value).collect())
}

impl PersistedTopic {
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = Fields::of("topic", value)?;
        let id = fields.id()?;

        Some(Self {
            sub_topics: fields.children("subTopics", PersistedSubTopic::from_value),
            is_expanded: fields.get("isExpanded"),
            id,
        })
    }
}

impl PersistedSubTopic {
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = Fields::of("sub-topic", value)?;
        let id = fields.id()?;

        Some(Self {
            notes: fields.get("notes"),
            completed: fields.get("completed"),
            leetcode_problems: fields.children("leetcodeProblems", PersistedProblem::from_value),
            id,
        })
    }
}

impl PersistedProblem {
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = Fields::of("problem", value)?;
        let id: Option<String> = fields.get("id");
        let name: Option<String> = fields.get("name");

        if id.is_none() && name.is_none() {
            debug!("Skipping persisted problem with neither id nor name");
            return None;
        }

        Some(Self {
            id,
            name,
            status: fields.get("status"),
            is_priority: fields.get("isPriority"),
            deadline: fields.get("deadline"),
            description: fields.get("description"),
            problem_specific_notes: fields.get("problemSpecificNotes"),
            current_language: fields.get("currentLanguage"),
            time_spent: fields.get("timeSpent"),
            last_practiced_date: fields.get("lastPracticedDate"),
            custom_tags: fields.list("customTags"),
            attempts: fields.list("attempts"),
            sub_tasks: fields.list("subTasks"),
            solution_links: fields.list("solutionLinks"),
            test_cases: fields.list("testCases"),
            user_solutions: fields.string_map("userSolutions"),
            last_test_run: fields.nested("lastTestRun", test_run_from_value),
        })
    }

    /// Whether this record is the persisted counterpart of `id`.
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Legacy identity: a record written before problems had ids.
    pub fn has_legacy_name(&self, name: &str) -> bool {
        self.id.is_none() && self.name.as_deref() == Some(name)
    }
}

/// A test run needs its language and timestamp; malformed results are dropped one by one.
fn test_run_from_value(value: &Value) -> Option<TestRun> {
    let fields = Fields::of("test run", value)?;

    Some(TestRun {
        language: fields.get("language")?,
        timestamp: fields.get("timestamp")?,
        results: fields.list("results").unwrap_or_default(),
        console_output: fields.get("consoleOutput"),
    })
}

/// Typed, lenient access to the fields of one JSON object.
struct Fields<'a> {
    node: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn of(node: &'static str, value: &'a Value) -> Option<Self> {
        match value.as_object() {
            Some(map) => Some(Self { node, map }),
            None => {
                debug!("Skipping persisted {node}: expected an object, found {}", kind_of(value));
                None
            }
        }
    }

    fn id(&self) -> Option<String> {
        let id = self.get::<String>("id");
        if id.is_none() {
            debug!("Skipping persisted {} without a string id", self.node);
        }
        id
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.map.get(key).filter(|v| !v.is_null())?;
        match serde_json::from_value::<T>(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("Ignoring persisted {} field `{key}`: {e}", self.node);
                None
            }
        }
    }

    /// A list whose malformed entries are skipped individually.
    fn list<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        self.children(key, |item| match serde_json::from_value::<T>(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("Skipping malformed entry in persisted {} field `{key}`: {e}", self.node);
                None
            }
        })
    }

    /// A string-to-string map; entries with non-string values are skipped.
    fn string_map(&self, key: &str) -> Option<BTreeMap<String, String>> {
        match self.map.get(key)? {
            Value::Object(entries) => Some(
                entries
                    .iter()
                    .filter_map(|(name, value)| match value {
                        Value::String(text) => Some((name.clone(), text.clone())),
                        other => {
                            debug!(
                                "Skipping persisted {} `{key}` entry `{name}`: found {}",
                                self.node,
                                kind_of(other)
                            );
                            None
                        }
                    })
                    .collect(),
            ),
            Value::Null => None,
            other => {
                debug!(
                    "Ignoring persisted {} field `{key}`: expected an object, found {}",
                    self.node,
                    kind_of(other)
                );
                None
            }
        }
    }

    fn nested<T>(&self, key: &str, convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
        self.map.get(key).filter(|v| !v.is_null()).and_then(convert)
    }

    fn children<T>(&self, key: &str, convert: impl Fn(&Value) -> Option<T>) -> Option<Vec<T>> {
        match self.map.get(key)? {
            Value::Array(items) => Some(items.iter().filter_map(convert).collect()),
            Value::Null => None,
            other => {
                debug!(
                    "Ignoring persisted {} field `{key}`: expected an array, found {}",
                    self.node,
                    kind_of(other)
                );
                None
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_json_and_non_arrays() {
        assert!(matches!(
            parse_snapshot("not json", ValidationMode::Shallow),
            Err(SnapshotError::Parse(_))
        ));
        assert!(matches!(
            parse_snapshot("{}", ValidationMode::Shallow),
            Err(SnapshotError::NotAnArray("an object"))
        ));
    }

    #[test]
    fn first_topic_must_carry_an_id() {
        assert!(matches!(
            parse_snapshot(r#"[{"title":"x"}]"#, ValidationMode::Shallow),
            Err(SnapshotError::MissingId)
        ));
        assert!(matches!(
            parse_snapshot("[42]", ValidationMode::Shallow),
            Err(SnapshotError::MissingId)
        ));
    }

    #[test]
    fn empty_array_is_a_valid_snapshot() {
        assert!(parse_snapshot("[]", ValidationMode::Shallow).unwrap().is_empty());
    }

    #[test]
    fn shallow_mode_skips_malformed_later_topics() {
        let topics =
            parse_snapshot(r#"[{"id":"t1"}, "junk", {"title":"no id"}]"#, ValidationMode::Shallow).unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].id, "t1");
    }

    #[test]
    fn strict_mode_rejects_malformed_later_topics() {
        let result = parse_snapshot(r#"[{"id":"t1"}, {"id":7}]"#, ValidationMode::Strict);
        assert!(matches!(result, Err(SnapshotError::MalformedTopic { index: 1 })));
    }

    #[test]
    fn wrongly_typed_fields_read_as_unset() {
        let value = serde_json::json!({
            "id": "p1",
            "status": "Definitely Done",
            "isPriority": "yes",
            "customTags": ["fav"],
            "notes": null
        });
        let problem = PersistedProblem::from_value(&value).unwrap();

        assert_eq!(problem.status, None);
        assert_eq!(problem.is_priority, None);
        assert_eq!(problem.custom_tags, Some(vec!["fav".to_string()]));
    }

    #[test]
    fn null_and_missing_differ_from_empty() {
        let value = serde_json::json!({"id": "p1", "attempts": [], "subTasks": null});
        let problem = PersistedProblem::from_value(&value).unwrap();

        assert_eq!(problem.attempts, Some(vec![]));
        assert_eq!(problem.sub_tasks, None);
        assert_eq!(problem.solution_links, None);
    }

    #[test]
    fn malformed_entries_are_dropped_one_at_a_time() {
        let value = serde_json::json!({
            "id": "p1",
            "customTags": ["fav", 3],
            "attempts": [
                {"id": "a1", "date": "2024-01-01", "result": "pass"},
                {"id": 2, "date": "2024-01-02", "result": "fail"}
            ],
            "subTasks": [{"id": "st1", "text": "dry run", "completed": true}, "junk"],
            "userSolutions": {"python": "def solve(): return 42", "java": null, "rust": 7}
        });
        let problem = PersistedProblem::from_value(&value).unwrap();

        assert_eq!(problem.custom_tags, Some(vec!["fav".to_string()]));
        let attempts = problem.attempts.unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].id, "a1");
        assert_eq!(problem.sub_tasks.unwrap().len(), 1);

        let solutions = problem.user_solutions.unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions.get("python").map(String::as_str), Some("def solve(): return 42"));
    }

    #[test]
    fn test_run_keeps_valid_results() {
        let value = serde_json::json!({
            "id": "p1",
            "lastTestRun": {
                "language": "python",
                "timestamp": "2024-01-01T10:00:00Z",
                "results": [{"testCaseId": "tc1", "passed": true}, {"passed": "maybe"}]
            }
        });
        let run = PersistedProblem::from_value(&value).unwrap().last_test_run.unwrap();

        assert_eq!(run.results.len(), 1);
        assert_eq!(run.results[0].test_case_id, "tc1");

        let without_language = serde_json::json!({
            "id": "p1",
            "lastTestRun": {"timestamp": "t", "results": []}
        });
        assert!(PersistedProblem::from_value(&without_language).unwrap().last_test_run.is_none());
    }

    #[test]
    fn legacy_problem_without_id_keeps_its_name() {
        let value = serde_json::json!({"name": "Two Sum", "status": "Solved"});
        let problem = PersistedProblem::from_value(&value).unwrap();

        assert!(problem.has_legacy_name("Two Sum"));
        assert!(!problem.has_id("Two Sum"));
        assert!(PersistedProblem::from_value(&serde_json::json!({"status": "Solved"})).is_none());
    }

    #[test]
    fn nested_children_are_converted() {
        let raw = r#"[{"id":"t1","isExpanded":true,"subTopics":[
            {"id":"s1","completed":true,"leetcodeProblems":[{"id":"p1","status":"Solved"}, 5]}
        ]}]"#;
        let topics = parse_snapshot(raw, ValidationMode::Shallow).unwrap();
        let sub = &topics[0].sub_topics.as_ref().unwrap()[0];

        assert_eq!(topics[0].is_expanded, Some(true));
        assert_eq!(sub.completed, Some(true));
        assert_eq!(sub.leetcode_problems.as_ref().unwrap().len(), 1);
    }
}
