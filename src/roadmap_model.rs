//! Data model definitions for the study roadmap.
//!
//! This module defines the strict, fully-populated types that make up a roadmap
//! forest: [`Topic`] → [`SubTopic`] → [`Problem`]. These are the types the
//! reconciliation engine produces and the mutation API operates on. Every
//! mutable collection is a concrete `Vec` or `BTreeMap`, so a merged record can
//! never carry an "undefined" field.
//!
//! The serialized form uses camelCase keys and is exactly what gets written to
//! the persistence slot:
//!
//! ```json
//! [{
//!   "id": "arrays_hashing",
//!   "title": "Arrays & Hashing",
//!   "description": "",
//!   "isExpanded": true,
//!   "subTopics": [{
//!     "id": "arrays_hashing_intro",
//!     "title": "Introduction",
//!     "resources": [],
//!     "leetcodeProblems": [{ "id": "lc217", "name": "Contains Duplicate", "...": "..." }],
//!     "notes": "",
//!     "completed": false
//!   }]
//! }]
//! ```

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Progress state of a single practice problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProblemStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    Attempted,
    #[serde(rename = "In Progress")]
    InProgress,
    Solved,
    #[serde(rename = "Solved with Help")]
    SolvedWithHelp,
    #[serde(rename = "Review Later")]
    ReviewLater,
    Skipped,
    Stuck,
}

impl ProblemStatus {
    /// All statuses in the order the problem editor offers them.
    pub const ALL: [ProblemStatus; 8] = [
        ProblemStatus::NotStarted,
        ProblemStatus::Attempted,
        ProblemStatus::InProgress,
        ProblemStatus::Solved,
        ProblemStatus::SolvedWithHelp,
        ProblemStatus::ReviewLater,
        ProblemStatus::Skipped,
        ProblemStatus::Stuck,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProblemStatus::NotStarted => "Not Started",
            ProblemStatus::Attempted => "Attempted",
            ProblemStatus::InProgress => "In Progress",
            ProblemStatus::Solved => "Solved",
            ProblemStatus::SolvedWithHelp => "Solved with Help",
            ProblemStatus::ReviewLater => "Review Later",
            ProblemStatus::Skipped => "Skipped",
            ProblemStatus::Stuck => "Stuck",
        }
    }

    /// Whether the status counts towards "solved" progress.
    pub fn is_solved(&self) -> bool {
        matches!(self, ProblemStatus::Solved | ProblemStatus::SolvedWithHelp)
    }
}

impl Display for ProblemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Difficulty of a problem as published by the judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Languages the embedded solution editor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgrammingLanguage {
    #[default]
    Javascript,
    Python,
    Java,
}

impl ProgrammingLanguage {
    pub const ALL: [ProgrammingLanguage; 3] = [
        ProgrammingLanguage::Javascript,
        ProgrammingLanguage::Python,
        ProgrammingLanguage::Java,
    ];

    /// Key used for this language in [`Problem::user_solutions`].
    pub fn key(&self) -> &'static str {
        match self {
            ProgrammingLanguage::Javascript => "javascript",
            ProgrammingLanguage::Python => "python",
            ProgrammingLanguage::Java => "java",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionLink {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub id: String,
    pub date: String,
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    pub input: String,
    pub expected_output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_example: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test_case_id: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of the last (simulated) test run in the solution editor.
///
/// Only ever produced by the editor at runtime; canonical content never
/// carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    pub language: ProgrammingLanguage,
    pub timestamp: String,
    pub results: Vec<TestResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console_output: Option<String>,
}

/// A practice problem with its descriptive fields and the user's progress.
///
/// # Field ownership
///
/// - **Structural** (always from canonical content): `id`, `name`, `url`,
///   `difficulty`, `tags`, plus the contextual `topic_id` / `sub_topic_id`.
/// - **Mutable scalars**: `status`, `is_priority`, `deadline`, `description`,
///   `problem_specific_notes`, `current_language`, `time_spent`,
///   `last_practiced_date`.
/// - **Mutable collections**: `custom_tags`, `attempts`, `sub_tasks`,
///   `solution_links`, `test_cases`.
/// - **Keyed map**: `user_solutions`, keyed by language name. Unknown language
///   keys written by a newer build are kept as-is.
/// - **Session-only**: `last_test_run`.
///
/// # Examples
///
/// ```rust
/// use study_tracker_core::roadmap_model::{Difficulty, Problem, ProblemStatus};
///
/// let problem = Problem::canonical(
///     "arrays_hashing",
///     "arrays_hashing_intro",
///     "lc217",
///     "Contains Duplicate",
///     "https://leetcode.com/problems/contains-duplicate/",
///     Difficulty::Easy,
///     vec!["Array".to_string()],
/// );
///
/// assert_eq!(problem.status, ProblemStatus::NotStarted);
/// assert!(problem.custom_tags.is_empty());
/// assert!(problem.last_test_run.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub topic_id: String,
    pub sub_topic_id: String,
    pub id: String,
    pub name: String,
    pub url: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,

    pub status: ProblemStatus,
    pub is_priority: bool,
    pub deadline: String,
    pub description: String,
    pub problem_specific_notes: String,
    pub current_language: ProgrammingLanguage,
    pub time_spent: u64,
    pub last_practiced_date: String,

    pub custom_tags: Vec<String>,
    pub attempts: Vec<Attempt>,
    pub sub_tasks: Vec<SubTask>,
    pub solution_links: Vec<SolutionLink>,
    pub test_cases: Vec<TestCase>,

    pub user_solutions: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_test_run: Option<TestRun>,
}

impl Problem {
    /// Builds a problem with every mutable field at its fresh-start default.
    pub fn canonical(
        topic_id: impl Into<String>,
        sub_topic_id: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        difficulty: Difficulty,
        tags: Vec<String>,
    ) -> Self {
        Self {
            topic_id: topic_id.into(),
            sub_topic_id: sub_topic_id.into(),
            id: id.into(),
            name: name.into(),
            url: url.into(),
            difficulty,
            tags,
            status: ProblemStatus::NotStarted,
            is_priority: false,
            deadline: String::new(),
            description: String::new(),
            problem_specific_notes: String::new(),
            current_language: ProgrammingLanguage::default(),
            time_spent: 0,
            last_practiced_date: String::new(),
            custom_tags: Vec::new(),
            attempts: Vec::new(),
            sub_tasks: Vec::new(),
            solution_links: Vec::new(),
            test_cases: Vec::new(),
            user_solutions: BTreeMap::new(),
            last_test_run: None,
        }
    }

    /// Stored code for `language`, if any.
    pub fn solution_for(&self, language: ProgrammingLanguage) -> Option<&str> {
        self.user_solutions.get(language.key()).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTopic {
    pub id: String,
    pub title: String,
    pub resources: Vec<Resource>,
    pub leetcode_problems: Vec<Problem>,
    pub notes: String,
    pub completed: bool,
}

impl SubTopic {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            resources: Vec::new(),
            leetcode_problems: Vec::new(),
            notes: String::new(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_expanded: bool,
    pub sub_topics: Vec<SubTopic>,
}

impl Topic {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            is_expanded: false,
            sub_topics: Vec::new(),
        }
    }
}
