//! Per-field merge rules for a single problem record.
//!
//! | Fields | Rule |
//! |---|---|
//! | id, name, url, difficulty, tags, topic/sub-topic ids | canonical, always |
//! | status, isPriority, deadline, description, problemSpecificNotes, currentLanguage, timeSpent, lastPracticedDate | persisted if set, else canonical |
//! | customTags, attempts, subTasks, solutionLinks, testCases | persisted list if set (even empty), else canonical |
//! | userSolutions | key-wise union, persisted wins per key |
//! | lastTestRun | persisted only |

use crate::roadmap_model::Problem;
use crate::snapshot::PersistedProblem;

/// Merges a canonical problem with its persisted counterpart.
///
/// With no persisted record the canonical problem is returned unchanged.
pub fn merge_problem(canonical: &Problem, persisted: Option<&PersistedProblem>) -> Problem {
    let Some(saved) = persisted else {
        return canonical.clone();
    };

    let mut user_solutions = canonical.user_solutions.clone();
    if let Some(saved_solutions) = &saved.user_solutions {
        user_solutions.extend(saved_solutions.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    Problem {
        topic_id: canonical.topic_id.clone(),
        sub_topic_id: canonical.sub_topic_id.clone(),
        id: canonical.id.clone(),
        name: canonical.name.clone(),
        url: canonical.url.clone(),
        difficulty: canonical.difficulty,
        tags: canonical.tags.clone(),

        status: saved.status.unwrap_or(canonical.status),
        is_priority: saved.is_priority.unwrap_or(canonical.is_priority),
        deadline: prefer(&saved.deadline, &canonical.deadline),
        description: prefer(&saved.description, &canonical.description),
        problem_specific_notes: prefer(
            &saved.problem_specific_notes,
            &canonical.problem_specific_notes,
        ),
        current_language: saved.current_language.unwrap_or(canonical.current_language),
        time_spent: saved.time_spent.unwrap_or(canonical.time_spent),
        last_practiced_date: prefer(&saved.last_practiced_date, &canonical.last_practiced_date),

        custom_tags: prefer(&saved.custom_tags, &canonical.custom_tags),
        attempts: prefer(&saved.attempts, &canonical.attempts),
        sub_tasks: prefer(&saved.sub_tasks, &canonical.sub_tasks),
        solution_links: prefer(&saved.solution_links, &canonical.solution_links),
        test_cases: prefer(&saved.test_cases, &canonical.test_cases),

        user_solutions,
        last_test_run: saved.last_test_run.clone(),
    }
}

/// Merges a persisted scalar over its canonical default.
pub fn merge_scalar<T: Copy>(persisted: Option<T>, canonical: T) -> T {
    persisted.unwrap_or(canonical)
}

fn prefer<T: Clone>(persisted: &Option<T>, canonical: &T) -> T {
    persisted.as_ref().unwrap_or(canonical).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap_model::{
        Attempt, Difficulty, ProblemStatus, ProgrammingLanguage, TestResult, TestRun,
    };

    fn canonical() -> Problem {
        let mut problem = Problem::canonical(
            "t1",
            "s1",
            "p1",
            "Two Sum",
            "https://leetcode.com/problems/two-sum/",
            Difficulty::Easy,
            vec!["Array".to_string()],
        );
        problem.description = "canonical description".to_string();
        problem
            .user_solutions
            .insert("javascript".to_string(), "// starter".to_string());
        problem
            .user_solutions
            .insert("python".to_string(), "# starter".to_string());
        problem
    }

    #[test]
    fn absent_record_returns_canonical() {
        assert_eq!(merge_problem(&canonical(), None), canonical());
    }

    #[test]
    fn structural_fields_always_come_from_canonical() {
        let saved = PersistedProblem {
            id: Some("p1".to_string()),
            name: Some("Renamed by an old build".to_string()),
            ..PersistedProblem::default()
        };
        let merged = merge_problem(&canonical(), Some(&saved));

        assert_eq!(merged.name, "Two Sum");
        assert_eq!(merged.tags, vec!["Array".to_string()]);
        assert_eq!(merged.difficulty, Difficulty::Easy);
    }

    #[test]
    fn partial_record_overrides_only_set_fields() {
        let saved = PersistedProblem {
            id: Some("p1".to_string()),
            status: Some(ProblemStatus::Solved),
            deadline: Some(String::new()),
            attempts: Some(vec![Attempt {
                id: "a1".to_string(),
                date: "2024-01-01".to_string(),
                result: "pass".to_string(),
                notes: None,
            }]),
            ..PersistedProblem::default()
        };
        let merged = merge_problem(&canonical(), Some(&saved));

        assert_eq!(merged.status, ProblemStatus::Solved);
        assert_eq!(merged.deadline, "");
        assert_eq!(merged.description, "canonical description");
        assert_eq!(merged.attempts.len(), 1);
        assert!(!merged.is_priority);
    }

    #[test]
    fn persisted_empty_list_beats_canonical_list() {
        let mut base = canonical();
        base.custom_tags = vec!["default".to_string()];
        let saved = PersistedProblem {
            id: Some("p1".to_string()),
            custom_tags: Some(vec![]),
            ..PersistedProblem::default()
        };

        assert!(merge_problem(&base, Some(&saved)).custom_tags.is_empty());
    }

    #[test]
    fn user_solutions_are_unioned_with_persisted_winning() {
        let saved = PersistedProblem {
            id: Some("p1".to_string()),
            user_solutions: Some(
                [
                    ("python".to_string(), "def two_sum(): ...".to_string()),
                    ("rust".to_string(), "fn two_sum() {}".to_string()),
                ]
                .into_iter()
                .collect(),
            ),
            ..PersistedProblem::default()
        };
        let merged = merge_problem(&canonical(), Some(&saved));

        assert_eq!(merged.solution_for(ProgrammingLanguage::Javascript), Some("// starter"));
        assert_eq!(merged.solution_for(ProgrammingLanguage::Python), Some("def two_sum(): ..."));
        assert_eq!(merged.user_solutions.get("rust").map(String::as_str), Some("fn two_sum() {}"));
    }

    #[test]
    fn last_test_run_comes_only_from_persisted() {
        let mut base = canonical();
        base.last_test_run = Some(TestRun {
            language: ProgrammingLanguage::Java,
            timestamp: "t0".to_string(),
            results: vec![],
            console_output: None,
        });
        let saved = PersistedProblem {
            id: Some("p1".to_string()),
            ..PersistedProblem::default()
        };

        assert!(merge_problem(&base, Some(&saved)).last_test_run.is_none());
    }

    #[test]
    fn persisted_last_test_run_is_carried_over() {
        let run = TestRun {
            language: ProgrammingLanguage::Python,
            timestamp: "2024-01-01T10:00:00Z".to_string(),
            results: vec![TestResult {
                test_case_id: "tc1".to_string(),
                passed: false,
                actual_output: Some("[0,1]".to_string()),
                error: None,
            }],
            console_output: Some("ran 1 case".to_string()),
        };
        let saved = PersistedProblem {
            id: Some("p1".to_string()),
            last_test_run: Some(run.clone()),
            ..PersistedProblem::default()
        };

        assert_eq!(merge_problem(&canonical(), Some(&saved)).last_test_run, Some(run));
    }

    #[test]
    fn scalar_merge_prefers_persisted() {
        assert!(merge_scalar(Some(true), false));
        assert!(!merge_scalar(None, false));
    }
}
