//! Startup reconciliation of the canonical roadmap with the persisted snapshot.
//!
//! Structure always comes from the canonical forest: every canonical node is
//! emitted once, in canonical order, and persisted nodes whose identity no
//! longer exists are dropped. User state comes from the persisted node with the
//! same identity, when there is one. Persisted order is never used.
//!
//! ```rust
//! use study_tracker_core::reconcile::reconcile;
//! use study_tracker_core::roadmap_model::Topic;
//!
//! let canonical = vec![Topic::new("t1", "Arrays")];
//! let merged = reconcile(&canonical, Some(r#"[{"id":"t1","isExpanded":true}]"#));
//! assert!(merged[0].is_expanded);
//!
//! // Corrupted data falls back to the canonical forest.
//! assert_eq!(reconcile(&canonical, Some("not json")), canonical);
//! ```

use log::{info, warn};

use crate::config::{IdentityPolicy, TrackerConfig, ValidationMode};
use crate::merge_policy::{merge_problem, merge_scalar};
use crate::roadmap_model::{Problem, SubTopic, Topic};
use crate::snapshot::{
    parse_snapshot, PersistedProblem, PersistedSubTopic, PersistedTopic, SnapshotError,
};
use crate::store::SnapshotStore;

/// What happened to the persisted payload during reconciliation.
#[derive(Debug)]
pub enum ReconcileOutcome {
    /// Nothing was persisted; the canonical forest was used as-is.
    Fresh,
    /// The payload was valid and merged. `persisted_topics` counts the usable
    /// persisted topics, matched or not.
    Merged { persisted_topics: usize },
    /// The payload was rejected and must be cleared from the store.
    Discarded(SnapshotError),
}

#[derive(Debug)]
pub struct Reconciliation {
    pub forest: Vec<Topic>,
    pub outcome: ReconcileOutcome,
}

/// Reconciler configured with a validation depth and a problem identity policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciler {
    pub validation: ValidationMode,
    pub identity: IdentityPolicy,
}

impl Reconciler {
    pub fn new(validation: ValidationMode, identity: IdentityPolicy) -> Self {
        Self { validation, identity }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.validation, config.identity)
    }

    /// Merges `canonical` with a raw persisted payload.
    ///
    /// An absent or empty payload is a fresh start. A payload that fails
    /// validation yields the canonical forest and a
    /// [`ReconcileOutcome::Discarded`] outcome; this never panics.
    pub fn reconcile(&self, canonical: &[Topic], raw: Option<&str>) -> Reconciliation {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                return Reconciliation {
                    forest: canonical.to_vec(),
                    outcome: ReconcileOutcome::Fresh,
                }
            }
        };

        match parse_snapshot(raw, self.validation) {
            Ok(persisted) => Reconciliation {
                forest: self.reconcile_forest(canonical, &persisted),
                outcome: ReconcileOutcome::Merged {
                    persisted_topics: persisted.len(),
                },
            },
            Err(e) => Reconciliation {
                forest: canonical.to_vec(),
                outcome: ReconcileOutcome::Discarded(e),
            },
        }
    }

    pub fn reconcile_forest(
        &self,
        canonical: &[Topic],
        persisted: &[PersistedTopic],
    ) -> Vec<Topic> {
        canonical
            .iter()
            .map(|topic| self.reconcile_topic(topic, persisted))
            .collect()
    }

    pub fn reconcile_topic(
        &self,
        canonical: &Topic,
        persisted_siblings: &[PersistedTopic],
    ) -> Topic {
        let Some(saved) = persisted_siblings.iter().find(|t| t.id == canonical.id) else {
            return canonical.clone();
        };
        let saved_sub_topics = saved.sub_topics.as_deref().unwrap_or_default();

        Topic {
            id: canonical.id.clone(),
            title: canonical.title.clone(),
            description: canonical.description.clone(),
            is_expanded: merge_scalar(saved.is_expanded, canonical.is_expanded),
            sub_topics: canonical
                .sub_topics
                .iter()
                .map(|sub| self.reconcile_sub_topic(sub, saved_sub_topics))
                .collect(),
        }
    }

    pub fn reconcile_sub_topic(
        &self,
        canonical: &SubTopic,
        persisted_siblings: &[PersistedSubTopic],
    ) -> SubTopic {
        let Some(saved) = persisted_siblings.iter().find(|s| s.id == canonical.id) else {
            return canonical.clone();
        };
        let saved_problems = saved.leetcode_problems.as_deref().unwrap_or_default();

        SubTopic {
            id: canonical.id.clone(),
            title: canonical.title.clone(),
            resources: canonical.resources.clone(),
            leetcode_problems: canonical
                .leetcode_problems
                .iter()
                .map(|problem| self.reconcile_problem(problem, saved_problems))
                .collect(),
            notes: saved.notes.clone().unwrap_or_else(|| canonical.notes.clone()),
            completed: merge_scalar(saved.completed, canonical.completed),
        }
    }

    pub fn reconcile_problem(
        &self,
        canonical: &Problem,
        persisted_siblings: &[PersistedProblem],
    ) -> Problem {
        merge_problem(canonical, self.find_problem(canonical, persisted_siblings))
    }

    /// First persisted sibling with the canonical problem's identity.
    fn find_problem<'a>(
        &self,
        canonical: &Problem,
        persisted: &'a [PersistedProblem],
    ) -> Option<&'a PersistedProblem> {
        let by_id = persisted.iter().find(|p| p.has_id(&canonical.id));
        match self.identity {
            IdentityPolicy::Id => by_id,
            IdentityPolicy::IdThenLegacyName => {
                by_id.or_else(|| persisted.iter().find(|p| p.has_legacy_name(&canonical.name)))
            }
        }
    }
}

/// Reconciles with the default policy and returns only the merged forest.
pub fn reconcile(canonical: &[Topic], raw: Option<&str>) -> Vec<Topic> {
    Reconciler::default().reconcile(canonical, raw).forest
}

/// Reads the store, reconciles, and clears the store if its payload was rejected.
///
/// Store failures are logged and treated as a fresh start; the store is only
/// cleared when its payload was actually read and found invalid.
pub fn initialize_roadmap<S: SnapshotStore + ?Sized>(
    canonical: &[Topic],
    store: &mut S,
    reconciler: &Reconciler,
) -> Reconciliation {
    let raw = match store.read() {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Could not read persisted roadmap, starting from canonical data: {e}");
            None
        }
    };

    let reconciliation = reconciler.reconcile(canonical, raw.as_deref());

    match &reconciliation.outcome {
        ReconcileOutcome::Fresh => info!("No persisted roadmap found, starting fresh"),
        ReconcileOutcome::Merged { persisted_topics } => {
            info!(
                "Merged persisted roadmap ({} persisted topics) into {} canonical topics",
                persisted_topics,
                canonical.len()
            );
        }
        ReconcileOutcome::Discarded(e) => {
            warn!("Failed to parse or merge persisted roadmap: {e}");
            if let Err(clear_err) = store.clear() {
                warn!("Failed to clear corrupted roadmap: {clear_err}");
            }
        }
    }

    reconciliation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap_model::{Difficulty, ProblemStatus};
    use crate::store::MemoryStore;

    fn problem(id: &str, name: &str) -> Problem {
        Problem::canonical("t1", "s1", id, name, "", Difficulty::Medium, vec![])
    }

    fn forest() -> Vec<Topic> {
        let mut sub = SubTopic::new("s1", "Sub");
        sub.leetcode_problems = vec![problem("p1", "One"), problem("p2", "Two")];
        let mut topic = Topic::new("t1", "Topic");
        topic.sub_topics = vec![sub];
        vec![topic]
    }

    #[test]
    fn empty_payload_is_a_fresh_start() {
        let result = Reconciler::default().reconcile(&forest(), Some(""));
        assert!(matches!(result.outcome, ReconcileOutcome::Fresh));
        assert_eq!(result.forest, forest());
    }

    #[test]
    fn canonical_order_wins_over_persisted_order() {
        let raw = r#"[{"id":"t1","subTopics":[{"id":"s1","leetcodeProblems":[
            {"id":"p2","status":"Stuck"},{"id":"p1","status":"Solved"}
        ]}]}]"#;
        let merged = reconcile(&forest(), Some(raw));
        let problems = &merged[0].sub_topics[0].leetcode_problems;

        assert_eq!(problems[0].id, "p1");
        assert_eq!(problems[0].status, ProblemStatus::Solved);
        assert_eq!(problems[1].status, ProblemStatus::Stuck);
    }

    #[test]
    fn duplicate_persisted_ids_take_the_first_match() {
        let raw = r#"[{"id":"t1","subTopics":[{"id":"s1","leetcodeProblems":[
            {"id":"p1","status":"Solved"},{"id":"p1","status":"Skipped"}
        ]}]}]"#;
        let merged = reconcile(&forest(), Some(raw));
        assert_eq!(merged[0].sub_topics[0].leetcode_problems[0].status, ProblemStatus::Solved);
    }

    #[test]
    fn legacy_name_matching_is_opt_in() {
        let raw = r#"[{"id":"t1","subTopics":[{"id":"s1","leetcodeProblems":[
            {"name":"Two","status":"Attempted"}
        ]}]}]"#;

        let by_id = Reconciler::default().reconcile(&forest(), Some(raw)).forest;
        assert_eq!(by_id[0].sub_topics[0].leetcode_problems[1].status, ProblemStatus::NotStarted);

        let legacy = Reconciler::new(ValidationMode::Shallow, IdentityPolicy::IdThenLegacyName)
            .reconcile(&forest(), Some(raw))
            .forest;
        assert_eq!(legacy[0].sub_topics[0].leetcode_problems[1].status, ProblemStatus::Attempted);
    }

    #[test]
    fn sub_topic_without_problem_list_keeps_canonical_problems() {
        let raw = r#"[{"id":"t1","subTopics":[{"id":"s1","notes":"remember"}]}]"#;
        let merged = reconcile(&forest(), Some(raw));

        assert_eq!(merged[0].sub_topics[0].notes, "remember");
        assert_eq!(
            merged[0].sub_topics[0].leetcode_problems,
            forest()[0].sub_topics[0].leetcode_problems
        );
    }

    #[test]
    fn initialize_clears_rejected_payload() {
        let mut store = MemoryStore::with_payload("{\"broken\":");
        let result = initialize_roadmap(&forest(), &mut store, &Reconciler::default());

        assert!(matches!(result.outcome, ReconcileOutcome::Discarded(SnapshotError::Parse(_))));
        assert_eq!(result.forest, forest());
        assert_eq!(store.payload(), None);
    }

    #[test]
    fn initialize_keeps_valid_payload() {
        let mut store = MemoryStore::with_payload(r#"[{"id":"t1","isExpanded":true}]"#);
        let result = initialize_roadmap(&forest(), &mut store, &Reconciler::default());

        assert!(matches!(result.outcome, ReconcileOutcome::Merged { persisted_topics: 1 }));
        assert!(result.forest[0].is_expanded);
        assert!(store.payload().is_some());
    }
}
