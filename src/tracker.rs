//! A running tracker session: the merged roadmap plus the store it persists to.
//!
//! [`Tracker::open`] reconciles exactly once. After that the tracker owns the
//! forest; each mutation swaps in the new forest and writes it back. A failed
//! write is reported to the caller but never rolls back the in-memory state.

use log::{info, warn};

use crate::app_response::AppResponse;
use crate::config::TrackerConfig;
use crate::local_db_state::AppDbState;
use crate::mutation;
use crate::progress::{roadmap_progress, RoadmapProgress};
use crate::reconcile::{initialize_roadmap, Reconciler};
use crate::roadmap_model::{Problem, Topic};
use crate::store::SnapshotStore;

pub struct Tracker<S: SnapshotStore = AppDbState> {
    canonical: Vec<Topic>,
    roadmap: Vec<Topic>,
    store: S,
}

impl Tracker<AppDbState> {
    /// Opens the LMDB store named by `config` and reconciles `canonical` against it.
    pub fn open_lmdb(canonical: Vec<Topic>, config: &TrackerConfig) -> Result<Self, AppResponse> {
        let store = AppDbState::open(config)?;
        Ok(Self::open(canonical, store, &Reconciler::from_config(config)))
    }
}

impl<S: SnapshotStore> Tracker<S> {
    /// Reconciles `canonical` with whatever `store` holds and writes the
    /// merged roadmap back, so the slot always matches the current schema.
    pub fn open(canonical: Vec<Topic>, mut store: S, reconciler: &Reconciler) -> Self {
        let reconciliation = initialize_roadmap(&canonical, &mut store, reconciler);
        let mut tracker = Self {
            canonical,
            roadmap: reconciliation.forest,
            store,
        };
        if let Err(e) = tracker.persist() {
            warn!("Initial roadmap write failed: {e}");
        }
        tracker
    }

    pub fn roadmap(&self) -> &[Topic] {
        &self.roadmap
    }

    pub fn canonical(&self) -> &[Topic] {
        &self.canonical
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn find_problem(&self, problem_id: &str) -> Option<&Problem> {
        mutation::find_problem(&self.roadmap, problem_id)
    }

    pub fn progress(&self) -> RoadmapProgress {
        roadmap_progress(&self.roadmap)
    }

    pub fn toggle_topic(&mut self, topic_id: &str) -> Result<(), AppResponse> {
        let next = mutation::toggle_topic(&self.roadmap, topic_id);
        self.commit(next)
    }

    pub fn toggle_sub_topic_completion(
        &mut self,
        topic_id: &str,
        sub_topic_id: &str,
    ) -> Result<(), AppResponse> {
        let next = mutation::toggle_sub_topic_completion(&self.roadmap, topic_id, sub_topic_id);
        self.commit(next)
    }

    pub fn update_sub_topic_notes(
        &mut self,
        topic_id: &str,
        sub_topic_id: &str,
        notes: &str,
    ) -> Result<(), AppResponse> {
        let next = mutation::update_sub_topic_notes(&self.roadmap, topic_id, sub_topic_id, notes);
        self.commit(next)
    }

    pub fn save_problem_details(
        &mut self,
        topic_id: &str,
        sub_topic_id: &str,
        problem_id: &str,
        updated: &Problem,
    ) -> Result<(), AppResponse> {
        let next =
            mutation::save_problem_details(&self.roadmap, topic_id, sub_topic_id, problem_id, updated);
        self.commit(next)
    }

    pub fn save_problem_by_id(&mut self, updated: &Problem) -> Result<(), AppResponse> {
        let next = mutation::save_problem_by_id(&self.roadmap, updated);
        self.commit(next)
    }

    /// Drops all user progress: clears the slot and starts over from canonical data.
    pub fn reset_progress(&mut self) -> Result<(), AppResponse> {
        self.store.clear()?;
        info!("User progress reset to canonical roadmap");
        let fresh = self.canonical.clone();
        self.commit(fresh)
    }

    /// Serializes the current roadmap into the store.
    pub fn persist(&mut self) -> Result<(), AppResponse> {
        let payload = serde_json::to_string(&self.roadmap)?;
        self.store.write(&payload)
    }

    fn commit(&mut self, next: Vec<Topic>) -> Result<(), AppResponse> {
        self.roadmap = next;
        self.persist().map_err(|e| {
            warn!("Failed to persist roadmap: {e}");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap_model::{Difficulty, ProblemStatus, ProgrammingLanguage, SubTopic};
    use crate::store::MemoryStore;

    fn canonical() -> Vec<Topic> {
        let mut sub = SubTopic::new("s1", "Sub");
        sub.leetcode_problems =
            vec![Problem::canonical("t1", "s1", "p1", "One", "", Difficulty::Easy, vec![])];
        let mut topic = Topic::new("t1", "Topic");
        topic.sub_topics = vec![sub];
        vec![topic]
    }

    #[test]
    fn open_writes_the_merged_roadmap_back() {
        let tracker = Tracker::open(canonical(), MemoryStore::new(), &Reconciler::default());
        let stored: Vec<Topic> = serde_json::from_str(tracker.store().payload().unwrap()).unwrap();
        assert_eq!(stored, canonical());
    }

    #[test]
    fn every_mutation_is_persisted() {
        let mut tracker = Tracker::open(canonical(), MemoryStore::new(), &Reconciler::default());
        let writes = tracker.store().writes();

        tracker.toggle_topic("t1").unwrap();
        tracker.toggle_sub_topic_completion("t1", "s1").unwrap();
        tracker.update_sub_topic_notes("t1", "s1", "notes").unwrap();
        assert_eq!(tracker.store().writes(), writes + 3);

        let reopened = Tracker::open(canonical(), tracker.into_store(), &Reconciler::default());
        assert!(reopened.roadmap()[0].is_expanded);
        assert!(reopened.roadmap()[0].sub_topics[0].completed);
        assert_eq!(reopened.roadmap()[0].sub_topics[0].notes, "notes");
    }

    #[test]
    fn problem_edits_survive_a_restart() {
        let mut tracker = Tracker::open(canonical(), MemoryStore::new(), &Reconciler::default());
        let mut edited = tracker.find_problem("p1").unwrap().clone();
        edited.status = ProblemStatus::Solved;
        tracker.save_problem_by_id(&edited).unwrap();

        let reopened = Tracker::open(canonical(), tracker.into_store(), &Reconciler::default());
        assert_eq!(reopened.find_problem("p1").unwrap().status, ProblemStatus::Solved);
        assert_eq!(reopened.progress().solved_problems, 1);
    }

    #[test]
    fn one_malformed_entry_does_not_wipe_its_collection() {
        let raw = r#"[{"id":"t1","subTopics":[{"id":"s1","leetcodeProblems":[{
            "id":"p1",
            "status":"Solved",
            "currentLanguage":"python",
            "userSolutions":{"python":"def solve(): return 42","java":null},
            "attempts":[
                {"id":"a1","date":"2024-01-01","result":"pass"},
                {"id":2,"date":"2024-01-02","result":"fail"}
            ]
        }]}]}]"#;
        let store = MemoryStore::with_payload(raw);
        let tracker = Tracker::open(canonical(), store, &Reconciler::default());

        let reopened = Tracker::open(canonical(), tracker.into_store(), &Reconciler::default());
        let p1 = reopened.find_problem("p1").unwrap();
        assert_eq!(p1.status, ProblemStatus::Solved);
        assert_eq!(p1.solution_for(ProgrammingLanguage::Python), Some("def solve(): return 42"));
        assert_eq!(p1.current_language, ProgrammingLanguage::Python);
        assert_eq!(p1.attempts.len(), 1);
        assert_eq!(p1.attempts[0].id, "a1");
    }

    #[test]
    fn reset_progress_returns_to_canonical() {
        let mut tracker = Tracker::open(canonical(), MemoryStore::new(), &Reconciler::default());
        tracker.toggle_topic("t1").unwrap();
        tracker.reset_progress().unwrap();

        assert_eq!(tracker.roadmap(), canonical().as_slice());
        let reopened = Tracker::open(canonical(), tracker.into_store(), &Reconciler::default());
        assert!(!reopened.roadmap()[0].is_expanded);
    }

    #[test]
    fn corrupted_store_is_replaced_with_a_clean_snapshot() {
        let store = MemoryStore::with_payload("][");
        let tracker = Tracker::open(canonical(), store, &Reconciler::default());
        assert_eq!(tracker.roadmap(), canonical().as_slice());

        let stored: Vec<Topic> = serde_json::from_str(tracker.store().payload().unwrap()).unwrap();
        assert_eq!(stored, canonical());
    }
}
