//! State transitions over the merged roadmap.
//!
//! Every operation takes the current forest and returns a new one with only
//! the targeted node replaced. Keys that do not resolve leave the forest
//! unchanged; that is not an error. With duplicate ids the first match is
//! the one updated.

use crate::roadmap_model::{Problem, SubTopic, Topic};

pub fn toggle_topic(forest: &[Topic], topic_id: &str) -> Vec<Topic> {
    replace_first(forest, |t| t.id == topic_id, |topic| Topic {
        is_expanded: !topic.is_expanded,
        ..topic.clone()
    })
}

pub fn toggle_sub_topic_completion(
    forest: &[Topic],
    topic_id: &str,
    sub_topic_id: &str,
) -> Vec<Topic> {
    update_sub_topic(forest, topic_id, sub_topic_id, |sub| SubTopic {
        completed: !sub.completed,
        ..sub.clone()
    })
}

pub fn update_sub_topic_notes(
    forest: &[Topic],
    topic_id: &str,
    sub_topic_id: &str,
    notes: &str,
) -> Vec<Topic> {
    update_sub_topic(forest, topic_id, sub_topic_id, |sub| SubTopic {
        notes: notes.to_string(),
        ..sub.clone()
    })
}

/// Replaces a problem record with the one committed by the problem editor.
///
/// The record's `id`, `topic_id` and `sub_topic_id` are pinned to the target
/// so an edit can never move or re-identify a node.
pub fn save_problem_details(
    forest: &[Topic],
    topic_id: &str,
    sub_topic_id: &str,
    problem_id: &str,
    updated: &Problem,
) -> Vec<Topic> {
    update_sub_topic(forest, topic_id, sub_topic_id, |sub| SubTopic {
        leetcode_problems: replace_first(
            &sub.leetcode_problems,
            |p| p.id == problem_id,
            |current| Problem {
                id: current.id.clone(),
                topic_id: current.topic_id.clone(),
                sub_topic_id: current.sub_topic_id.clone(),
                ..updated.clone()
            },
        ),
        ..sub.clone()
    })
}

/// Replaces a problem located by `updated.id` anywhere in the forest.
pub fn save_problem_by_id(forest: &[Topic], updated: &Problem) -> Vec<Topic> {
    match locate_problem(forest, &updated.id) {
        Some((topic_id, sub_topic_id)) => {
            save_problem_details(forest, &topic_id, &sub_topic_id, &updated.id, updated)
        }
        None => forest.to_vec(),
    }
}

pub fn find_problem<'a>(forest: &'a [Topic], problem_id: &str) -> Option<&'a Problem> {
    forest
        .iter()
        .flat_map(|t| &t.sub_topics)
        .flat_map(|s| &s.leetcode_problems)
        .find(|p| p.id == problem_id)
}

fn locate_problem(forest: &[Topic], problem_id: &str) -> Option<(String, String)> {
    forest.iter().find_map(|topic| {
        topic
            .sub_topics
            .iter()
            .find(|sub| sub.leetcode_problems.iter().any(|p| p.id == problem_id))
            .map(|sub| (topic.id.clone(), sub.id.clone()))
    })
}

fn update_sub_topic(
    forest: &[Topic],
    topic_id: &str,
    sub_topic_id: &str,
    update: impl FnOnce(&SubTopic) -> SubTopic,
) -> Vec<Topic> {
    replace_first(forest, |t| t.id == topic_id, |topic| Topic {
        sub_topics: replace_first(&topic.sub_topics, |s| s.id == sub_topic_id, update),
        ..topic.clone()
    })
}

fn replace_first<T: Clone>(
    items: &[T],
    matches: impl Fn(&T) -> bool,
    update: impl FnOnce(&T) -> T,
) -> Vec<T> {
    let mut next = items.to_vec();
    if let Some(slot) = next.iter_mut().find(|item| matches(item)) {
        let replacement = update(slot);
        *slot = replacement;
    }
    next
}
