//! Text and difficulty filtering of the merged roadmap for display.
//!
//! Filtering produces a view; it never feeds back into the stored forest.

use serde::{Deserialize, Serialize};

use crate::roadmap_model::{Difficulty, SubTopic, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DifficultyFilter {
    #[default]
    All,
    Easy,
    Medium,
    Hard,
}

impl DifficultyFilter {
    pub const ALL: [DifficultyFilter; 4] = [
        DifficultyFilter::All,
        DifficultyFilter::Easy,
        DifficultyFilter::Medium,
        DifficultyFilter::Hard,
    ];

    pub fn accepts(&self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Easy => difficulty == Difficulty::Easy,
            DifficultyFilter::Medium => difficulty == Difficulty::Medium,
            DifficultyFilter::Hard => difficulty == Difficulty::Hard,
        }
    }
}

/// Filters `forest` by problem difficulty and a case-insensitive search term.
///
/// The difficulty filter drops non-matching problems. With a non-blank search
/// term, a sub-topic survives if its title or any remaining problem's name or
/// custom tag matches; a topic survives if its title matches or any sub-topic
/// survived, and is shown expanded.
pub fn filter_roadmap(forest: &[Topic], search: &str, difficulty: DifficultyFilter) -> Vec<Topic> {
    let needle = search.trim().to_lowercase();

    forest
        .iter()
        .filter_map(|topic| {
            let sub_topics: Vec<SubTopic> = topic
                .sub_topics
                .iter()
                .map(|sub| SubTopic {
                    leetcode_problems: sub
                        .leetcode_problems
                        .iter()
                        .filter(|p| difficulty.accepts(p.difficulty))
                        .cloned()
                        .collect(),
                    ..sub.clone()
                })
                .collect();

            if needle.is_empty() {
                return Some(Topic {
                    sub_topics,
                    ..topic.clone()
                });
            }

            let matching: Vec<SubTopic> = sub_topics
                .into_iter()
                .filter(|sub| sub_topic_matches(sub, &needle))
                .collect();

            if contains(&topic.title, &needle) || !matching.is_empty() {
                Some(Topic {
                    sub_topics: matching,
                    is_expanded: true,
                    ..topic.clone()
                })
            } else {
                None
            }
        })
        .collect()
}

fn sub_topic_matches(sub: &SubTopic, needle: &str) -> bool {
    contains(&sub.title, needle)
        || sub.leetcode_problems.iter().any(|p| {
            contains(&p.name, needle) || p.custom_tags.iter().any(|tag| contains(tag, needle))
        })
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap_model::Problem;

    fn forest() -> Vec<Topic> {
        let mut easy = Problem::canonical("t1", "s1", "p1", "Two Sum", "", Difficulty::Easy, vec![]);
        easy.custom_tags = vec!["Interview".to_string()];
        let hard = Problem::canonical("t1", "s1", "p2", "Median", "", Difficulty::Hard, vec![]);

        let mut s1 = SubTopic::new("s1", "Hashing");
        s1.leetcode_problems = vec![easy, hard];
        let mut t1 = Topic::new("t1", "Arrays");
        t1.sub_topics = vec![s1, SubTopic::new("s2", "Prefix Sums")];

        vec![t1, Topic::new("t2", "Graphs")]
    }

    #[test]
    fn no_filters_is_identity() {
        assert_eq!(filter_roadmap(&forest(), "  ", DifficultyFilter::All), forest());
    }

    #[test]
    fn difficulty_filter_drops_problems_but_keeps_structure() {
        let filtered = filter_roadmap(&forest(), "", DifficultyFilter::Hard);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].sub_topics[0].leetcode_problems.len(), 1);
        assert_eq!(filtered[0].sub_topics[0].leetcode_problems[0].id, "p2");
    }

    #[test]
    fn search_matches_custom_tags_and_expands_topic() {
        let filtered = filter_roadmap(&forest(), "interview", DifficultyFilter::All);
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].is_expanded);
        assert_eq!(filtered[0].sub_topics.len(), 1);
        assert_eq!(filtered[0].sub_topics[0].id, "s1");
    }

    #[test]
    fn topic_title_match_keeps_topic_with_no_sub_topics() {
        let filtered = filter_roadmap(&forest(), "GRAPH", DifficultyFilter::All);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "t2");
    }

    #[test]
    fn search_sees_only_problems_left_by_difficulty() {
        let filtered = filter_roadmap(&forest(), "two sum", DifficultyFilter::Hard);
        assert!(filtered.is_empty());
    }
}
