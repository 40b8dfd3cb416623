//! Progress figures derived from the merged roadmap.

use serde::Serialize;

use crate::roadmap_model::Topic;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
    pub topic_id: String,
    pub completed_sub_topics: usize,
    pub total_sub_topics: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapProgress {
    pub topics: Vec<TopicProgress>,
    pub solved_problems: usize,
    pub total_problems: usize,
}

pub fn topic_progress(topic: &Topic) -> TopicProgress {
    let total = topic.sub_topics.len();
    let completed = topic.sub_topics.iter().filter(|s| s.completed).count();

    TopicProgress {
        topic_id: topic.id.clone(),
        completed_sub_topics: completed,
        total_sub_topics: total,
        percentage: if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        },
    }
}

pub fn roadmap_progress(forest: &[Topic]) -> RoadmapProgress {
    let problems = || {
        forest
            .iter()
            .flat_map(|t| &t.sub_topics)
            .flat_map(|s| &s.leetcode_problems)
    };

    RoadmapProgress {
        topics: forest.iter().map(topic_progress).collect(),
        solved_problems: problems().filter(|p| p.status.is_solved()).count(),
        total_problems: problems().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap_model::{Difficulty, Problem, ProblemStatus, SubTopic};

    #[test]
    fn empty_topic_reports_zero_percent() {
        let progress = topic_progress(&Topic::new("t", "T"));
        assert_eq!(progress.total_sub_topics, 0);
        assert_eq!(progress.percentage, 0.0);
    }

    #[test]
    fn counts_completed_sub_topics_and_solved_problems() {
        let mut done = SubTopic::new("s1", "Done");
        done.completed = true;
        let mut solved = Problem::canonical("t", "s1", "p1", "P1", "", Difficulty::Easy, vec![]);
        solved.status = ProblemStatus::SolvedWithHelp;
        done.leetcode_problems = vec![
            solved,
            Problem::canonical("t", "s1", "p2", "P2", "", Difficulty::Easy, vec![]),
        ];

        let mut topic = Topic::new("t", "T");
        topic.sub_topics = vec![done, SubTopic::new("s2", "Open"), SubTopic::new("s3", "Open")];

        let progress = roadmap_progress(&[topic]);
        assert_eq!(progress.topics[0].completed_sub_topics, 1);
        assert!((progress.topics[0].percentage - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(progress.solved_problems, 1);
        assert_eq!(progress.total_problems, 2);
    }
}
