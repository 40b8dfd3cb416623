//! Canonical roadmap content.
//!
//! The catalog is authored here as typed data. [`ProblemDef`] fills in the
//! fresh-start defaults (status "Not Started", starter code for each editor
//! language, empty progress collections) so every canonical problem is fully
//! populated.

use std::collections::{BTreeMap, HashSet};

use crate::roadmap_model::{
    Difficulty, Problem, ProblemStatus, ProgrammingLanguage, Resource, SubTopic, TestCase, Topic,
};

/// Authoring-time description of one canonical problem.
#[derive(Debug, Clone)]
pub struct ProblemDef {
    id: &'static str,
    name: &'static str,
    url: &'static str,
    difficulty: Difficulty,
    tags: &'static [&'static str],
    description: &'static str,
    notes: &'static str,
    status: ProblemStatus,
    solutions: BTreeMap<String, String>,
    test_cases: Vec<TestCase>,
}

impl ProblemDef {
    pub fn new(
        id: &'static str,
        name: &'static str,
        url: &'static str,
        difficulty: Difficulty,
        tags: &'static [&'static str],
    ) -> Self {
        Self {
            id,
            name,
            url,
            difficulty,
            tags,
            description: "",
            notes: "",
            status: ProblemStatus::NotStarted,
            solutions: BTreeMap::new(),
            test_cases: Vec::new(),
        }
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn notes(mut self, notes: &'static str) -> Self {
        self.notes = notes;
        self
    }

    pub fn status(mut self, status: ProblemStatus) -> Self {
        self.status = status;
        self
    }

    pub fn solution(mut self, language: ProgrammingLanguage, code: &str) -> Self {
        self.solutions.insert(language.key().to_string(), code.to_string());
        self
    }

    pub fn example(mut self, id: &str, input: &str, expected_output: &str) -> Self {
        self.test_cases.push(TestCase {
            id: id.to_string(),
            input: input.to_string(),
            expected_output: expected_output.to_string(),
            description: None,
            is_example: Some(true),
        });
        self
    }

    pub fn build(self, topic_id: &str, sub_topic_id: &str) -> Problem {
        let mut problem = Problem::canonical(
            topic_id,
            sub_topic_id,
            self.id,
            self.name,
            self.url,
            self.difficulty,
            self.tags.iter().map(|t| t.to_string()).collect(),
        );
        problem.status = self.status;
        problem.description = self.description.to_string();
        problem.problem_specific_notes = self.notes.to_string();
        problem.test_cases = self.test_cases;
        problem.user_solutions = if self.solutions.is_empty() {
            starter_solutions(self.name)
        } else {
            self.solutions
        };
        problem
    }
}

/// Placeholder code shown in the editor before the user writes anything.
pub fn starter_solutions(problem_name: &str) -> BTreeMap<String, String> {
    ProgrammingLanguage::ALL
        .iter()
        .map(|language| {
            let code = match language {
                ProgrammingLanguage::Javascript => format!("// Start JavaScript for {problem_name}"),
                ProgrammingLanguage::Python => format!("# Start Python for {problem_name}"),
                ProgrammingLanguage::Java => format!(
                    "// Start Java for {problem_name}\nclass Solution {{\n    // Code for {problem_name}\n}}"
                ),
            };
            (language.key().to_string(), code)
        })
        .collect()
}

fn sub_topic(
    topic_id: &str,
    id: &str,
    title: &str,
    resources: &[(&str, &str)],
    problems: Vec<ProblemDef>,
) -> SubTopic {
    let mut sub = SubTopic::new(id, title);
    sub.resources = resources
        .iter()
        .map(|(name, url)| Resource {
            name: name.to_string(),
            url: url.to_string(),
        })
        .collect();
    sub.leetcode_problems = problems.into_iter().map(|p| p.build(topic_id, id)).collect();
    sub
}

fn topic(
    id: &str,
    title: &str,
    description: &str,
    is_expanded: bool,
    sub_topics: Vec<SubTopic>,
) -> Topic {
    Topic {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        is_expanded,
        sub_topics,
    }
}

/// Child ids that repeat within one parent, as `parent/child` paths.
///
/// Canonical content must return an empty list; the merge does not guard
/// against duplicates.
pub fn duplicate_ids(forest: &[Topic]) -> Vec<String> {
    let mut duplicates = Vec::new();
    let mut topic_ids = HashSet::new();

    for topic in forest {
        if !topic_ids.insert(topic.id.as_str()) {
            duplicates.push(topic.id.clone());
        }
        let mut sub_ids = HashSet::new();
        for sub in &topic.sub_topics {
            if !sub_ids.insert(sub.id.as_str()) {
                duplicates.push(format!("{}/{}", topic.id, sub.id));
            }
            let mut problem_ids = HashSet::new();
            for problem in &sub.leetcode_problems {
                if !problem_ids.insert(problem.id.as_str()) {
                    duplicates.push(format!("{}/{}/{}", topic.id, sub.id, problem.id));
                }
            }
        }
    }

    duplicates
}

/// The roadmap shipped with the application.
pub fn initial_roadmap() -> Vec<Topic> {
    use crate::roadmap_model::Difficulty::{Easy, Hard, Medium};
    use crate::roadmap_model::ProgrammingLanguage::{Java, Javascript, Python};

    vec![
        topic(
            "arrays_hashing",
            "Arrays & Hashing",
            "Fundamental data structures. Learn to manipulate arrays and use hash tables for efficient lookups.",
            true,
            vec![
                sub_topic(
                    "arrays_hashing",
                    "arrays_hashing_intro",
                    "Introduction to Arrays & Hashing",
                    &[
                        ("GeeksforGeeks: Arrays", "https://www.geeksforgeeks.org/array-data-structure/"),
                        ("Wikipedia: Hash Table", "https://en.wikipedia.org/wiki/Hash_table"),
                    ],
                    vec![
                        ProblemDef::new(
                            "lc217",
                            "Contains Duplicate",
                            "https://leetcode.com/problems/contains-duplicate/",
                            Easy,
                            &["Array", "Hash Table", "Sorting"],
                        )
                        .description("Given an integer array nums, return true if any value appears at least twice.")
                        .notes("Use a HashSet for O(n) time complexity.")
                        .solution(Javascript, "// Specific JavaScript code for Contains Duplicate")
                        .solution(Python, "# Specific Python code for Contains Duplicate")
                        .solution(
                            Java,
                            "// Specific Java code for Contains Duplicate\nclass Solution {\n    public boolean containsDuplicate(int[] nums) {\n        // Implement here\n    }\n}",
                        )
                        .example("tc217-1", "nums = [1,2,3,1]", "true")
                        .example("tc217-2", "nums = [1,2,3,4]", "false"),
                        ProblemDef::new(
                            "lc242",
                            "Valid Anagram",
                            "https://leetcode.com/problems/valid-anagram/",
                            Easy,
                            &["Hash Table", "String", "Sorting"],
                        )
                        .description("Given two strings s and t, return true if t is an anagram of s.")
                        .example("tc242-1", r#"s = "anagram", t = "nagaram""#, "true")
                        .example("tc242-2", r#"s = "rat", t = "car""#, "false"),
                        ProblemDef::new(
                            "lc1",
                            "Two Sum",
                            "https://leetcode.com/problems/two-sum/",
                            Easy,
                            &["Array", "Hash Table"],
                        ),
                        ProblemDef::new(
                            "lc49",
                            "Group Anagrams",
                            "https://leetcode.com/problems/group-anagrams/",
                            Medium,
                            &["Array", "Hash Table", "String"],
                        ),
                    ],
                ),
                sub_topic(
                    "arrays_hashing",
                    "arrays_hashing_two_pointers",
                    "Two Pointers",
                    &[(
                        "TopCoder: Two Pointers Technique",
                        "https://www.topcoder.com/thrive/articles/Two%20Pointers%20Technique",
                    )],
                    vec![
                        ProblemDef::new(
                            "lc125",
                            "Valid Palindrome",
                            "https://leetcode.com/problems/valid-palindrome/",
                            Easy,
                            &["Two Pointers", "String"],
                        )
                        .description("A phrase is a palindrome if, after converting all uppercase letters into lowercase letters and removing non-alphanumeric characters, it reads the same forward and backward.")
                        .example("tc125-1", r#"s = "A man, a plan, a canal: Panama""#, "true"),
                        ProblemDef::new(
                            "lc15",
                            "3Sum",
                            "https://leetcode.com/problems/3sum/",
                            Medium,
                            &["Array", "Two Pointers"],
                        ),
                        ProblemDef::new(
                            "lc11",
                            "Container With Most Water",
                            "https://leetcode.com/problems/container-with-most-water/",
                            Medium,
                            &["Array", "Two Pointers"],
                        ),
                    ],
                ),
            ],
        ),
        topic(
            "sliding_window",
            "Sliding Window",
            "Optimize solutions for problems involving contiguous subarrays or substrings.",
            false,
            vec![sub_topic(
                "sliding_window",
                "sliding_window_intro",
                "Introduction to Sliding Window",
                &[("GeeksforGeeks: Sliding Window", "https://www.geeksforgeeks.org/window-sliding-technique/")],
                vec![
                    ProblemDef::new(
                        "lc121",
                        "Best Time to Buy and Sell Stock",
                        "https://leetcode.com/problems/best-time-to-buy-and-sell-stock/",
                        Easy,
                        &["Array", "Sliding Window"],
                    ),
                    ProblemDef::new(
                        "lc3",
                        "Longest Substring Without Repeating Characters",
                        "https://leetcode.com/problems/longest-substring-without-repeating-characters/",
                        Medium,
                        &["Hash Table", "String", "Sliding Window"],
                    ),
                ],
            )],
        ),
        topic(
            "stack",
            "Stack",
            "LIFO data structure. Useful for parsing, expression evaluation, and backtracking problems.",
            false,
            vec![sub_topic(
                "stack",
                "stack_intro",
                "Understanding Stacks",
                &[("Programiz: Stack", "https://www.programiz.com/dsa/stack")],
                vec![
                    ProblemDef::new(
                        "lc20",
                        "Valid Parentheses",
                        "https://leetcode.com/problems/valid-parentheses/",
                        Easy,
                        &["Stack", "String"],
                    ),
                    ProblemDef::new(
                        "lc155",
                        "Min Stack",
                        "https://leetcode.com/problems/min-stack/",
                        Medium,
                        &["Stack", "Design"],
                    ),
                ],
            )],
        ),
        topic(
            "binary_search_topic",
            "Binary Search",
            "Halve the search space on every step over sorted or monotonic data.",
            false,
            vec![sub_topic(
                "binary_search_topic",
                "binary_search_intro",
                "Introduction to Binary Search",
                &[],
                vec![
                    ProblemDef::new(
                        "lc704",
                        "Binary Search",
                        "https://leetcode.com/problems/binary-search/",
                        Easy,
                        &["Array", "Binary Search"],
                    ),
                    ProblemDef::new(
                        "lc74",
                        "Search a 2D Matrix",
                        "https://leetcode.com/problems/search-a-2d-matrix/",
                        Medium,
                        &["Array", "Binary Search", "Matrix"],
                    ),
                    ProblemDef::new(
                        "lc153",
                        "Find Minimum in Rotated Sorted Array",
                        "https://leetcode.com/problems/find-minimum-in-rotated-sorted-array/",
                        Medium,
                        &["Array", "Binary Search"],
                    ),
                ],
            )],
        ),
        topic(
            "linked_list",
            "Linked List",
            "Pointer manipulation over singly linked nodes.",
            false,
            vec![
                sub_topic(
                    "linked_list",
                    "singly_linked_list",
                    "Singly Linked List Basics",
                    &[],
                    vec![
                        ProblemDef::new(
                            "lc206",
                            "Reverse Linked List",
                            "https://leetcode.com/problems/reverse-linked-list/",
                            Easy,
                            &["Linked List", "Recursion", "Iteration"],
                        ),
                        ProblemDef::new(
                            "lc21",
                            "Merge Two Sorted Lists",
                            "https://leetcode.com/problems/merge-two-sorted-lists/",
                            Easy,
                            &["Linked List", "Recursion"],
                        ),
                    ],
                ),
                sub_topic(
                    "linked_list",
                    "linked_list_cycle",
                    "Detecting Cycles",
                    &[],
                    vec![ProblemDef::new(
                        "lc141",
                        "Linked List Cycle",
                        "https://leetcode.com/problems/linked-list-cycle/",
                        Easy,
                        &["Linked List", "Two Pointers", "Hash Table"],
                    )],
                ),
            ],
        ),
        topic(
            "trees",
            "Trees",
            "Recursive structures: traversals, depth, and search-tree invariants.",
            false,
            vec![
                sub_topic(
                    "trees",
                    "binary_tree_traversal",
                    "Binary Tree Traversal (DFS, BFS)",
                    &[],
                    vec![
                        ProblemDef::new(
                            "lc94",
                            "Binary Tree Inorder Traversal",
                            "https://leetcode.com/problems/binary-tree-inorder-traversal/",
                            Easy,
                            &["Tree", "DFS", "Stack"],
                        ),
                        ProblemDef::new(
                            "lc102",
                            "Binary Tree Level Order Traversal",
                            "https://leetcode.com/problems/binary-tree-level-order-traversal/",
                            Medium,
                            &["Tree", "BFS", "Queue"],
                        ),
                        ProblemDef::new(
                            "lc104",
                            "Maximum Depth of Binary Tree",
                            "https://leetcode.com/problems/maximum-depth-of-binary-tree/",
                            Easy,
                            &["Tree", "DFS", "BFS"],
                        ),
                    ],
                ),
                sub_topic(
                    "trees",
                    "binary_search_tree",
                    "Binary Search Trees (BST)",
                    &[],
                    vec![
                        ProblemDef::new(
                            "lc98",
                            "Validate Binary Search Tree",
                            "https://leetcode.com/problems/validate-binary-search-tree/",
                            Medium,
                            &["Tree", "DFS", "BST"],
                        ),
                        ProblemDef::new(
                            "lc230",
                            "Kth Smallest Element in a BST",
                            "https://leetcode.com/problems/kth-smallest-element-in-a-bst/",
                            Medium,
                            &["Tree", "BST", "DFS", "Inorder Traversal"],
                        ),
                    ],
                ),
            ],
        ),
        topic(
            "heaps_priority_queues",
            "Heaps / Priority Queues",
            "Keep the smallest or largest element at hand in logarithmic time.",
            false,
            vec![sub_topic(
                "heaps_priority_queues",
                "heap_intro",
                "Introduction to Heaps",
                &[],
                vec![
                    ProblemDef::new(
                        "lc215",
                        "Kth Largest Element in an Array",
                        "https://leetcode.com/problems/kth-largest-element-in-an-array/",
                        Medium,
                        &["Heap", "Divide and Conquer", "Sorting"],
                    ),
                    ProblemDef::new(
                        "lc295",
                        "Find Median from Data Stream",
                        "https://leetcode.com/problems/find-median-from-data-stream/",
                        Hard,
                        &["Heap", "Design", "Two Heaps"],
                    ),
                ],
            )],
        ),
        topic(
            "graphs",
            "Graphs",
            "Model relationships as nodes and edges; traverse with BFS and DFS.",
            false,
            vec![sub_topic(
                "graphs",
                "graph_intro_traversal",
                "Graph Traversal (BFS, DFS)",
                &[],
                vec![
                    ProblemDef::new(
                        "lc200",
                        "Number of Islands",
                        "https://leetcode.com/problems/number-of-islands/",
                        Medium,
                        &["Graph", "BFS", "DFS", "Matrix"],
                    ),
                    ProblemDef::new(
                        "lc133",
                        "Clone Graph",
                        "https://leetcode.com/problems/clone-graph/",
                        Medium,
                        &["Graph", "BFS", "DFS", "Hash Table"],
                    ),
                ],
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_roadmap_has_unique_ids() {
        assert!(duplicate_ids(&initial_roadmap()).is_empty());
    }

    #[test]
    fn problems_carry_their_context_ids() {
        for topic in initial_roadmap() {
            for sub in &topic.sub_topics {
                for problem in &sub.leetcode_problems {
                    assert_eq!(problem.topic_id, topic.id);
                    assert_eq!(problem.sub_topic_id, sub.id);
                }
            }
        }
    }

    #[test]
    fn problems_without_solutions_get_starter_code_for_every_language() {
        let problem = ProblemDef::new("x", "Two Sum", "", Difficulty::Easy, &[]).build("t", "s");

        assert_eq!(problem.user_solutions.len(), ProgrammingLanguage::ALL.len());
        assert_eq!(
            problem.solution_for(ProgrammingLanguage::Python),
            Some("# Start Python for Two Sum")
        );
        assert_eq!(problem.status, ProblemStatus::NotStarted);
    }

    #[test]
    fn duplicates_are_reported_per_parent() {
        let mut forest = initial_roadmap();
        let copy = forest[0].sub_topics[0].leetcode_problems[0].clone();
        forest[0].sub_topics[0].leetcode_problems.push(copy);

        assert_eq!(duplicate_ids(&forest), vec!["arrays_hashing/arrays_hashing_intro/lc217".to_string()]);
    }
}
