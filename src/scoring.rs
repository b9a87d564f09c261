// src/scoring.rs

//! Assessment scoring: MCQ grading, coding grade and the 50/50 blend.
//!
//! All functions are pure; the handlers feed them answer keys fetched from
//! the database and test-case outcomes returned by the sandbox.

use std::collections::HashMap;

/// Rounded percentage, safe for `whole == 0`.
pub fn percentage(part: usize, whole: usize) -> i64 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as i64
}

/// Grades an answer map against the stored answer key.
/// Returns (correct_count, total_answered). Answers to unknown question ids
/// count toward the total but can never be correct.
pub fn grade_mcq(
    user_answers: &HashMap<i64, String>,
    answer_key: &HashMap<i64, String>,
) -> (usize, usize) {
    let total = user_answers.len();
    let correct = user_answers
        .iter()
        .filter(|(id, answer)| answer_key.get(id).is_some_and(|key| key == *answer))
        .count();
    (correct, total)
}

/// Outcome of the coding half of an assessment.
///
/// `Ungraded` replaces the legacy fabricated score for submissions that had
/// no runnable test cases: the result row stores NULL and the blend falls
/// back to the MCQ score alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodingGrade {
    Graded(i64),
    Ungraded,
}

impl CodingGrade {
    pub fn score(&self) -> Option<i64> {
        match self {
            CodingGrade::Graded(score) => Some(*score),
            CodingGrade::Ungraded => None,
        }
    }
}

/// Fixed 50/50 blend of MCQ and coding percentages.
/// An ungraded coding half leaves the total at the MCQ score.
pub fn blend(mcq_score: i64, coding: CodingGrade) -> i64 {
    match coding {
        CodingGrade::Graded(coding_score) => {
            ((mcq_score + coding_score) as f64 / 2.0).round() as i64
        }
        CodingGrade::Ungraded => mcq_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(pairs: &[(i64, &str)]) -> HashMap<i64, String> {
        pairs.iter().map(|(id, a)| (*id, a.to_string())).collect()
    }

    #[test]
    fn seven_of_ten_scores_seventy() {
        let answer_key: HashMap<i64, String> =
            (1..=10).map(|i| (i, "A".to_string())).collect();
        let mut answers = HashMap::new();
        for i in 1..=7 {
            answers.insert(i, "A".to_string());
        }
        for i in 8..=10 {
            answers.insert(i, "B".to_string());
        }

        let (correct, total) = grade_mcq(&answers, &answer_key);
        assert_eq!(correct, 7);
        assert_eq!(total, 10);
        assert_eq!(percentage(correct, total), 70);
    }

    #[test]
    fn unknown_question_ids_never_correct() {
        let answer_key = key(&[(1, "A")]);
        let answers = key(&[(1, "A"), (99, "A")]);
        let (correct, total) = grade_mcq(&answers, &answer_key);
        assert_eq!(correct, 1);
        assert_eq!(total, 2);
    }

    #[test]
    fn empty_answer_map_scores_zero() {
        let (correct, total) = grade_mcq(&HashMap::new(), &HashMap::new());
        assert_eq!(percentage(correct, total), 0);
    }

    #[test]
    fn two_of_three_cases_rounds_to_sixty_seven() {
        assert_eq!(percentage(2, 3), 67);
    }

    #[test]
    fn blend_is_fixed_fifty_fifty() {
        assert_eq!(blend(80, CodingGrade::Graded(60)), 70);
        assert_eq!(blend(0, CodingGrade::Graded(0)), 0);
        assert_eq!(blend(100, CodingGrade::Graded(100)), 100);
    }

    #[test]
    fn ungraded_coding_leaves_total_at_mcq() {
        assert_eq!(blend(70, CodingGrade::Ungraded), 70);
        assert_eq!(CodingGrade::Ungraded.score(), None);
        assert_eq!(CodingGrade::Graded(67).score(), Some(67));
    }
}
