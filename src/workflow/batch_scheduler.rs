//! 批次切分
//!
//! 把组合序列切成连续、互不重叠的窗口 `[start, start + batch_size)`。
//! 每个窗口不直接发送组合本身，而是发送窗口内出现过的问题和酒店（各自去重、保持首次出现顺序），
//! 后端会对这两个集合重新做笛卡尔积。

use crate::error::ValidationError;
use crate::models::AnalysisResult;
use crate::workflow::combination::Combination;
use serde::Serialize;
use std::collections::HashSet;

/// `/ask` 请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRequest {
    pub questions: Vec<String>,
    pub hotels: Vec<String>,
}

impl BatchRequest {
    /// 从窗口中提取去重后的问题和酒店
    pub fn from_window(window: &[Combination]) -> Self {
        let mut seen_questions = HashSet::new();
        let mut seen_hotels = HashSet::new();
        let mut questions = Vec::new();
        let mut hotels = Vec::new();

        for combination in window {
            if seen_questions.insert(combination.question.as_str()) {
                questions.push(combination.question.clone());
            }
            if seen_hotels.insert(combination.hotel.as_str()) {
                hotels.push(combination.hotel.clone());
            }
        }

        Self { questions, hotels }
    }

    /// 后端实际会展开的组合数
    pub fn implied_pairs(&self) -> usize {
        self.questions.len() * self.hotels.len()
    }
}

/// 一个批次窗口
#[derive(Debug, Clone, Copy)]
pub struct BatchWindow<'a> {
    /// 批次编号，从 1 开始
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub pairs: &'a [Combination],
}

impl BatchWindow<'_> {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn request(&self) -> BatchRequest {
        BatchRequest::from_window(self.pairs)
    }

    /// (酒店, 问题) 是否属于本窗口
    pub fn contains(&self, hotel: &str, question: &str) -> bool {
        self.pairs
            .iter()
            .any(|c| c.hotel == hotel && c.question == question)
    }

    /// 只保留属于本窗口的结果，返回被剔除的条数
    ///
    /// 后端按去重后的问题和酒店重新展开，会带回属于相邻批次的组合。
    pub fn retain_own(&self, results: &mut Vec<AnalysisResult>) -> usize {
        let received = results.len();
        results.retain(|r| self.contains(&r.hotel, &r.question));
        received - results.len()
    }
}

/// 批次数 = ceil(total / batch_size)
pub fn batch_count(total: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    total.div_ceil(batch_size)
}

/// 批次切分器
#[derive(Debug, Clone, Copy)]
pub struct BatchScheduler<'a> {
    combinations: &'a [Combination],
    batch_size: usize,
}

impl<'a> BatchScheduler<'a> {
    pub fn new(combinations: &'a [Combination], batch_size: usize) -> Result<Self, ValidationError> {
        if batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize);
        }
        Ok(Self {
            combinations,
            batch_size,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn total(&self) -> usize {
        self.combinations.len()
    }

    pub fn total_batches(&self) -> usize {
        batch_count(self.combinations.len(), self.batch_size)
    }

    /// 从 `start` 开始的窗口，`start` 越界时返回 None
    pub fn window_at(&self, start: usize) -> Option<BatchWindow<'a>> {
        if start >= self.combinations.len() {
            return None;
        }
        let end = (start + self.batch_size).min(self.combinations.len());
        Some(BatchWindow {
            index: start / self.batch_size + 1,
            start,
            end,
            pairs: &self.combinations[start..end],
        })
    }

    /// 依次产出所有窗口
    pub fn windows(&self) -> impl Iterator<Item = BatchWindow<'a>> + '_ {
        (0..self.combinations.len())
            .step_by(self.batch_size)
            .filter_map(move |start| self.window_at(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisStatus;
    use crate::workflow::combination::generate_combinations;

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(90, 80), 2);
        assert_eq!(batch_count(80, 80), 1);
        assert_eq!(batch_count(81, 80), 2);
        assert_eq!(batch_count(0, 80), 0);
        assert_eq!(batch_count(10, 0), 0);
    }

    #[test]
    fn test_three_questions_thirty_hotels() {
        let combinations = generate_combinations(&names("q", 3), &names("h", 30));
        let scheduler = BatchScheduler::new(&combinations, 80).unwrap();

        assert_eq!(scheduler.total(), 90);
        assert_eq!(scheduler.total_batches(), 2);

        let windows: Vec<_> = scheduler.windows().collect();
        assert_eq!(windows.len(), 2);
        assert_eq!((windows[0].start, windows[0].end), (0, 80));
        assert_eq!((windows[1].start, windows[1].end), (80, 90));
        assert_eq!(windows[1].index, 2);
    }

    #[test]
    fn test_windows_partition_exactly() {
        let combinations = generate_combinations(&names("q", 7), &names("h", 11));
        for batch_size in [1, 3, 7, 10, 76, 77, 100] {
            let scheduler = BatchScheduler::new(&combinations, batch_size).unwrap();
            let rebuilt: Vec<Combination> = scheduler
                .windows()
                .flat_map(|w| w.pairs.iter().cloned())
                .collect();
            assert_eq!(rebuilt, combinations, "batch_size = {batch_size}");

            let mut expected_start = 0;
            for window in scheduler.windows() {
                assert_eq!(window.start, expected_start);
                assert!(window.len() <= batch_size && !window.is_empty());
                expected_start = window.end;
            }
            assert_eq!(expected_start, combinations.len());
        }
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let combinations = generate_combinations(&["q"], &["h"]);
        assert!(matches!(
            BatchScheduler::new(&combinations, 0),
            Err(ValidationError::InvalidBatchSize)
        ));
    }

    #[test]
    fn test_request_uses_distinct_axes() {
        // 3 个问题 x 3 个酒店，窗口大小 4: [A-q1, A-q2, A-q3, B-q1]
        let combinations = generate_combinations(&["q1", "q2", "q3"], &["A", "B", "C"]);
        let scheduler = BatchScheduler::new(&combinations, 4).unwrap();
        let first = scheduler.window_at(0).unwrap().request();

        assert_eq!(first.questions, vec!["q1", "q2", "q3"]);
        assert_eq!(first.hotels, vec!["A", "B"]);
        // 后端会展开为 6 个组合，多于窗口内的 4 个
        assert_eq!(first.implied_pairs(), 6);
    }

    #[test]
    fn test_retain_own_drops_neighbouring_pairs() {
        // 窗口 [A-q1, A-q2, A-q3, B-q1]，后端展开后多出 B-q2、B-q3
        let combinations = generate_combinations(&["q1", "q2", "q3"], &["A", "B", "C"]);
        let scheduler = BatchScheduler::new(&combinations, 4).unwrap();
        let window = scheduler.window_at(0).unwrap();

        let request = window.request();
        let mut results: Vec<AnalysisResult> = request
            .hotels
            .iter()
            .flat_map(|h| {
                request.questions.iter().map(move |q| AnalysisResult {
                    hotel: h.clone(),
                    question: q.clone(),
                    response: String::new(),
                    status: AnalysisStatus::Success,
                })
            })
            .collect();

        assert_eq!(window.retain_own(&mut results), 2);
        let kept: Vec<(&str, &str)> = results
            .iter()
            .map(|r| (r.hotel.as_str(), r.question.as_str()))
            .collect();
        assert_eq!(kept, vec![("A", "q1"), ("A", "q2"), ("A", "q3"), ("B", "q1")]);
        assert!(!window.contains("C", "q1"));
    }

    #[test]
    fn test_window_out_of_range() {
        let combinations = generate_combinations(&["q"], &["h"]);
        let scheduler = BatchScheduler::new(&combinations, 80).unwrap();
        assert!(scheduler.window_at(1).is_none());
    }
}
