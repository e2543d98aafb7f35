//! 组合生成
//!
//! 问题 x 酒店 的笛卡尔积，外层遍历酒店，内层遍历问题。

use std::fmt::Display;

/// 一个待提问的 (问题, 酒店) 组合
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination {
    pub question: String,
    pub hotel: String,
}

impl Combination {
    pub fn new(question: impl Into<String>, hotel: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            hotel: hotel.into(),
        }
    }
}

impl Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[酒店 {} | 问题 {}]", self.hotel, self.question)
    }
}

/// 生成全部组合，顺序由输入顺序唯一决定
pub fn generate_combinations<Q, H>(questions: &[Q], hotels: &[H]) -> Vec<Combination>
where
    Q: AsRef<str>,
    H: AsRef<str>,
{
    let mut combinations = Vec::with_capacity(questions.len() * hotels.len());
    for hotel in hotels {
        for question in questions {
            combinations.push(Combination::new(question.as_ref(), hotel.as_ref()));
        }
    }
    combinations
}
