//! 选择状态
//!
//! 保存题库与酒店列表及各自的选中标记，运行前由这里产出有序的选中列表。

use crate::error::ValidationError;
use crate::models::{Hotel, Question};

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    questions: Vec<Question>,
    hotels: Vec<Hotel>,
}

impl SelectionState {
    /// 创建选择状态，初始全部未选中
    pub fn new(questions: Vec<String>, hotels: Vec<Hotel>) -> Self {
        Self {
            questions: questions.into_iter().map(Question::new).collect(),
            hotels: hotels
                .into_iter()
                .map(|mut h| {
                    h.selected = false;
                    h
                })
                .collect(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn hotels(&self) -> &[Hotel] {
        &self.hotels
    }

    /// 选中指定问题，任一问题不在题库中时不做任何修改
    pub fn select_questions<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<(), ValidationError> {
        let indices = texts
            .iter()
            .map(|t| {
                let text = t.as_ref().trim();
                self.questions
                    .iter()
                    .position(|q| q.text == text)
                    .ok_or_else(|| ValidationError::UnknownQuestion {
                        text: text.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for i in indices {
            self.questions[i].selected = true;
        }
        Ok(())
    }

    /// 选中指定酒店，任一酒店不存在时不做任何修改
    pub fn select_hotels<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), ValidationError> {
        let indices = names
            .iter()
            .map(|n| {
                let name = n.as_ref().trim();
                self.hotels
                    .iter()
                    .position(|h| h.name == name)
                    .ok_or_else(|| ValidationError::UnknownHotel {
                        name: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for i in indices {
            self.hotels[i].selected = true;
        }
        Ok(())
    }

    pub fn select_all_questions(&mut self) {
        self.questions.iter_mut().for_each(|q| q.selected = true);
    }

    pub fn select_all_hotels(&mut self) {
        self.hotels.iter_mut().for_each(|h| h.selected = true);
    }

    pub fn clear(&mut self) {
        self.questions.iter_mut().for_each(|q| q.selected = false);
        self.hotels.iter_mut().for_each(|h| h.selected = false);
    }

    /// 选中的问题文本，按题库顺序
    pub fn selected_questions(&self) -> Vec<String> {
        self.questions
            .iter()
            .filter(|q| q.selected)
            .map(|q| q.text.clone())
            .collect()
    }

    /// 选中的酒店名称，按列表顺序
    pub fn selected_hotels(&self) -> Vec<String> {
        self.hotels
            .iter()
            .filter(|h| h.selected)
            .map(|h| h.name.clone())
            .collect()
    }
}
