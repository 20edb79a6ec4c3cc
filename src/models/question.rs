use serde::{Deserialize, Serialize};

/// 可选项字母，对应 CSV 的 Group_X / Option_X 列
pub const CHOICE_LETTERS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

/// 题库中的一道题（CSV 一行）
///
/// `ilo` 是题目所属类别码，`question` 是题干；
/// 每个选项由分组标签（作答时记录的值）和展示文本两部分组成
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "ILO", default)]
    pub ilo: String,
    #[serde(rename = "Question", default)]
    pub question: String,
    #[serde(rename = "Group_A", default)]
    pub group_a: String,
    #[serde(rename = "Group_B", default)]
    pub group_b: String,
    #[serde(rename = "Group_C", default)]
    pub group_c: String,
    #[serde(rename = "Group_D", default)]
    pub group_d: String,
    #[serde(rename = "Group_E", default)]
    pub group_e: String,
    #[serde(rename = "Option_A", default)]
    pub option_a: String,
    #[serde(rename = "Option_B", default)]
    pub option_b: String,
    #[serde(rename = "Option_C", default)]
    pub option_c: String,
    #[serde(rename = "Option_D", default)]
    pub option_d: String,
    #[serde(rename = "Option_E", default)]
    pub option_e: String,
}

/// 供展示与作答的单个选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerChoice {
    /// 选项字母（A-E）
    pub letter: char,
    /// 作答时记录的分组标签（vibe 代码），也是最终统计的 key
    pub label: String,
    /// 展示给用户的选项文本
    pub text: String,
}

impl QuestionRecord {
    /// 类别与题干均非空才可用
    pub fn is_usable(&self) -> bool {
        !self.ilo.trim().is_empty() && !self.question.trim().is_empty()
    }

    /// 取指定选项的分组标签，选项不存在时返回空串
    pub fn group(&self, letter: char) -> &str {
        match letter.to_ascii_uppercase() {
            'A' => self.group_a.as_str(),
            'B' => self.group_b.as_str(),
            'C' => self.group_c.as_str(),
            'D' => self.group_d.as_str(),
            'E' => self.group_e.as_str(),
            _ => "",
        }
    }

    /// 取指定选项的展示文本，选项不存在时返回空串
    pub fn option_text(&self, letter: char) -> &str {
        match letter.to_ascii_uppercase() {
            'A' => self.option_a.as_str(),
            'B' => self.option_b.as_str(),
            'C' => self.option_c.as_str(),
            'D' => self.option_d.as_str(),
            'E' => self.option_e.as_str(),
            _ => "",
        }
    }

    /// 列出所有分组标签非空的选项
    pub fn choices(&self) -> Vec<AnswerChoice> {
        CHOICE_LETTERS
            .iter()
            .filter_map(|&letter| {
                let label = self.group(letter);
                if label.trim().is_empty() {
                    return None;
                }
                Some(AnswerChoice {
                    letter,
                    label: label.to_string(),
                    text: self.option_text(letter).to_string(),
                })
            })
            .collect()
    }
}
