//! 完整试卷草稿的数据模型
//!
//! 草稿在向导中逐步填写，字段随时可能缺失或类型不对。
//! 反序列化时一律宽松处理：类型不对的字段当作缺失，
//! 交给校验器判定为错误，而不是在解析阶段直接失败。

use crate::models::part::Part;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// 单道题目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionData {
    /// 选项：答案键 → 选项文本
    #[serde(default, deserialize_with = "lenient::choices", skip_serializing_if = "Option::is_none")]
    pub choices: Option<BTreeMap<String, String>>,
    /// 正确答案，应为 `choices` 中的某个键
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    /// 题干文字
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub text_question: Option<String>,
}

impl QuestionData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_question = Some(text.into());
        self
    }

    pub fn with_choice(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.choices
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), text.into());
        self
    }

    pub fn with_answer(mut self, key: impl Into<String>) -> Self {
        self.correct_answer = Some(key.into());
        self
    }
}

/// 题组：共享同一段音频 / 同一组图片的若干道题
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupData {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings", skip_serializing_if = "Option::is_none")]
    pub images_url: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::questions", skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionData>>,
}

impl GroupData {
    /// 创建一个空题组（questions 为空数组而非缺失）
    pub fn new() -> Self {
        Self {
            audio_url: None,
            images_url: None,
            questions: Some(Vec::new()),
        }
    }

    pub fn with_audio(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images_url.get_or_insert_with(Vec::new).push(url.into());
        self
    }

    pub fn with_question(mut self, question: QuestionData) -> Self {
        self.questions.get_or_insert_with(Vec::new).push(question);
        self
    }

    /// 题目数量，缺失时按 0 计
    pub fn question_count(&self) -> usize {
        self.questions.as_ref().map_or(0, Vec::len)
    }
}

/// 某一部分的全部题组（按顺序）
pub type PartData = Vec<GroupData>;

/// 完整试卷草稿：部分键名（`"Part 1"` … `"Part 7"`）→ 题组列表
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FullTestDraft {
    parts: BTreeMap<String, PartData>,
}

impl<'de> Deserialize<'de> for FullTestDraft {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient::parts(deserializer).map(|parts| Self { parts })
    }
}

impl FullTestDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取某一部分的题组，未填写时返回空切片
    ///
    /// 先按标准键名查找，找不到再按宽松规则匹配其他键名
    pub fn groups(&self, part: Part) -> &[GroupData] {
        self.effective_label(part)
            .and_then(|label| self.parts.get(label))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 实际用于某一部分的键名：标准键名优先，其次是第一个能识别的宽松键名
    fn effective_label(&self, part: Part) -> Option<&str> {
        let canonical = part.label();
        if let Some((label, _)) = self.parts.get_key_value(&canonical) {
            return Some(label.as_str());
        }
        self.parts
            .keys()
            .find(|label| Part::from_label(label) == Some(part))
            .map(String::as_str)
    }

    /// 获取某一部分题组的可变引用（不存在时创建）
    pub fn groups_mut(&mut self, part: Part) -> &mut PartData {
        self.parts.entry(part.label()).or_default()
    }

    /// 设置某一部分的全部题组
    pub fn set_part(&mut self, part: Part, groups: PartData) {
        self.parts.insert(part.label(), groups);
    }

    pub fn with_part(mut self, part: Part, groups: PartData) -> Self {
        self.set_part(part, groups);
        self
    }

    /// 无法识别的键名（不会参与校验）
    pub fn unknown_labels(&self) -> Vec<&str> {
        self.parts
            .keys()
            .filter(|label| Part::from_label(label).is_none())
            .map(String::as_str)
            .collect()
    }

    /// 被同一部分的其他键名覆盖、不会参与校验的键名
    ///
    /// 例如同时存在 `"Part 1"` 和 `"part 1"` 时，`"part 1"` 被忽略
    pub fn shadowed_labels(&self) -> Vec<&str> {
        self.parts
            .keys()
            .filter(|label| match Part::from_label(label) {
                Some(part) => self.effective_label(part) != Some(label.as_str()),
                None => false,
            })
            .map(String::as_str)
            .collect()
    }

    /// 全部题组数量
    pub fn group_count(&self) -> usize {
        Part::ALL.iter().map(|&part| self.groups(part).len()).sum()
    }

    /// 全部题目数量
    pub fn question_count(&self) -> usize {
        Part::ALL
            .iter()
            .flat_map(|&part| self.groups(part))
            .map(GroupData::question_count)
            .sum()
    }
}

/// 宽松反序列化辅助函数
///
/// 先读成通用值，再挑出能用的部分；类型不对一律视为缺失
mod lenient {
    use super::*;

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match JsonValue::deserialize(deserializer)? {
            JsonValue::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match JsonValue::deserialize(deserializer)? {
            JsonValue::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        JsonValue::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        })
    }

    /// 非字符串的选项值按空白处理
    pub fn choices<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match JsonValue::deserialize(deserializer)? {
            JsonValue::Object(map) => Some(
                map.into_iter()
                    .map(|(key, value)| match value {
                        JsonValue::String(s) => (key, s),
                        _ => (key, String::new()),
                    })
                    .collect(),
            ),
            _ => None,
        })
    }

    pub fn questions<'de, D>(deserializer: D) -> Result<Option<Vec<QuestionData>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match JsonValue::deserialize(deserializer)? {
            JsonValue::Array(items) => Some(items.into_iter().map(question).collect()),
            _ => None,
        })
    }

    /// 非对象的题目元素当作全部字段缺失
    fn question(value: JsonValue) -> QuestionData {
        match value {
            JsonValue::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => QuestionData::default(),
        }
    }

    fn group(value: JsonValue) -> GroupData {
        match value {
            JsonValue::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => GroupData::default(),
        }
    }

    /// `null` 表示该部分尚未填写；其他非数组值无法解释为题组，直接报错
    pub fn parts<'de, D>(deserializer: D) -> Result<BTreeMap<String, PartData>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, JsonValue>::deserialize(deserializer)?;
        let mut parts = BTreeMap::new();
        for (label, value) in raw {
            let groups = match value {
                JsonValue::Null => Vec::new(),
                JsonValue::Array(items) => items.into_iter().map(group).collect(),
                other => {
                    return Err(<D::Error as serde::de::Error>::custom(format!(
                        "{} 的值应为题组数组，实际为: {}",
                        label, other
                    )))
                }
            };
            parts.insert(label, groups);
        }
        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_camel_case_fields() {
        let draft: FullTestDraft = serde_json::from_value(json!({
            "Part 1": [{
                "audioUrl": "a.mp3",
                "imagesUrl": ["p.png"],
                "questions": [{
                    "choices": { "A": "cat", "B": "dog" },
                    "correctAnswer": "A",
                    "textQuestion": ""
                }]
            }]
        }))
        .unwrap();

        let groups = draft.groups(Part::Part1);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].audio_url.as_deref(), Some("a.mp3"));
        assert_eq!(groups[0].images_url.as_deref(), Some(&["p.png".to_string()][..]));
        let question = &groups[0].questions.as_ref().unwrap()[0];
        assert_eq!(question.correct_answer.as_deref(), Some("A"));
        assert_eq!(question.choices.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_fields_decode_as_absent() {
        let draft: FullTestDraft = serde_json::from_value(json!({
            "Part 5": [{
                "audioUrl": 12,
                "imagesUrl": "not-a-list",
                "questions": [
                    { "choices": ["A", "B"], "correctAnswer": 1 },
                    { "choices": { "A": 3, "B": "ok" } },
                    "garbage"
                ]
            }],
            "Part 6": [{ "questions": { "oops": true } }]
        }))
        .unwrap();

        let group = &draft.groups(Part::Part5)[0];
        assert_eq!(group.audio_url, None);
        assert_eq!(group.images_url, None);
        let questions = group.questions.as_ref().unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].choices, None);
        assert_eq!(questions[0].correct_answer, None);
        assert_eq!(questions[1].choices.as_ref().unwrap()["A"], "");
        assert_eq!(questions[2], QuestionData::default());

        assert_eq!(draft.groups(Part::Part6)[0].questions, None);
    }

    #[test]
    fn test_null_part_is_empty_and_scalar_part_is_rejected() {
        let draft: FullTestDraft = serde_json::from_value(json!({ "Part 2": null })).unwrap();
        assert!(draft.groups(Part::Part2).is_empty());

        let err = serde_json::from_value::<FullTestDraft>(json!({ "Part 2": "x" }));
        assert!(err.is_err());
    }

    #[test]
    fn test_groups_falls_back_to_loose_label() {
        let draft: FullTestDraft =
            serde_json::from_value(json!({ "part 4": [{ "audioUrl": "x" }], "Extra": [] })).unwrap();
        assert_eq!(draft.groups(Part::Part4).len(), 1);
        assert_eq!(draft.unknown_labels(), vec!["Extra"]);
    }

    #[test]
    fn test_shadowed_labels() {
        let draft: FullTestDraft = serde_json::from_value(json!({
            "Part 1": [{ "audioUrl": "canonical" }],
            "part 1": [{ "audioUrl": "loose" }, {}],
            "part 2": [{}],
            "PART 2": [{}, {}]
        }))
        .unwrap();

        assert_eq!(draft.groups(Part::Part1).len(), 1);
        assert_eq!(draft.groups(Part::Part1)[0].audio_url.as_deref(), Some("canonical"));
        // 没有标准键名时取排序后的第一个宽松键名
        assert_eq!(draft.groups(Part::Part2).len(), 2);
        assert_eq!(draft.shadowed_labels(), vec!["part 1", "part 2"]);
        assert!(draft.unknown_labels().is_empty());
    }

    #[test]
    fn test_counts() {
        let draft = FullTestDraft::new()
            .with_part(
                Part::Part3,
                vec![GroupData::new()
                    .with_question(QuestionData::new())
                    .with_question(QuestionData::new())],
            )
            .with_part(Part::Part5, vec![GroupData::default()]);

        assert_eq!(draft.group_count(), 2);
        assert_eq!(draft.question_count(), 2);
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let group = GroupData::new().with_audio("a.mp3");
        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(value, json!({ "audioUrl": "a.mp3", "questions": [] }));
    }
}
