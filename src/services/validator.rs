//! 完整试卷结构校验 - 业务能力层
//!
//! 遍历 部分 → 题组 → 题目 三层结构，找出所有不满足必填规则的位置，
//! 供向导阻止提交并定位到第一个出错的题组。
//!
//! 规则：
//! 1. Part 7 全部题组的题目总数必须正好是 54
//! 2. Part 1-4 的题组必须有音频
//! 3. Part 1 / 6 / 7 的题组至少要有一张图片
//! 4. 除 Part 6 外，每道题的选项不能为空白，正确答案必须是选项中的键，
//!    Part 1 / 2 / 6 以外的题干不能为空白
//!
//! 数据缺失一律按错误处理，绝不当作合格。

use crate::models::draft::{FullTestDraft, GroupData, QuestionData};
use crate::models::part::Part;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 错误位置
///
/// `group` 为 `None` 表示整个部分的错误（例如 Part 7 题目总数不对）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorLocation {
    pub part: u8,
    pub group: Option<usize>,
}

impl ErrorLocation {
    pub fn part_level(part: Part) -> Self {
        Self {
            part: part.number(),
            group: None,
        }
    }

    pub fn group(part: Part, group: usize) -> Self {
        Self {
            part: part.number(),
            group: Some(group),
        }
    }
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.group {
            Some(group) => write!(f, "Part {} 第 {} 组", self.part, group + 1),
            None => write!(f, "Part {}", self.part),
        }
    }
}

/// 校验结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// 最先遇到的错误位置
    pub first: ErrorLocation,
    /// 全部错误位置，按 部分 → 题组 升序
    pub all: Vec<ErrorLocation>,
    /// 含有错误的部分编号（去重、升序）
    pub parts: Vec<u8>,
}

impl ValidationReport {
    /// 某一部分中出错的题组索引
    pub fn groups_for(&self, part: Part) -> Vec<usize> {
        self.all
            .iter()
            .filter(|loc| loc.part == part.number())
            .filter_map(|loc| loc.group)
            .collect()
    }

    /// 指定位置是否出错
    pub fn contains(&self, part: Part, group: Option<usize>) -> bool {
        self.all.contains(&ErrorLocation {
            part: part.number(),
            group,
        })
    }
}

/// 错误原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Cause {
    /// 缺少音频
    MissingAudio,
    /// 缺少图片
    MissingImages,
    /// 题组没有 questions 数组
    MissingQuestions,
    /// 题目没有选项
    MissingChoices,
    /// 某个选项为空白
    BlankChoice { key: String },
    /// 正确答案为空或不在选项中
    InvalidCorrectAnswer,
    /// 题干为空白
    BlankTextQuestion,
    /// 题目总数不对
    WrongQuestionTotal { expected: usize, actual: usize },
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::MissingAudio => write!(f, "缺少音频"),
            Cause::MissingImages => write!(f, "缺少图片"),
            Cause::MissingQuestions => write!(f, "缺少题目列表"),
            Cause::MissingChoices => write!(f, "缺少选项"),
            Cause::BlankChoice { key } => write!(f, "选项 {} 为空", key),
            Cause::InvalidCorrectAnswer => write!(f, "正确答案为空或不在选项中"),
            Cause::BlankTextQuestion => write!(f, "题干为空"),
            Cause::WrongQuestionTotal { expected, actual } => {
                write!(f, "题目总数应为 {}，实际为 {}", expected, actual)
            }
        }
    }
}

/// 单条问题明细
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub location: ErrorLocation,
    /// 题目在题组中的索引（从 0 开始），题组级 / 部分级错误为 `None`
    pub question: Option<usize>,
    pub cause: Cause,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.question {
            Some(question) => write!(f, "{} 第 {} 题: {}", self.location, question + 1, self.cause),
            None => write!(f, "{}: {}", self.location, self.cause),
        }
    }
}

/// 校验草稿，合格时返回 `None`
pub fn validate(draft: &FullTestDraft) -> Option<ValidationReport> {
    let scan = scan(draft);
    let first = *scan.locations.first()?;
    Some(ValidationReport {
        first,
        all: scan.locations,
        parts: scan.parts,
    })
}

/// 列出草稿中的每一条问题
pub fn diagnose(draft: &FullTestDraft) -> Vec<Issue> {
    scan(draft).issues
}

/// 一次遍历的全部结果
#[derive(Debug, Default)]
struct Scan {
    locations: Vec<ErrorLocation>,
    parts: Vec<u8>,
    issues: Vec<Issue>,
}

fn scan(draft: &FullTestDraft) -> Scan {
    let mut scan = Scan::default();

    for part in Part::ALL {
        let groups = draft.groups(part);
        // 未填写的部分不算错误
        if groups.is_empty() {
            continue;
        }

        let mut part_has_error = false;

        if let Some(expected) = part.expected_question_total() {
            let actual: usize = groups.iter().map(GroupData::question_count).sum();
            if actual != expected {
                let location = ErrorLocation::part_level(part);
                scan.locations.push(location);
                scan.issues.push(Issue {
                    location,
                    question: None,
                    cause: Cause::WrongQuestionTotal { expected, actual },
                });
                part_has_error = true;
            }
        }

        for (group_index, group) in groups.iter().enumerate() {
            let location = ErrorLocation::group(part, group_index);
            let issues = check_group(part, group, location);
            if !issues.is_empty() {
                scan.locations.push(location);
                scan.issues.extend(issues);
                part_has_error = true;
            }
        }

        if part_has_error {
            scan.parts.push(part.number());
        }
    }

    scan
}

/// 检查单个题组，返回其全部问题
///
/// 题目逐一检查到底，不在第一处错误处停下
fn check_group(part: Part, group: &GroupData, location: ErrorLocation) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut push = |question: Option<usize>, cause: Cause| {
        issues.push(Issue {
            location,
            question,
            cause,
        })
    };

    if part.requires_audio() && group.audio_url.as_deref().map_or(true, str::is_empty) {
        push(None, Cause::MissingAudio);
    }

    if part.requires_images() && group.images_url.as_ref().map_or(true, Vec::is_empty) {
        push(None, Cause::MissingImages);
    }

    match &group.questions {
        None => push(None, Cause::MissingQuestions),
        Some(questions) if part.checks_questions() => {
            for (question_index, question) in questions.iter().enumerate() {
                for cause in check_question(part, question) {
                    push(Some(question_index), cause);
                }
            }
        }
        Some(_) => {}
    }

    issues
}

fn check_question(part: Part, question: &QuestionData) -> Vec<Cause> {
    let mut causes = Vec::new();

    match &question.choices {
        None => causes.push(Cause::MissingChoices),
        Some(choices) => {
            for (key, text) in choices {
                if is_blank(text) {
                    causes.push(Cause::BlankChoice { key: key.clone() });
                }
            }
        }
    }

    let answer_ok = match (&question.correct_answer, &question.choices) {
        (Some(answer), Some(choices)) => !is_blank(answer) && choices.contains_key(answer),
        _ => false,
    };
    if !answer_ok {
        causes.push(Cause::InvalidCorrectAnswer);
    }

    if part.requires_text_question() && question.text_question.as_deref().map_or(true, is_blank) {
        causes.push(Cause::BlankTextQuestion);
    }

    causes
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
