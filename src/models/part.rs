use regex::Regex;
use std::sync::OnceLock;

/// TOEIC 考试的七个部分
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Part {
    /// 图片描述（听力）
    Part1 = 1,
    /// 应答问题（听力）
    Part2 = 2,
    /// 简短对话（听力）
    Part3 = 3,
    /// 简短独白（听力）
    Part4 = 4,
    /// 句子填空（阅读）
    Part5 = 5,
    /// 段落填空（阅读）
    Part6 = 6,
    /// 阅读理解（阅读）
    Part7 = 7,
}

/// Part 7 全部题组加起来必须正好是这么多道题
pub const PART7_QUESTION_TOTAL: usize = 54;

impl Part {
    /// 按编号升序排列的所有部分
    pub const ALL: [Part; 7] = [
        Part::Part1,
        Part::Part2,
        Part::Part3,
        Part::Part4,
        Part::Part5,
        Part::Part6,
        Part::Part7,
    ];

    /// 获取部分编号（1-7）
    pub fn number(self) -> u8 {
        self as u8
    }

    /// 从编号解析部分
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Part::Part1),
            2 => Some(Part::Part2),
            3 => Some(Part::Part3),
            4 => Some(Part::Part4),
            5 => Some(Part::Part5),
            6 => Some(Part::Part6),
            7 => Some(Part::Part7),
            _ => None,
        }
    }

    /// 草稿中使用的键名，例如 `"Part 1"`
    pub fn label(self) -> String {
        format!("Part {}", self.number())
    }

    /// 从键名解析部分
    ///
    /// 容忍大小写和多余空格：`"part 3"`、`" Part  3 "` 都能识别
    pub fn from_label(label: &str) -> Option<Self> {
        static LABEL_RE: OnceLock<Regex> = OnceLock::new();
        let re = LABEL_RE.get_or_init(|| {
            Regex::new(r"(?i)^\s*part\s*([1-7])\s*$").expect("part label regex is valid")
        });

        let caps = re.captures(label)?;
        let number = caps.get(1)?.as_str().parse().ok()?;
        Self::from_number(number)
    }

    // ========== 各部分的规则表 ==========

    /// 题组必须有音频
    pub fn requires_audio(self) -> bool {
        matches!(self, Part::Part1 | Part::Part2 | Part::Part3 | Part::Part4)
    }

    /// 题组至少要有一张图片
    pub fn requires_images(self) -> bool {
        matches!(self, Part::Part1 | Part::Part6 | Part::Part7)
    }

    /// 是否检查题目内容（选项 / 正确答案 / 题干）
    pub fn checks_questions(self) -> bool {
        self != Part::Part6
    }

    /// 题干文字是否必填
    pub fn requires_text_question(self) -> bool {
        !matches!(self, Part::Part1 | Part::Part2 | Part::Part6)
    }

    /// 该部分要求的题目总数
    pub fn expected_question_total(self) -> Option<usize> {
        match self {
            Part::Part7 => Some(PART7_QUESTION_TOTAL),
            _ => None,
        }
    }
}

impl std::fmt::Display for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Part {}", self.number())
    }
}
