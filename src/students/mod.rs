use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalType {
    Exam,
    RegularTest,
    OvercomingWeakness,
    Advanced,
}

impl GoalType {
    pub fn label(self) -> &'static str {
        match self {
            GoalType::Exam => "受験",
            GoalType::RegularTest => "定期テスト",
            GoalType::OvercomingWeakness => "苦手克服",
            GoalType::Advanced => "先取り学習",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchoolType {
    Elementary,
    JuniorHigh,
    HighSchool,
}

/// Grade code and display label
pub struct Grade {
    pub value: &'static str,
    pub label: &'static str,
}

const ELEMENTARY_GRADES: [Grade; 6] = [
    Grade { value: "E1", label: "小1" },
    Grade { value: "E2", label: "小2" },
    Grade { value: "E3", label: "小3" },
    Grade { value: "E4", label: "小4" },
    Grade { value: "E5", label: "小5" },
    Grade { value: "E6", label: "小6" },
];

const JUNIOR_HIGH_GRADES: [Grade; 3] = [
    Grade { value: "J1", label: "中1" },
    Grade { value: "J2", label: "中2" },
    Grade { value: "J3", label: "中3" },
];

const HIGH_SCHOOL_GRADES: [Grade; 3] = [
    Grade { value: "H1", label: "高1" },
    Grade { value: "H2", label: "高2" },
    Grade { value: "H3", label: "高3" },
];

impl SchoolType {
    pub fn label(self) -> &'static str {
        match self {
            SchoolType::Elementary => "小学校",
            SchoolType::JuniorHigh => "中学校",
            SchoolType::HighSchool => "高校",
        }
    }

    pub fn grades(self) -> &'static [Grade] {
        match self {
            SchoolType::Elementary => &ELEMENTARY_GRADES,
            SchoolType::JuniorHigh => &JUNIOR_HIGH_GRADES,
            SchoolType::HighSchool => &HIGH_SCHOOL_GRADES,
        }
    }
}

pub const SUBJECTS: [&str; 5] = ["数学", "英語", "国語", "理科", "社会"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub target_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_score: Option<u32>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    /// Display id, e.g. S001
    pub student_id: String,
    pub name: String,
    pub grade: String,
    pub school_type: SchoolType,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl Student {
    /// Display label for the grade code, falling back to the raw code
    pub fn grade_label(&self) -> &str {
        self.school_type
            .grades()
            .iter()
            .find(|g| g.value == self.grade)
            .map(|g| g.label)
            .unwrap_or(self.grade.as_str())
    }
}
