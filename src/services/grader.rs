use serde::{Deserialize, Serialize};

use crate::config::GraderConfig;

/// AI 评分器：写作评分、错题讲解、出题。
///
/// mock 模式返回确定性的内置结果，便于离线开发与测试；
/// 真实 API 接入尚未落地，启动时由 `validate_config` 拦截。
#[derive(Debug, Clone)]
pub struct AiGrader {
    config: GraderConfig,
    #[allow(dead_code)]
    client: reqwest::Client,
}

/// 写作评分结果。分数未钳制，由引擎侧负责收敛到 [0, 100]。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritingGrade {
    pub score: f64,
    pub feedback: String,
    #[serde(default)]
    pub corrections: Vec<String>,
}

/// 生成的单选题。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPayload {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GraderError {
    #[error("grader is disabled")]
    Disabled,
    #[error("grader request timed out")]
    Timeout,
    #[error("grader network error: {0}")]
    Network(String),
    #[error("grader api error: status={status}, message={message}")]
    ApiError { status: u16, message: String },
}

impl AiGrader {
    pub fn new(config: &GraderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config: config.clone(),
            client,
        }
    }

    /// 启动时校验评分器配置。
    /// `enabled=true` 且 `mock=false` 时直接 panic，因为真实 API 尚未接入。
    pub fn validate_config(config: &GraderConfig) {
        if config.enabled && !config.mock {
            panic!(
                "Invalid grader configuration: enabled=true and mock=false, \
                 but real grader API integration is not yet implemented. \
                 Set GRADER_MOCK=true or GRADER_ENABLED=false."
            );
        }
    }

    /// 按语法、词汇与切题程度给写作打分。
    pub async fn grade_writing(
        &self,
        topic: &str,
        content: &str,
    ) -> Result<WritingGrade, GraderError> {
        self.ensure_enabled()?;
        if self.config.mock {
            return Ok(mock_writing_grade(topic, content));
        }
        Err(self.not_implemented())
    }

    /// 解释为何用户答案错误、正确答案正确。
    pub async fn explain_answer(
        &self,
        question: &str,
        user_answer: &str,
        correct_answer: &str,
    ) -> Result<String, GraderError> {
        self.ensure_enabled()?;
        if self.config.mock {
            return Ok(format!(
                "「{user_answer}」不符合题目「{question}」的语境，正确答案是「{correct_answer}」。\
                 注意核对关键词与句子结构。"
            ));
        }
        Err(self.not_implemented())
    }

    /// 按题型生成一道单选题。
    pub async fn build_quiz(&self, category: &str) -> Result<QuizPayload, GraderError> {
        self.ensure_enabled()?;
        if self.config.mock {
            return Ok(mock_quiz(category));
        }
        Err(self.not_implemented())
    }

    fn ensure_enabled(&self) -> Result<(), GraderError> {
        if self.config.enabled {
            Ok(())
        } else {
            Err(GraderError::Disabled)
        }
    }

    fn not_implemented(&self) -> GraderError {
        GraderError::ApiError {
            status: 501,
            message: "Real grader API integration is not implemented yet".to_string(),
        }
    }
}

/// mock 评分：按内容长度给出单调递增的分数，长文封顶。
fn mock_writing_grade(topic: &str, content: &str) -> WritingGrade {
    let words = content.split_whitespace().count();
    let score = (40.0 + words as f64 * 2.0).min(95.0);
    WritingGrade {
        score,
        feedback: format!("（mock）关于「{topic}」的写作共 {words} 词，结构完整，继续保持。"),
        corrections: Vec::new(),
    }
}

fn mock_quiz(category: &str) -> QuizPayload {
    QuizPayload {
        prompt: format!("（mock）{category}：Choose the word closest in meaning to \"diligent\"."),
        options: vec![
            "lazy".to_string(),
            "hardworking".to_string(),
            "careless".to_string(),
            "timid".to_string(),
        ],
        correct_answer: "hardworking".to_string(),
        explanation: "diligent 意为勤奋的，与 hardworking 同义。".to_string(),
    }
}
