use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::BankError;

/// Which residence-card exam a bank file belongs to
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    /// carte de séjour pluriannuelle
    #[default]
    #[strum(serialize = "CSP")]
    Csp,
    /// carte de résident
    #[strum(serialize = "CR")]
    Cr,
}

impl CardType {
    pub fn file_name(&self) -> String {
        format!("{self}.JSON")
    }

    pub fn bank_path<P: AsRef<Path>>(&self, dir: P) -> PathBuf {
        dir.as_ref().join(self.file_name())
    }
}

/// A question exactly as authored in a bank file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankQuestion {
    pub question: String,
    #[serde(rename = "choix", default)]
    pub choices: Vec<String>,
    #[serde(rename = "reponse_correcte")]
    pub correct_answer: String,
    #[serde(rename = "indice", default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl BankQuestion {
    /// The correct answer must be one of the offered choices.
    pub fn is_well_formed(&self) -> bool {
        self.choices.iter().any(|c| c == &self.correct_answer)
    }
}

/// A question as it lives inside a session: stamped with a theme label and
/// holding the user's answer once given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub question: String,
    pub choices: Vec<String>,
    pub correct_answer: String,
    pub hint: Option<String>,
    pub theme_label: String,
    pub(crate) user_answer: Option<String>,
}

impl QuestionRecord {
    pub fn new(
        question: String,
        choices: Vec<String>,
        correct_answer: String,
        hint: Option<String>,
        theme_label: String,
    ) -> Self {
        Self {
            question,
            choices,
            correct_answer,
            hint,
            theme_label,
            user_answer: None,
        }
    }

    pub fn stamped(entry: &BankQuestion, theme_label: &str) -> Self {
        Self::new(
            entry.question.clone(),
            entry.choices.clone(),
            entry.correct_answer.clone(),
            entry.hint.clone(),
            theme_label.to_string(),
        )
    }

    pub fn user_answer(&self) -> Option<&str> {
        self.user_answer.as_deref()
    }

    pub fn is_answered(&self) -> bool {
        self.user_answer.is_some()
    }

    pub fn is_answered_correctly(&self) -> bool {
        self.user_answer.as_deref() == Some(self.correct_answer.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTheme {
    pub key: String,
    pub questions: Vec<BankQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub key: String,
    pub sub_themes: Vec<SubTheme>,
}

impl Block {
    /// Every question of every sub-theme, in stored order
    pub fn flattened(&self) -> Vec<BankQuestion> {
        self.sub_themes
            .iter()
            .flat_map(|s| s.questions.iter().cloned())
            .collect()
    }
}

/// Read-only catalogue: blocks → sub-themes → questions, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    blocks: Vec<Block>,
    rejected: usize,
}

impl QuestionBank {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bank = Self::from_json_str(&text)?;
        info!(
            path = %path.display(),
            blocks = bank.blocks.len(),
            questions = bank.question_count(),
            rejected = bank.rejected,
            "loaded question bank"
        );
        Ok(bank)
    }

    pub fn from_json_str(text: &str) -> Result<Self, BankError> {
        let root: Map<String, Value> = serde_json::from_str(text)?;
        Self::from_map(root)
    }

    fn from_map(root: Map<String, Value>) -> Result<Self, BankError> {
        let mut blocks = Vec::with_capacity(root.len());
        let mut rejected = 0;

        for (block_key, block_value) in root {
            let Value::Object(sub_map) = block_value else {
                return Err(BankError::Shape(format!(
                    "block {block_key} is not an object"
                )));
            };

            let mut sub_themes = Vec::with_capacity(sub_map.len());
            for (sub_key, pool) in sub_map {
                if !pool.is_array() {
                    return Err(BankError::Shape(format!(
                        "sub-theme {sub_key} of block {block_key} is not a list"
                    )));
                }
                let entries: Vec<BankQuestion> = serde_json::from_value(pool)?;
                let total = entries.len();
                let questions: Vec<BankQuestion> =
                    entries.into_iter().filter(BankQuestion::is_well_formed).collect();
                if questions.len() < total {
                    let dropped = total - questions.len();
                    warn!(
                        block = %block_key,
                        sub_theme = %sub_key,
                        dropped,
                        "rejected questions whose answer is not among the choices"
                    );
                    rejected += dropped;
                }
                sub_themes.push(SubTheme {
                    key: sub_key,
                    questions,
                });
            }

            blocks.push(Block {
                key: block_key,
                sub_themes,
            });
        }

        Ok(Self { blocks, rejected })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, key: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.key == key)
    }

    /// Sub-theme keys form a flat namespace: the first match in any block wins.
    pub fn sub_theme(&self, key: &str) -> Option<&[BankQuestion]> {
        self.blocks
            .iter()
            .flat_map(|b| b.sub_themes.iter())
            .find(|s| s.key == key)
            .map(|s| s.questions.as_slice())
    }

    pub fn question_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|b| b.sub_themes.iter())
            .map(|s| s.questions.len())
            .sum()
    }

    /// Number of records dropped at load time for being unanswerable
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}
