use rand::Rng;
use tracing::{info, warn};

use crate::bank::{QuestionBank, QuestionRecord};
use crate::error::BuildError;
use crate::generator::{fetch_situational, QuestionGenerator};
use crate::quota::{QuotaEntry, SIMULATION_QUOTAS};
use crate::sampler::pick_with_rng;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimulationConfig {
    pub timed: bool,
    pub situational: bool,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    pub theme_key: String,
    pub count: usize,
    pub label: String,
}

/// Resolved settings for one quiz
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizConfiguration {
    Simulation(SimulationConfig),
    Theme(ThemeConfig),
}

impl QuizConfiguration {
    /// Only simulations can run against the clock
    pub fn is_timed(&self) -> bool {
        matches!(self, QuizConfiguration::Simulation(SimulationConfig { timed: true, .. }))
    }
}

/// Assembles the ordered question list of a session from a bank
pub struct SessionBuilder<'a> {
    bank: &'a QuestionBank,
    quotas: &'a [QuotaEntry],
    generator: Option<&'a dyn QuestionGenerator>,
}

impl<'a> SessionBuilder<'a> {
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self {
            bank,
            quotas: &SIMULATION_QUOTAS,
            generator: None,
        }
    }

    pub fn with_quotas(mut self, quotas: &'a [QuotaEntry]) -> Self {
        self.quotas = quotas;
        self
    }

    pub fn with_generator(mut self, generator: &'a dyn QuestionGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    pub async fn build(&self, config: &QuizConfiguration) -> Result<Vec<QuestionRecord>, BuildError> {
        let questions = match config {
            QuizConfiguration::Simulation(sim) if sim.situational => {
                self.build_situational(sim.api_key.as_deref()).await?
            }
            QuizConfiguration::Simulation(_) => {
                self.simulation_with_rng(&mut rand::thread_rng())
            }
            QuizConfiguration::Theme(theme) => self.theme_with_rng(theme, &mut rand::thread_rng())?,
        };

        if questions.is_empty() {
            return Err(BuildError::EmptySession);
        }
        info!(questions = questions.len(), "built question set");
        Ok(questions)
    }

    async fn build_situational(
        &self,
        api_key: Option<&str>,
    ) -> Result<Vec<QuestionRecord>, BuildError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(BuildError::MissingApiKey)?;
        let generator = self.generator.ok_or(BuildError::GeneratorUnavailable)?;

        let mut questions = self.simulation_with_rng(&mut rand::thread_rng());
        let situational = fetch_situational(generator, api_key).await;
        if situational.is_empty() {
            return Err(BuildError::NoSituationalQuestions);
        }

        questions.extend(situational);
        Ok(questions)
    }

    /// Quota-table questions, in table order
    pub fn simulation_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<QuestionRecord> {
        let mut questions = Vec::with_capacity(crate::quota::total(self.quotas));
        for entry in self.quotas {
            match self.bank.sub_theme(entry.sub_theme) {
                Some(pool) => {
                    if pool.len() < entry.count {
                        warn!(
                            sub_theme = entry.sub_theme,
                            wanted = entry.count,
                            available = pool.len(),
                            "sub-theme has fewer questions than its quota"
                        );
                    }
                    questions.extend(pick_with_rng(pool, entry.count, entry.label, rng));
                }
                None => warn!(sub_theme = entry.sub_theme, "sub-theme missing from bank"),
            }
        }
        questions
    }

    /// Every sub-theme of one block pooled together, then sampled once
    pub fn theme_with_rng<R: Rng + ?Sized>(
        &self,
        theme: &ThemeConfig,
        rng: &mut R,
    ) -> Result<Vec<QuestionRecord>, BuildError> {
        let block = self
            .bank
            .block(&theme.theme_key)
            .ok_or_else(|| BuildError::UnknownTheme(theme.theme_key.clone()))?;
        let pool = block.flattened();
        Ok(pick_with_rng(&pool, theme.count, &theme.label, rng))
    }
}
