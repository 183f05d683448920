use crate::analyzer::MentionAnalyzer;
use crate::{ContentGenerator, MonitorConfig, QueryResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// The `Monitor` struct runs every configured query through a `ContentGenerator`
/// and records the mentions found in each answer.
pub struct Monitor<'a, G> {
    generator: G,
    config: &'a MonitorConfig,
    /// The pause between two consecutive queries.
    delay: Duration,
    progress: ProgressBar,
}

impl<'a, G: ContentGenerator> Monitor<'a, G> {
    pub fn new(generator: G, config: &'a MonitorConfig) -> Self {
        let progress = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            progress.set_style(style);
        }

        Self {
            generator,
            config,
            delay: crate::REQUEST_DELAY,
            progress,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Hides the spinner, for non-interactive use.
    pub fn quiet(mut self) -> Self {
        self.progress = ProgressBar::hidden();
        self
    }

    /// Sends every configured query in order, one at a time.
    ///
    /// Failed queries are logged and skipped; they are never retried.
    ///
    /// # Returns
    ///
    /// One `QueryResult` per query that was answered, in query order.
    pub async fn run(&self) -> Vec<QueryResult> {
        let analyzer = MentionAnalyzer::from_config(self.config);
        let total = self.config.queries.len();
        let mut results = Vec::with_capacity(total);

        for (i, query) in self.config.queries.iter().enumerate() {
            self.progress
                .set_message(format!("[{}/{}] Asking '{}'...", i + 1, total, query));

            match self.generator.ask(query).await {
                Ok(answer) => {
                    let mentions = analyzer.analyze(&answer);
                    info!(
                        query = %query,
                        company = mentions.company,
                        products = mentions.products.len(),
                        url = mentions.url,
                        "Query answered"
                    );
                    results.push(QueryResult::new(query.as_str(), answer, mentions));
                }
                Err(e) => {
                    warn!("Error while processing query '{}': {}", query, e);
                }
            }

            if i + 1 < total && !self.delay.is_zero() {
                sleep(self.delay).await;
            }
        }

        self.progress.finish_with_message(format!(
            "Completed: {} of {} queries answered",
            results.len(),
            total
        ));
        results
    }
}
