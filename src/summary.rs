use crate::QueryResult;
use std::fmt;

/// Mention counts over a set of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionSummary {
    pub total: usize,
    pub company: usize,
    pub product: usize,
    pub url: usize,
}

impl MentionSummary {
    /// Counts mentions across `results`, or `None` when there is nothing to count.
    pub fn from_results(results: &[QueryResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        Some(Self {
            total: results.len(),
            company: results.iter().filter(|r| r.company_mentioned).count(),
            product: results.iter().filter(|r| r.any_product_mentioned()).count(),
            url: results.iter().filter(|r| r.url_mentioned).count(),
        })
    }

    fn rate(&self, count: usize) -> f64 {
        count as f64 / self.total as f64 * 100.0
    }

    pub fn company_rate(&self) -> f64 {
        self.rate(self.company)
    }

    pub fn product_rate(&self) -> f64 {
        self.rate(self.product)
    }

    pub fn url_rate(&self) -> f64 {
        self.rate(self.url)
    }
}

impl fmt::Display for MentionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Company mention rate: {:.1}%", self.company_rate())?;
        writeln!(f, "Product mention rate: {:.1}%", self.product_rate())?;
        write!(f, "URL mention rate: {:.1}%", self.url_rate())
    }
}

/// Renders the console summary for `results`.
pub fn render_summary(results: &[QueryResult]) -> String {
    match MentionSummary::from_results(results) {
        Some(summary) => summary.to_string(),
        None => "No results to summarize".to_string(),
    }
}

/// Prints the mention rates of `results`.
pub fn print_summary(results: &[QueryResult]) {
    println!("\n=== Mention Summary ===");
    println!("{}", render_summary(results));
}
