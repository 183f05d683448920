use crate::MonitorConfig;

/// Lowercases every character independently, without locale-specific folding.
fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Returns `true` if `needle` occurs in `haystack` ignoring case.
///
/// An empty needle is always contained.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}

/// What an answer says about the configured company, products and domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mentions {
    pub company: bool,
    /// Matched product names, a sub-sequence of the configured list.
    pub products: Vec<String>,
    pub url: bool,
}

/// The `MentionAnalyzer` struct checks answer texts against the configured terms.
#[derive(Debug, Clone)]
pub struct MentionAnalyzer<'a> {
    company_name: &'a str,
    product_names: &'a [String],
    domain_name: &'a str,
}

impl<'a> MentionAnalyzer<'a> {
    pub fn new(company_name: &'a str, product_names: &'a [String], domain_name: &'a str) -> Self {
        Self {
            company_name,
            product_names,
            domain_name,
        }
    }

    pub fn from_config(config: &'a MonitorConfig) -> Self {
        Self::new(&config.company_name, &config.product_names, &config.domain_name)
    }

    /// Analyzes an answer text.
    ///
    /// # Arguments
    ///
    /// * `text` - The answer returned by the model.
    ///
    /// # Returns
    ///
    /// The `Mentions` found in the text.
    pub fn analyze(&self, text: &str) -> Mentions {
        let text = fold_case(text);
        let found = |term: &str| text.contains(&fold_case(term));

        Mentions {
            company: found(self.company_name),
            products: self
                .product_names
                .iter()
                .filter(|product| found(product))
                .cloned()
                .collect(),
            url: found(self.domain_name),
        }
    }
}
