use crate::search::ContentCategory;
use crate::types::{ContentOrigin, ScrapedContent, SearchResult};

const BREACH_CONTEXT: &str = "Breach disclosures of this kind typically follow a common pattern: \
unauthorized access is detected, forensic investigators are engaged to determine scope, and \
notification letters are sent to affected individuals and state regulators once the exposed \
records have been identified. Organizations usually offer credit monitoring and identity \
protection services, and the period between intrusion and public disclosure often spans \
several weeks to months.";

const DEMOGRAPHIC_ANALYSIS: &str = "Demographic analysis: the affected population usually mirrors \
the organization's active customer base. Adults aged 25 to 54 form the largest share of exposed \
records in consumer-facing breaches, while older customers are disproportionately targeted by \
follow-on phishing and fraud. Household income, regional concentration and account tenure \
determine how much value the exposed records carry on secondary markets.";

const FINANCIAL_ANALYSIS: &str = "Financial analysis: industry benchmarks place the average cost \
of a breached record between 150 and 180 dollars, covering detection, notification, legal \
counsel and remediation. Regulatory penalties, class-action settlements and elevated customer \
acquisition costs can extend the financial impact for several reporting periods, and publicly \
traded companies frequently see short-term pressure on their share price.";

const MARKET_ANALYSIS: &str = "Market analysis: competitors commonly use a rival's security \
incident to emphasize their own data protection practices. Customer churn after a breach tends \
to concentrate among high-value, digitally engaged segments, creating acquisition opportunities \
for alternatives with comparable offerings and a stronger trust narrative.";

/// 合成兜底正文，保证离线时每个来源也有可用内容
#[derive(Debug, Default, Clone)]
pub struct FallbackComposer;

impl FallbackComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(&self, result: &SearchResult) -> ScrapedContent {
        let mut sections = vec![format!("# {}", result.title)];
        if !result.snippet.trim().is_empty() {
            sections.push(result.snippet.trim().to_string());
        }
        sections.push(BREACH_CONTEXT.to_string());

        let signal = format!("{} {} {}", result.title, result.snippet, result.url);
        for category in ContentCategory::detect(&signal) {
            sections.push(
                match category {
                    ContentCategory::Demographic => DEMOGRAPHIC_ANALYSIS,
                    ContentCategory::Financial => FINANCIAL_ANALYSIS,
                    ContentCategory::Market => MARKET_ANALYSIS,
                }
                .to_string(),
            );
        }

        ScrapedContent {
            url: result.url.clone(),
            title: result.title.clone(),
            content: sections.join("\n\n"),
            success: true,
            error: None,
            origin: ContentOrigin::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_includes_title_and_snippet() {
        let result = SearchResult::new(
            "Acme Corp Notifies Customers",
            "https://news.example/acme",
            "Acme Corp is notifying 150,000 customers.",
        );
        let content = FallbackComposer::new().compose(&result);

        assert!(content.success);
        assert_eq!(content.origin, ContentOrigin::Fallback);
        assert!(content.content.starts_with("# Acme Corp Notifies Customers"));
        assert!(content.content.contains("150,000 customers"));
        assert!(content.content.contains("forensic investigators"));
        assert!(!content.content.contains("Market analysis"));
    }

    #[test]
    fn test_compose_selects_category_paragraphs() {
        let result = SearchResult::new(
            "Acme Corp Competitors and Market Share",
            "https://www.reuters.com/business/acme-corp-breach-financial-impact/",
            "",
        );
        let content = FallbackComposer::new().compose(&result).content;

        assert!(content.contains("Financial analysis"));
        assert!(content.contains("Market analysis"));
        assert!(!content.contains("Demographic analysis"));
    }
}
