use crate::types::{BreachRecord, DamageEstimate, PhaseBundle};
use crate::utils::text::truncate_chars;

/// 报告必须包含的章节，按顺序
pub const REQUIRED_SECTIONS: [&str; 6] = [
    "Executive Summary",
    "Breach Impact",
    "Commercial & Financial Impact",
    "Competitive Intelligence",
    "Recommendations by Audience",
    "Sources",
];

const SYSTEM_PROMPT: &str = "You are a senior business-intelligence analyst specialising in data breaches. \
You write factual, well-structured Markdown reports for executives, security teams, marketers and investors. \
Only cite sources that appear in the research material you are given, and cite them inline as [title](url). \
When the material is thin, say so instead of inventing facts.";

/// 报告提示词构建器
pub struct ReportPromptBuilder {
    excerpt_chars: usize,
}

impl ReportPromptBuilder {
    pub fn new(excerpt_chars: usize) -> Self {
        Self { excerpt_chars }
    }

    /// 构建系统提示词和用户提示词
    pub fn build_prompts(&self, breach: &BreachRecord, bundles: &[PhaseBundle]) -> (String, String) {
        (SYSTEM_PROMPT.to_string(), self.build_user_prompt(breach, bundles))
    }

    fn build_user_prompt(&self, breach: &BreachRecord, bundles: &[PhaseBundle]) -> String {
        let mut prompt = format!(
            "Write a business-intelligence report on the data breach at {}.\n\n",
            breach.organization_name
        );

        prompt.push_str(&self.format_breach_record(breach));

        if let Some(estimate) = bundles.iter().find_map(|b| b.damage_estimate.as_ref()) {
            prompt.push_str(&self.format_damage_estimate(estimate));
        }

        prompt.push_str("## Research Material\n\n");
        for bundle in bundles {
            prompt.push_str(&self.format_phase(bundle));
        }

        prompt.push_str(&self.format_instructions());
        prompt
    }

    /// 泄露记录的规范字段
    fn format_breach_record(&self, breach: &BreachRecord) -> String {
        let mut content = String::from("## Breach Record\n");
        content.push_str(&format!("- Organization: {}\n", breach.organization_name));
        content.push_str(&format!(
            "- Affected individuals: {}\n",
            breach
                .known_affected()
                .map(format_count)
                .unwrap_or_else(|| "not disclosed".to_string())
        ));
        if let Some(date) = breach.breach_date {
            content.push_str(&format!("- Breach date: {}\n", date));
        }
        if let Some(date) = breach.reported_date {
            content.push_str(&format!("- Reported date: {}\n", date));
        }
        if let Some(leaked) = &breach.what_was_leaked {
            content.push_str(&format!("- Data exposed: {}\n", leaked));
        }
        if let Some(source) = &breach.source_name {
            match &breach.source_type {
                Some(kind) => content.push_str(&format!("- Notification source: {} ({})\n", source, kind)),
                None => content.push_str(&format!("- Notification source: {}\n", source)),
            }
        }
        for url in &breach.document_urls {
            content.push_str(&format!("- Notice document: {}\n", url));
        }
        content.push('\n');
        content
    }

    fn format_damage_estimate(&self, estimate: &DamageEstimate) -> String {
        format!(
            "## Damage Estimate (model-based, {} confidence)\n\
             - Records: {}\n\
             - Direct cost: ${} (${:.2} per record)\n\
             - Regulatory exposure: ${}\n\
             - Brand damage: ${}\n\
             - Total: ${}\n\n",
            estimate.confidence,
            format_count(estimate.affected_count),
            format_count(estimate.direct_cost.round() as u64),
            estimate.cost_per_record,
            format_count(estimate.regulatory_cost.round() as u64),
            format_count(estimate.brand_damage_cost.round() as u64),
            format_count(estimate.total.round() as u64),
        )
    }

    /// 阶段的来源列表与正文摘录
    fn format_phase(&self, bundle: &PhaseBundle) -> String {
        let mut content = format!("### {}\n", bundle.phase.title());

        content.push_str("Sources:\n");
        for (i, result) in bundle.search_results.iter().enumerate() {
            content.push_str(&format!("{}. [{}]({})", i + 1, result.title, result.url));
            if let Some(date) = &result.published_date {
                content.push_str(&format!(" ({})", date));
            }
            content.push_str(&format!(" - {}\n", result.snippet));
        }

        content.push_str("\nExcerpts:\n");
        for scraped in &bundle.scraped_content {
            content.push_str(&format!(
                "#### {} <{}>\n{}\n\n",
                scraped.title,
                scraped.url,
                truncate_chars(&scraped.content, self.excerpt_chars)
            ));
        }
        content
    }

    fn format_instructions(&self) -> String {
        let mut content = String::from("## Instructions\nStructure the report with these sections, in order:\n");
        for (i, section) in REQUIRED_SECTIONS.iter().enumerate() {
            content.push_str(&format!("{}. ## {}\n", i + 1, section));
        }
        content.push_str(
            "\nBreach Impact covers the affected demographics and the value of the data types exposed. \
             Recommendations by Audience addresses executives, security teams, marketers and investors separately. \
             Cite every factual claim inline as [title](url) using only the sources listed above, \
             and list all cited sources under Sources.\n",
        );
        content
    }
}

/// 千分位格式化
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::DamageModel;
    use crate::types::{ContentOrigin, PhaseKind, ScrapedContent, SearchResult};

    fn bundle(phase: PhaseKind, body: &str) -> PhaseBundle {
        let result = SearchResult::new("Acme notice", "https://news.example/acme", "Acme disclosed");
        let scraped = ScrapedContent {
            url: result.url.clone(),
            title: result.title.clone(),
            content: body.to_string(),
            success: true,
            error: None,
            origin: ContentOrigin::Direct,
        };
        PhaseBundle::new(phase, vec![result], vec![scraped])
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(150_000), "150,000");
        assert_eq!(format_count(31_837_500), "31,837,500");
    }

    #[test]
    fn test_prompt_contains_record_sources_and_sections() {
        let mut breach = BreachRecord::new(42, "Acme Corp");
        breach.affected_individuals = Some(150_000);
        breach.what_was_leaked = Some("names, SSNs".to_string());

        let damage = bundle(PhaseKind::DamageAssessment, "cost details")
            .with_damage_estimate(DamageModel::default().estimate(Some(150_000)));
        let bundles = vec![bundle(PhaseKind::BreachFacts, "facts"), damage];

        let (system, user) = ReportPromptBuilder::new(1500).build_prompts(&breach, &bundles);

        assert!(system.contains("[title](url)"));
        assert!(user.contains("Acme Corp"));
        assert!(user.contains("150,000"));
        assert!(user.contains("names, SSNs"));
        assert!(user.contains("[Acme notice](https://news.example/acme)"));
        assert!(user.contains("$31,837,500"));
        assert!(user.contains("medium confidence"));
        for section in REQUIRED_SECTIONS {
            assert!(user.contains(&format!("## {}", section)));
        }
    }

    #[test]
    fn test_excerpts_are_truncated() {
        let breach = BreachRecord::new(1, "Acme Corp");
        let long_body = "x".repeat(2000);
        let bundles = vec![bundle(PhaseKind::BreachFacts, &long_body)];

        let (_, user) = ReportPromptBuilder::new(1500).build_prompts(&breach, &bundles);

        assert!(user.contains(&"x".repeat(1500)));
        assert!(!user.contains(&"x".repeat(1501)));
        assert!(user.contains("not disclosed"));
    }
}
