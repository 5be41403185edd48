use async_trait::async_trait;
use std::collections::HashSet;

use crate::research::context::ResearchContext;
use crate::types::{BreachRecord, PhaseBundle, PhaseKind, SearchResult};

/// 按URL去重（保留首次出现），再截断到 `cap` 条
pub fn dedup_and_cap(pool: Vec<SearchResult>, cap: usize) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    pool.into_iter()
        .filter(|result| seen.insert(result.url.clone()))
        .take(cap)
        .collect()
}

/// 调研阶段：查询模板 → 搜索 → top-K → 去重截断 → 分批检索
#[async_trait]
pub trait ResearchPhase: Send + Sync {
    fn kind(&self) -> PhaseKind;

    /// 按顺序排列的查询，机构名总是第一个被引号包裹的部分
    fn queries(&self, breach: &BreachRecord) -> Vec<String>;

    /// 每个查询保留的结果数
    fn results_per_query(&self) -> usize;

    /// 去重后的来源上限
    fn max_sources(&self) -> usize;

    /// 顺序执行各查询，保证重复URL以模板顺序中的首次出现为准
    async fn collect_sources(
        &self,
        context: &ResearchContext,
        breach: &BreachRecord,
    ) -> Vec<SearchResult> {
        let mut pool = Vec::new();
        for query in self.queries(breach) {
            let results = context.search.search(&query).await;
            pool.extend(results.into_iter().take(self.results_per_query()));
        }
        dedup_and_cap(pool, self.max_sources())
    }

    async fn execute(&self, context: &ResearchContext, breach: &BreachRecord) -> PhaseBundle {
        let sources = self.collect_sources(context, breach).await;
        let scraped = context.fetcher.fetch_all(&sources).await;
        PhaseBundle::new(self.kind(), sources, scraped)
    }
}

/// 查询中使用的机构名引用形式
pub(crate) fn quoted(breach: &BreachRecord) -> String {
    format!("\"{}\"", breach.organization_name.replace('"', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_url_kept_at_first_occurrence() {
        let pool = vec![
            SearchResult::new("A", "https://a.example", "from template 1"),
            SearchResult::new("B", "https://b.example", "from template 1"),
            SearchResult::new("A again", "https://a.example", "from template 2"),
            SearchResult::new("C", "https://c.example", "from template 2"),
        ];

        let deduped = dedup_and_cap(pool, 10);
        assert_eq!(deduped.len(), 3);
        assert_eq!(deduped[0].title, "A");
        assert_eq!(deduped[0].snippet, "from template 1");
        assert_eq!(deduped[1].url, "https://b.example");
        assert_eq!(deduped[2].url, "https://c.example");
    }

    #[test]
    fn test_cap_applies_after_dedup() {
        let pool = vec![
            SearchResult::new("A", "https://a.example", ""),
            SearchResult::new("A", "https://a.example", ""),
            SearchResult::new("B", "https://b.example", ""),
            SearchResult::new("C", "https://c.example", ""),
        ];

        let capped = dedup_and_cap(pool, 2);
        let urls: Vec<&str> = capped.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_quoted_strips_inner_quotes() {
        let breach = BreachRecord::new(1, "The \"Best\" Bank");
        assert_eq!(quoted(&breach), "\"The Best Bank\"");
    }
}
