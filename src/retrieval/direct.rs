use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use super::RetrievalStrategy;
use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::types::{ContentOrigin, ScrapedContent, SearchResult};
use crate::utils::text::{extract_title, strip_html, truncate_chars};

/// 直接抓取网页并提取可读正文
pub struct DirectFetch {
    http: reqwest::Client,
    timeout_seconds: u64,
    max_body_chars: usize,
    min_body_chars: usize,
}

impl DirectFetch {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            timeout_seconds: config.timeout_seconds,
            max_body_chars: config.max_body_chars,
            min_body_chars: config.min_body_chars,
        })
    }

    /// 从HTML中提取标题与正文
    pub fn parse_page(
        &self,
        result: &SearchResult,
        html: &str,
    ) -> Result<ScrapedContent, FetchError> {
        let text = strip_html(html);
        if text.chars().count() < self.min_body_chars {
            return Err(FetchError::Unusable(format!(
                "page body too short ({} chars)",
                text.chars().count()
            )));
        }

        Ok(ScrapedContent {
            url: result.url.clone(),
            title: extract_title(html).unwrap_or_else(|| result.title.clone()),
            content: truncate_chars(&text, self.max_body_chars),
            success: true,
            error: None,
            origin: ContentOrigin::Direct,
        })
    }
}

#[async_trait]
impl RetrievalStrategy for DirectFetch {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn fetch(&self, result: &SearchResult) -> Result<ScrapedContent, FetchError> {
        let response = self.http.get(&result.url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_seconds)
            } else {
                FetchError::Http(e)
            }
        })?;

        if !response.status().is_success() {
            return Err(FetchError::Api {
                status: response.status().as_u16(),
            });
        }

        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_seconds)
            } else {
                FetchError::Http(e)
            }
        })?;
        self.parse_page(result, &html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::ContentRetriever;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(max_body_chars: usize, min_body_chars: usize) -> DirectFetch {
        DirectFetch::new(&FetchConfig {
            max_body_chars,
            min_body_chars,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_parse_page_strips_markup_and_caps_length() {
        let result = SearchResult::new("Fallback title", "https://news.example/acme", "");
        let html = format!(
            "<html><head><title>Acme Corp Breach</title><script>track()</script></head><body><p>{}</p></body></html>",
            "exposed records ".repeat(50)
        );

        let content = fetcher(100, 20).parse_page(&result, &html).unwrap();
        assert_eq!(content.title, "Acme Corp Breach");
        assert_eq!(content.content.chars().count(), 100);
        assert!(!content.content.contains("track()"));
        assert_eq!(content.origin, ContentOrigin::Direct);
    }

    #[test]
    fn test_parse_page_rejects_thin_pages() {
        let result = SearchResult::new("Acme", "https://news.example/acme", "");
        let err = fetcher(8000, 200)
            .parse_page(&result, "<html><body>Access denied</body></html>")
            .unwrap_err();
        assert!(matches!(err, FetchError::Unusable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let result = SearchResult::new("Acme", "http://127.0.0.1:9/acme", "");
        assert!(fetcher(8000, 200).fetch(&result).await.is_err());
    }

    #[tokio::test]
    async fn test_slow_page_routes_to_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/acme"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>late</body></html>")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let direct = DirectFetch::new(&FetchConfig {
            timeout_seconds: 1,
            ..Default::default()
        })
        .unwrap();
        let retriever = ContentRetriever::new(vec![Arc::new(direct)]);
        let result = SearchResult::new("Acme", format!("{}/acme", server.uri()), "");

        let content = retriever.retrieve(&result).await;
        assert_eq!(content.origin, ContentOrigin::Fallback);
        assert!(content.success);
        assert!(content.error.unwrap().starts_with("direct:"));
    }
}
