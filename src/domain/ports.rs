use crate::domain::review::Review;
use anyhow::Result;
use async_trait::async_trait;

/// One page of reviews plus the token to request the next one.
#[derive(Debug, Clone, Default)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub continuation: Option<String>,
}

/// Query for reviews of a single app in a single store front.
#[derive(Debug, Clone)]
pub struct ReviewQuery {
    pub app_id: String,
    pub country: String,
    pub lang: String,
    pub count: usize,
}

#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetch one page of at most `page_size` reviews, starting at `continuation` when given.
    async fn fetch_page(
        &self,
        query: &ReviewQuery,
        page_size: usize,
        continuation: Option<&str>,
    ) -> Result<ReviewPage>;

    /// Page through the source until `query.count` reviews are collected or the source runs dry.
    async fn fetch_reviews(&self, query: &ReviewQuery) -> Result<Vec<Review>> {
        let mut collected = Vec::with_capacity(query.count);
        let mut token: Option<String> = None;

        while collected.len() < query.count {
            let remaining = query.count - collected.len();
            let page = self
                .fetch_page(query, remaining.min(self.max_page_size()), token.as_deref())
                .await?;

            if page.reviews.is_empty() {
                break;
            }
            collected.extend(page.reviews);

            match page.continuation {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        collected.truncate(query.count);
        Ok(collected)
    }

    fn max_page_size(&self) -> usize;
}
