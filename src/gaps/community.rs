//! Community gap collector: frequently asked topics without docs.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::CollectionFailure;

use super::{categorize, infer_doc_type, CollectFuture, DocType, Gap, GapCollector, GapSource};

/// Minimum number of questions in a topic bucket before it becomes a
/// gap. Below this, a topic is noise rather than a pattern.
pub const MIN_TOPIC_REPEATS: usize = 3;

/// Collects recent community questions from a Discourse-style JSON
/// topic feed and proposes one gap per repeated topic category.
pub struct CommunityCollector {
    client: reqwest::Client,
    feed_url: String,
    min_repeats: usize,
    now: DateTime<Utc>,
}

/// Shape of a Discourse `/c/<category>.json` topic listing. Only the
/// fields the collector reads.
#[derive(Debug, Deserialize)]
struct TopicFeed {
    topic_list: TopicList,
}

#[derive(Debug, Deserialize)]
struct TopicList {
    topics: Vec<Topic>,
}

#[derive(Debug, Deserialize)]
struct Topic {
    title: String,
}

impl CommunityCollector {
    /// Creates a collector fetching from the given topic-feed URL.
    #[must_use]
    pub fn new(feed_url: String, min_repeats: usize, now: DateTime<Utc>) -> Self {
        Self { client: reqwest::Client::new(), feed_url, min_repeats, now }
    }

    async fn fetch_titles(&self) -> Result<Vec<String>, CollectionFailure> {
        let fail = |cause: String| CollectionFailure { collector: "community", cause };

        let response = self
            .client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|e| fail(format!("request to {} failed: {e}", self.feed_url)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("{} returned HTTP {status}", self.feed_url)));
        }
        let feed: TopicFeed = response
            .json()
            .await
            .map_err(|e| fail(format!("unexpected feed shape from {}: {e}", self.feed_url)))?;
        Ok(feed.topic_list.topics.into_iter().map(|t| t.title).collect())
    }
}

impl GapCollector for CommunityCollector {
    fn name(&self) -> &'static str {
        "community"
    }

    fn collect(&self) -> CollectFuture<'_> {
        Box::pin(async move {
            let titles = self.fetch_titles().await?;
            Ok(bucket_topics(&titles, self.min_repeats, self.now))
        })
    }
}

/// Buckets question titles by topic category and proposes one gap per
/// bucket at or above the repetition threshold.
///
/// Output is ordered by bucket size descending, then category name, so
/// identical inputs produce identical gap lists.
#[must_use]
pub fn bucket_topics(titles: &[String], min_repeats: usize, now: DateTime<Utc>) -> Vec<Gap> {
    let mut buckets: Vec<(&'static str, Vec<&str>)> = Vec::new();
    for title in titles {
        let category = categorize(title);
        match buckets.iter_mut().find(|(c, _)| *c == category) {
            Some((_, bucket)) => bucket.push(title),
            None => buckets.push((category, vec![title])),
        }
    }

    buckets.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(b.0)));

    buckets
        .into_iter()
        .filter(|(_, bucket)| bucket.len() >= min_repeats)
        .map(|(category, bucket)| {
            let doc_type = majority_doc_type(&bucket);
            let count = bucket.len();
            Gap::new(
                GapSource::Community,
                format!("Frequently asked: {category}"),
                format!(
                    "{count} recent community questions about {category} \
                     (e.g. \"{}\").",
                    bucket[0]
                ),
                doc_type,
                i64::try_from(count).unwrap_or(i64::MAX),
                now,
            )
        })
        .collect()
}

/// The most common inferred doc type across a bucket's questions.
fn majority_doc_type(titles: &[&str]) -> DocType {
    let candidates = [
        DocType::Troubleshooting,
        DocType::HowTo,
        DocType::Concept,
        DocType::Reference,
        DocType::Tutorial,
    ];
    let mut best = DocType::HowTo;
    let mut best_count = 0;
    for candidate in candidates {
        let count = titles.iter().filter(|t| infer_doc_type(t) == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}
