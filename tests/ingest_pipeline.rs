// tests/ingest_pipeline.rs
//
// Adapter dispatch, strategy fallback, and batch error isolation, exercised
// against canned upstream payloads.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use post_ingest::http::{HttpBody, HttpFetch};
use post_ingest::{ingest_batch, AdapterError, AdapterSet, FetchMethod, Platform};

const TWEET_LOOKUP: &str = include_str!("fixtures/tweet_lookup.json");
const OEMBED: &str = include_str!("fixtures/oembed.json");
const LINKEDIN_POST: &str = include_str!("fixtures/linkedin_post.html");

const TWEET_URL: &str = "https://x.com/janmarek/status/1826784534531314189";
const LINKEDIN_URL: &str = "https://www.linkedin.com/posts/janmarek_building-in-public";

/// Routes by URL substring; records every request it sees.
struct MockHttp {
    routes: Vec<(&'static str, u16, String)>,
    calls: Mutex<Vec<String>>,
}

impl MockHttp {
    fn new(routes: Vec<(&'static str, u16, String)>) -> Arc<Self> {
        Arc::new(Self {
            routes,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetch for MockHttp {
    async fn get(&self, url: &str, _headers: &[(&str, String)]) -> Result<HttpBody, AdapterError> {
        self.calls.lock().unwrap().push(url.to_string());
        for (needle, status, body) in &self.routes {
            if url.contains(needle) {
                return Ok(HttpBody {
                    status: *status,
                    body: body.clone(),
                });
            }
        }
        Err(AdapterError::Network(format!("no mock route for {url}")))
    }
}

#[tokio::test]
async fn oembed_is_used_when_no_bearer_is_configured() {
    let http = MockHttp::new(vec![("publish.twitter.com", 200, OEMBED.to_string())]);
    let adapters = AdapterSet::standard(http.clone(), None);

    let result = adapters.fetch(TWEET_URL).await.expect("oembed fetch");
    assert_eq!(result.platform, Platform::Twitter);
    assert_eq!(result.method, FetchMethod::Oembed);
    assert_eq!(result.author.as_deref(), Some("Jan Marek"));
    assert_eq!(
        result.content,
        "Shipping a new side project this week & writing up what I learned along the way.\nMore soon\u{2026}"
    );
    assert!(result.warning.is_none());

    let calls = http.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].contains("api.twitter.com"), "official API must not be called");
}

#[tokio::test]
async fn api_is_preferred_when_bearer_is_configured() {
    let http = MockHttp::new(vec![("api.twitter.com", 200, TWEET_LOOKUP.to_string())]);
    let adapters = AdapterSet::standard(http.clone(), Some("token".into()));

    let result = adapters.fetch(TWEET_URL).await.expect("api fetch");
    assert_eq!(result.method, FetchMethod::ApiV2);
    assert_eq!(result.author.as_deref(), Some("Jan Marek (@janmarek)"));
    assert_eq!(
        result.content,
        "Shipping a new side project this week & writing up what I learned along the way. More soon\u{2026}"
    );
    assert!(result.warning.is_none());
    assert_eq!(http.calls().len(), 1);
}

#[tokio::test]
async fn api_failure_falls_back_to_oembed_with_warning() {
    let http = MockHttp::new(vec![
        (
            "api.twitter.com",
            429,
            r#"{"title":"Too Many Requests"}"#.to_string(),
        ),
        ("publish.twitter.com", 200, OEMBED.to_string()),
    ]);
    let adapters = AdapterSet::standard(http.clone(), Some("token".into()));

    let result = adapters.fetch(TWEET_URL).await.expect("fallback fetch");
    assert_eq!(result.method, FetchMethod::Oembed);
    let warning = result.warning.expect("fallback must carry a warning");
    assert!(warning.starts_with("API failed:"), "warning was: {warning}");
    assert!(warning.contains("429"), "warning was: {warning}");
    assert_eq!(http.calls().len(), 2);
}

#[tokio::test]
async fn unparsable_tweet_url_still_falls_back_to_oembed() {
    let http = MockHttp::new(vec![("publish.twitter.com", 200, OEMBED.to_string())]);
    let adapters = AdapterSet::standard(http.clone(), Some("token".into()));

    // No /status/{id} segment, so the API strategy cannot even build a request.
    let result = adapters
        .fetch("https://x.com/janmarek")
        .await
        .expect("fallback fetch");
    assert_eq!(result.method, FetchMethod::Oembed);
    assert!(result.warning.is_some());
    // Only the oEmbed endpoint was hit.
    assert_eq!(http.calls().len(), 1);
}

#[tokio::test]
async fn both_strategies_failing_surfaces_the_embed_error() {
    let http = MockHttp::new(vec![
        ("api.twitter.com", 500, "server error".to_string()),
        ("publish.twitter.com", 404, "Not Found".to_string()),
    ]);
    let adapters = AdapterSet::standard(http, Some("token".into()));

    let err = adapters.fetch(TWEET_URL).await.expect_err("both failed");
    match err {
        AdapterError::Upstream { status, .. } => assert_eq!(status, 404),
        other => panic!("expected the embed strategy's error, got {other}"),
    }
}

#[tokio::test]
async fn linkedin_scrape_reads_open_graph_tags() {
    let http = MockHttp::new(vec![("linkedin.com", 200, LINKEDIN_POST.to_string())]);
    let adapters = AdapterSet::standard(http, None);

    let result = adapters.fetch(LINKEDIN_URL).await.expect("scrape");
    assert_eq!(result.platform, Platform::LinkedIn);
    assert_eq!(result.method, FetchMethod::OpenGraph);
    assert_eq!(result.author, None);
    assert_eq!(
        result.content,
        "Jan Marek on LinkedIn: Six months of building in public - Lessons from six months of shipping every week & talking to users \u{2014} a thread."
    );
}

#[tokio::test]
async fn linkedin_error_status_is_a_scrape_failure() {
    let http = MockHttp::new(vec![("linkedin.com", 503, String::new())]);
    let adapters = AdapterSet::standard(http, None);

    let err = adapters.fetch(LINKEDIN_URL).await.expect_err("scrape fails");
    assert!(matches!(err, AdapterError::ScrapeFailure(_)), "got {err}");
}

#[tokio::test]
async fn batch_isolates_per_item_failures() {
    let http = MockHttp::new(vec![
        ("publish.twitter.com", 200, OEMBED.to_string()),
        ("linkedin.com", 200, LINKEDIN_POST.to_string()),
    ]);
    let adapters = AdapterSet::standard(http, None);

    let urls = vec![
        TWEET_URL.to_string(),
        "https://example.com/post".to_string(),
        LINKEDIN_URL.to_string(),
    ];
    let outcomes = ingest_batch(&adapters, &urls).await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].url, urls[0]);
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(AdapterError::UnsupportedPlatform(_))
    ));
    assert!(outcomes[2].result.is_ok());
}

#[tokio::test]
async fn unknown_platform_never_touches_the_network() {
    let http = MockHttp::new(vec![]);
    let adapters = AdapterSet::standard(http.clone(), None);

    let err = adapters
        .fetch("https://example.com/post")
        .await
        .expect_err("unsupported");
    assert!(matches!(err, AdapterError::UnsupportedPlatform(_)));
    assert!(http.calls().is_empty());
}
