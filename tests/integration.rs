//! HTTP-level tests against a local mock server.
//!
//! Tests that hit the real GitHub and proxy list are marked `#[ignore]`.
//!
//! Run them with: `cargo test --test integration -- --ignored`

use std::sync::Arc;
use std::time::Duration;

use github_crawler::fetcher::{FetchRequest, PageFetcher};
use github_crawler::fetcher_http::HttpFetcher;
use github_crawler::proxy::{FreeProxyList, ProxyListSource, ProxyRotator};
use github_crawler::{
    CrawlerConfig, RotatorConfig, SearchCategory, SearchClient, SearchError, SearchOutcome,
    SearchQuery,
};
use reqwest::header::HeaderMap;
use reqwest::Client;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROXY_TABLE: &str = r#"
    <html><body>
    <table class="table table-striped table-bordered">
        <thead><tr><th>IP Address</th><th>Port</th><th>Code</th></tr></thead>
        <tbody>
            <tr><td>10.0.0.1</td><td>3128</td><td>US</td></tr>
            <tr><td>10.0.0.2</td><td>8080</td><td>FR</td></tr>
        </tbody>
    </table>
    </body></html>
"#;

const RESULTS_PAGE: &str = r#"
    <html><body>
    <div class="search-title"><a class="prc-Link-Link-85e08" href="/dropbox/dropbox-sdk-rust">sdk</a></div>
    <div class="search-title"><a class="prc-Link-Link-85e08" href="/box/box-rust">box</a></div>
    </body></html>
"#;

/// Nothing listens here, so connections are refused.
const DEAD_ADDRESS: &str = "127.0.0.1:1";

mod proxy_list_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_proxy_list_parses_table() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PROXY_TABLE))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = FreeProxyList::new();
        let proxies = source
            .fetch_proxy_list(&format!("{}/", mock_server.uri()), 5)
            .await
            .unwrap();

        assert_eq!(proxies, vec!["10.0.0.1:3128", "10.0.0.2:8080"]);
    }

    #[tokio::test]
    async fn test_fetch_proxy_list_non_200_exhausts_retries() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&mock_server)
            .await;

        let source = FreeProxyList::new();
        let proxies = source.fetch_proxy_list(&mock_server.uri(), 3).await.unwrap();

        assert!(proxies.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_proxy_list_recovers_after_non_200() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .with_priority(1)
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PROXY_TABLE))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = FreeProxyList::new();
        let proxies = source.fetch_proxy_list(&mock_server.uri(), 5).await.unwrap();

        assert_eq!(proxies.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_proxy_list_connection_refused() {
        let source = FreeProxyList::new();
        let result = source
            .fetch_proxy_list(&format!("http://{}/", DEAD_ADDRESS), 5)
            .await;

        assert!(matches!(result, Err(SearchError::ProxyAcquisition(_))));
    }

    #[tokio::test]
    async fn test_fetch_proxy_list_transport_error_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(PROXY_TABLE)
                    .set_delay(Duration::from_secs(3)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let source = FreeProxyList::with_client(client);
        let result = source.fetch_proxy_list(&mock_server.uri(), 5).await;

        assert!(matches!(result, Err(SearchError::ProxyAcquisition(_))));
    }

    #[tokio::test]
    async fn test_fetch_proxy_list_missing_table() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>blocked</body></html>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = FreeProxyList::new();
        let result = source.fetch_proxy_list(&mock_server.uri(), 5).await;

        assert!(matches!(result, Err(SearchError::ProxyAcquisition(_))));
    }

    #[tokio::test]
    async fn test_rotator_from_remote_source() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PROXY_TABLE))
            .mount(&mock_server)
            .await;

        let config = RotatorConfig {
            proxies_source: mock_server.uri(),
            ..Default::default()
        };
        let mut rotator = ProxyRotator::from_source(&FreeProxyList::new(), &config)
            .await
            .unwrap();

        assert_eq!(rotator.len(), 2);
        let proxy = rotator.get_proxy().unwrap();
        assert!(proxy == "http://10.0.0.1:3128" || proxy == "http://10.0.0.2:8080");
    }

    #[tokio::test]
    async fn test_rotator_from_exhausted_source_is_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .expect(2)
            .mount(&mock_server)
            .await;

        let config = RotatorConfig {
            proxies_source: mock_server.uri(),
            get_proxies_retries: 2,
            ..Default::default()
        };
        let mut rotator = ProxyRotator::from_source(&FreeProxyList::new(), &config)
            .await
            .unwrap();

        assert!(rotator.is_empty());
        assert!(matches!(rotator.get_proxy(), Err(SearchError::EmptyPool)));
    }
}

mod http_fetcher_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_direct_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("x-test", "yes"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("x-test", "yes".parse().unwrap());
        let url = format!("{}/page", mock_server.uri());

        let fetcher = HttpFetcher::new("test-agent");
        let body = fetcher
            .fetch(FetchRequest {
                url: &url,
                headers: &headers,
                proxy: None,
                timeout: Duration::from_secs(5),
            })
            .await
            .unwrap();

        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_fails() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let headers = HeaderMap::new();
        let url = mock_server.uri();
        let fetcher = HttpFetcher::new("test-agent");
        let result = fetcher
            .fetch(FetchRequest {
                url: &url,
                headers: &headers,
                proxy: None,
                timeout: Duration::from_secs(5),
            })
            .await;

        match result {
            Err(SearchError::Fetch(message)) => assert!(message.contains("429")),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&mock_server)
            .await;

        let headers = HeaderMap::new();
        let url = mock_server.uri();
        let fetcher = HttpFetcher::new("test-agent");
        let result = fetcher
            .fetch(FetchRequest {
                url: &url,
                headers: &headers,
                proxy: None,
                timeout: Duration::from_millis(200),
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_through_dead_proxy_fails() {
        let headers = HeaderMap::new();
        let proxy = format!("http://{}", DEAD_ADDRESS);
        let fetcher = HttpFetcher::new("test-agent");
        let result = fetcher
            .fetch(FetchRequest {
                url: "http://example.invalid/",
                headers: &headers,
                proxy: Some(proxy.as_str()),
                timeout: Duration::from_secs(5),
            })
            .await;

        assert!(result.is_err());
    }
}

mod search_tests {
    use super::*;

    fn config_for(server: &MockServer) -> CrawlerConfig {
        CrawlerConfig {
            base_url: server.uri(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_search_through_proxy() {
        // The mock server doubles as the HTTP proxy for its own URLs.
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "dropbox box"))
            .and(query_param("type", "repositories"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SearchClient::with_config(config_for(&mock_server)).unwrap();
        let query = SearchQuery::new("dropbox box", SearchCategory::Repositories)
            .with_proxies([mock_server.address().to_string()]);

        let results = client.search(&query).await.unwrap();
        let urls: Vec<String> = results.into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                format!("{}/dropbox/dropbox-sdk-rust", mock_server.uri()),
                format!("{}/box/box-rust", mock_server.uri()),
            ]
        );
    }

    #[tokio::test]
    async fn test_search_dead_proxies_fail_soft() {
        let mock_server = MockServer::start().await;
        let client = SearchClient::with_config(config_for(&mock_server)).unwrap();
        let query = SearchQuery::new("fixed income", SearchCategory::Issues)
            .with_proxies([DEAD_ADDRESS])
            .with_retries(3);

        let outcome = client.search_outcome(&query).await.unwrap();
        assert!(matches!(outcome, SearchOutcome::AllAttemptsFailed { attempts: 3, .. }));
        assert!(client.search(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_with_remote_proxy_source() {
        let list_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PROXY_TABLE))
            .expect(1)
            .mount(&list_server)
            .await;

        struct Recording(Arc<std::sync::Mutex<Vec<String>>>);

        #[async_trait::async_trait]
        impl PageFetcher for Recording {
            async fn fetch(&self, request: FetchRequest<'_>) -> github_crawler::Result<String> {
                self.0
                    .lock()
                    .unwrap()
                    .push(request.proxy.unwrap_or_default().to_string());
                Ok(String::new())
            }
        }

        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut config = CrawlerConfig::default();
        config.rotator.proxies_source = list_server.uri();
        let client = SearchClient::with_config(config)
            .unwrap()
            .with_fetcher(Arc::new(Recording(seen.clone())));

        let results = client
            .search(&SearchQuery::new("unlikely term for test", SearchCategory::Wikis))
            .await
            .unwrap();

        assert!(results.is_empty());
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0] == "http://10.0.0.1:3128" || seen[0] == "http://10.0.0.2:8080");
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_search_with_public_proxies() {
        let client = SearchClient::new().unwrap();
        let query = SearchQuery::new("dropbox box", SearchCategory::Repositories).with_retries(3);
        match client.search_outcome(&query).await {
            Ok(outcome) => println!("Live search outcome: {:?}", outcome),
            Err(e) => println!("Live search failed: {}", e),
        }
    }
}
