//! Fetcher payload mapping against canned upstream responses.

use mockito::Matcher;

use newsdeck_common::Sector;
use newsdeck_ingest::sources::{ArxivSource, HackerNewsSource, NewsApiSource, NewsSource};

#[tokio::test]
async fn hackernews_maps_hits_and_falls_back_to_item_url() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "hits": [
                    {
                        "title": "Show HN: tiny inference engine",
                        "url": "https://example.com/engine",
                        "objectID": "41001",
                        "created_at_i": 1724600000
                    },
                    {
                        "title": "LLM training run postmortem",
                        "url": null,
                        "objectID": "41002",
                        "created_at_i": 1724600100
                    },
                    {
                        "title": null,
                        "url": "https://example.com/untitled",
                        "objectID": "41003",
                        "created_at_i": 1724600200
                    }
                ]
            }"#,
        )
        .create_async()
        .await;

    let source = HackerNewsSource::new().with_base_url(&server.url());
    let items = source.fetch().await.unwrap();

    mock.assert_async().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].source_url, "https://example.com/engine");
    assert_eq!(
        items[1].source_url,
        "https://news.ycombinator.com/item?id=41002"
    );
    assert!(items.iter().all(|i| i.sector == Sector::Engineering));
}

#[tokio::test]
async fn hackernews_upstream_error_propagates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("upstream down")
        .create_async()
        .await;

    let source = HackerNewsSource::new().with_base_url(&server.url());
    assert!(source.fetch().await.is_err());
}

#[tokio::test]
async fn newsapi_skips_removed_and_fills_image_fallback() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/everything")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "articles": [
                    {
                        "title": "AI chips drive record quarter",
                        "url": "https://example.com/chips",
                        "publishedAt": "2026-08-25T09:30:00Z",
                        "description": "Earnings beat expectations.",
                        "urlToImage": "https://example.com/chips.jpg"
                    },
                    {
                        "title": "[Removed]",
                        "url": "https://example.com/gone",
                        "publishedAt": "2026-08-25T10:00:00Z",
                        "description": null,
                        "urlToImage": null
                    },
                    {
                        "title": "Regulators open AI inquiry",
                        "url": "https://example.com/inquiry",
                        "publishedAt": "not-a-date",
                        "description": null,
                        "urlToImage": null
                    }
                ]
            }"#,
        )
        .create_async()
        .await;

    let source =
        NewsApiSource::new(Some("test-key".to_string())).with_base_url(&server.url());
    let items = source.fetch().await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "AI chips drive record quarter");
    assert_eq!(
        items[0].image_url.as_deref(),
        Some("https://example.com/chips.jpg")
    );
    assert_eq!(items[0].summary.as_deref(), Some("Earnings beat expectations."));
    // Unparseable date keeps the article, image falls back to the sector default.
    assert_eq!(items[1].title, "Regulators open AI inquiry");
    assert!(items[1]
        .image_url
        .as_deref()
        .is_some_and(|u| u.contains("unsplash.com")));
}

#[tokio::test]
async fn newsapi_without_credential_contributes_nothing() {
    let source = NewsApiSource::new(None);
    let items = source.fetch().await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn arxiv_parses_atom_entries() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/atom+xml")
        .with_body(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <feed xmlns="http://www.w3.org/2005/Atom">
                <title>ArXiv Query Results</title>
                <id>http://arxiv.org/api/query</id>
                <updated>2026-08-25T00:00:00Z</updated>
                <entry>
                    <id>http://arxiv.org/abs/2608.01001v1</id>
                    <title>Scaling Laws for Sparse Models</title>
                    <summary>We study sparse scaling behavior.</summary>
                    <published>2026-08-24T18:00:00Z</published>
                    <updated>2026-08-24T18:00:00Z</updated>
                    <link href="http://arxiv.org/abs/2608.01001v1" rel="alternate"/>
                </entry>
                <entry>
                    <id>http://arxiv.org/abs/2608.01002v1</id>
                    <title>Benchmarking Retrieval Pipelines</title>
                    <summary>A new retrieval benchmark.</summary>
                    <published>2026-08-24T17:30:00Z</published>
                    <updated>2026-08-24T17:30:00Z</updated>
                    <link href="http://arxiv.org/abs/2608.01002v1" rel="alternate"/>
                </entry>
            </feed>"#,
        )
        .create_async()
        .await;

    let source = ArxivSource::new().with_base_url(&server.url());
    let items = source.fetch().await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Scaling Laws for Sparse Models");
    assert_eq!(items[0].source_url, "http://arxiv.org/abs/2608.01001v1");
    assert_eq!(
        items[0].summary.as_deref(),
        Some("We study sparse scaling behavior.")
    );
    assert!(items.iter().all(|i| i.sector == Sector::Technical));
}

#[tokio::test]
async fn arxiv_malformed_body_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("this is not xml")
        .create_async()
        .await;

    let source = ArxivSource::new().with_base_url(&server.url());
    assert!(source.fetch().await.is_err());
}
