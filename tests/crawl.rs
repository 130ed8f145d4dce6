//! Crawl loop against a mocked Hacker News and article server.

use std::sync::Arc;

use httpmock::prelude::*;

use hnrec::Config;
use hnrec::ingest::{Crawler, PageFetcher, build_client};
use hnrec::store::{DocumentStore, SqliteDocumentStore};

const ARTICLE: &str = r#"<html>
  <head><title>Why B-trees are everywhere</title></head>
  <body>
    <h1>Why B-trees are everywhere</h1>
    <p>Nearly every database you have ever used keeps its data in a B-tree,
    because the structure keeps reads shallow while staying friendly to the
    block-oriented storage underneath, and that combination has survived
    five decades of hardware change without losing its edge.</p>
    <p>Short interlude.</p>
    <p>Write amplification and cache behavior both matter more than the
    asymptotic analysis suggests, and the B-tree threads that needle well
    enough that alternatives keep failing to displace it outside of a few
    specialized write-heavy niches where log-structured designs win.</p>
  </body>
</html>"#;

fn front_page(article_url: &str) -> String {
    format!(
        r#"<html><body><table>
          <tr class="athing" id="1">
            <td class="title"><span class="titleline">
              <a href="{article_url}">Why B-trees are everywhere</a>
            </span></td>
          </tr>
          <tr><td class="subtext">
            <span class="score">99 points</span>
            <a class="hnuser">bob</a>
            <span class="age"><a>1 hour ago</a></span>
          </td></tr>
          <tr class="athing" id="2">
            <td class="title"><span class="titleline">
              <a href="https://example.invalid/paper.pdf">A paper</a>
            </span></td>
          </tr>
        </table></body></html>"#
    )
}

#[tokio::test]
async fn crawl_stores_posts_and_extracted_sites() {
    let server = MockServer::start_async().await;
    let article_url = server.url("/article");

    let front = front_page(&article_url);
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).body(front.clone());
        })
        .await;
    let article_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/article");
            then.status(200).body(ARTICLE);
        })
        .await;

    let config = Config {
        start_url: server.url("/"),
        page_depth_limit: 3,
        paragraph_length_threshold: 30,
        paragraph_window: 2,
        fetch_concurrency: 2,
        ..Config::default()
    };

    let store = Arc::new(SqliteDocumentStore::open_in_memory().await.unwrap());
    let crawler = Crawler::new(
        PageFetcher::new(build_client().unwrap(), None),
        store.clone(),
        config,
    );
    let summary = crawler.run().await.unwrap();

    // No "More" link: the crawl stops after one page.
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.posts, 2);
    // The .pdf link is never followed.
    assert_eq!(summary.sites, 1);
    article_mock.assert_hits_async(1).await;

    let stored = store.find_by_href(&article_url).await.unwrap().unwrap();
    assert_eq!(
        stored.document.title.primary(),
        Some("Why B-trees are everywhere")
    );
    // Both long paragraphs qualify; the interlude rides along in the first
    // seed's window.
    assert_eq!(stored.document.paragraphs.len(), 3);
    assert_eq!(stored.document.paragraphs[1], "Short interlude.");
}

#[tokio::test]
async fn unreachable_articles_are_counted_not_fatal() {
    let server = MockServer::start_async().await;
    let article_url = server.url("/missing");

    let front = front_page(&article_url);
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).body(front.clone());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        })
        .await;

    let config = Config {
        start_url: server.url("/"),
        page_depth_limit: 1,
        ..Config::default()
    };

    let store = Arc::new(SqliteDocumentStore::open_in_memory().await.unwrap());
    let crawler = Crawler::new(
        PageFetcher::new(build_client().unwrap(), None),
        store.clone(),
        config,
    );
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.sites, 0);
    assert_eq!(summary.failures, 1);
    assert_eq!(store.count_sites().await.unwrap(), 0);
}
