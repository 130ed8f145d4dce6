//! Field extraction: a fetched page to a [`SiteDocument`].

use chrono::Utc;
use scraper::{Html, Selector};
use url::Url;

use super::blocks::TextTree;
use super::paragraphs::{ExtractorConfig, extract_paragraphs};
use crate::types::{RecError, SiteDocument, TitleField};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

fn texts_of(html: &Html, css: &str) -> Vec<String> {
    html.select(&selector(css))
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Extracts a [`SiteDocument`] from a fetched article page.
///
/// Titles are the `<title>` text plus every `<h1>`; subtitles are `<h2>` and
/// `<h3>` texts; paragraphs come from the extraction heuristic over the
/// page's `<p>` blocks. List elements count as paragraphs on hosts that
/// match `list_hosts` (list-heavy sites bury their prose in `<li>`s).
///
/// A page yielding no title text is rejected: every stored document carries
/// a title. Empty paragraphs are fine; the pipeline's token floor deals with
/// those later.
pub fn parse_site(
    html: &str,
    url: &Url,
    config: &ExtractorConfig,
    list_hosts: &[String],
) -> Result<SiteDocument, RecError> {
    let document = Html::parse_document(html);

    let mut titles = texts_of(&document, "title");
    titles.extend(texts_of(&document, "h1"));
    if titles.iter().all(|title| title.trim().is_empty()) {
        return Err(RecError::Parse(format!("no title found at {url}")));
    }

    let mut subtitles = texts_of(&document, "h2");
    subtitles.extend(texts_of(&document, "h3"));

    let host = url.host_str().unwrap_or_default().to_lowercase();
    let lists_as_paragraphs =
        config.lists_as_paragraphs || list_hosts.iter().any(|candidate| host.contains(candidate.as_str()));

    let (tree, candidates) = TextTree::from_html(&document);
    let paragraphs = extract_paragraphs(
        &tree,
        &candidates,
        &ExtractorConfig {
            lists_as_paragraphs,
            ..config.clone()
        },
    );

    Ok(SiteDocument {
        title: TitleField::Many(titles),
        subtitles,
        paragraphs,
        href: url.to_string(),
        src: url.host_str().map(str::to_string),
        fetched_at: Some(Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
      <head><title>Example Post</title></head>
      <body>
        <h1>A Heading</h1>
        <h2>Sub One</h2>
        <nav><p>menu</p></nav>
        <article>
          <p>one two three four five six seven eight nine ten eleven twelve</p>
          <p>short aside</p>
          <p>ten nine eight seven six five four three two one zero minus</p>
        </article>
        <h3>Sub Two</h3>
      </body>
    </html>"#;

    fn url() -> Url {
        Url::parse("https://blog.example.com/post").unwrap()
    }

    fn config() -> ExtractorConfig {
        ExtractorConfig {
            length_threshold: 10,
            window: 2,
            lists_as_paragraphs: false,
        }
    }

    #[test]
    fn collects_title_heading_and_subtitles() {
        let doc = parse_site(PAGE, &url(), &config(), &[]).unwrap();
        assert_eq!(
            doc.title.to_vec(),
            vec!["Example Post".to_string(), "A Heading".to_string()]
        );
        assert_eq!(doc.subtitles, vec!["Sub One".to_string(), "Sub Two".to_string()]);
        assert_eq!(doc.href, "https://blog.example.com/post");
        assert_eq!(doc.src.as_deref(), Some("blog.example.com"));
    }

    #[test]
    fn extracts_paragraphs_and_folds_the_aside() {
        let doc = parse_site(PAGE, &url(), &config(), &[]).unwrap();
        assert_eq!(doc.paragraphs.len(), 3);
        assert_eq!(doc.paragraphs[1], "short aside");
        // The nav menu text never qualifies.
        assert!(!doc.paragraphs.iter().any(|p| p.contains("menu")));
    }

    #[test]
    fn rejects_pages_without_any_title() {
        let bare = "<html><body><p>words</p></body></html>";
        let result = parse_site(bare, &url(), &config(), &[]);
        assert!(result.is_err());
    }

    #[test]
    fn list_hosts_enable_list_extraction() {
        let page = r#"<html><head><title>Repo</title></head><body>
          <p>intro words spanning more than the ten word threshold set here yes</p>
          <li>install</li><li>build</li><li>run</li><li>test</li>
        </body></html>"#;
        let url = Url::parse("https://github.com/example/repo").unwrap();

        let plain = parse_site(page, &url, &config(), &[]).unwrap();
        let listy = parse_site(page, &url, &config(), &["github.com".to_string()]).unwrap();
        assert!(listy.paragraphs.len() > plain.paragraphs.len());
    }
}
