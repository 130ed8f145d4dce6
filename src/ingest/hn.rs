//! Hacker News front-page parsing.

use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::types::HnPost;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// One parsed front page: its entries plus the "More" pagination link.
#[derive(Clone, Debug)]
pub struct FrontPage {
    pub posts: Vec<HnPost>,
    /// Relative href of the next page, when present.
    pub more: Option<String>,
}

/// Parses a Hacker News front page.
///
/// Each story row (`tr.athing`) yields one [`HnPost`]; the score/author/age
/// subtext lives in the row that follows. Missing scores default to -1 and
/// missing authors to an empty string (jobs postings carry neither). Story
/// links are resolved against `base` so relative self-links (`item?id=…`)
/// come out absolute.
pub fn parse_front_page(html: &str, base: &Url) -> FrontPage {
    let document = Html::parse_document(html);
    let row_sel = selector("tr.athing");
    let title_link_sel = selector("td.title span.titleline > a");
    let legacy_link_sel = selector("td.title a.titlelink");
    let site_sel = selector(".sitebit a span");
    let score_sel = selector(".subtext .score");
    let author_sel = selector(".subtext .hnuser");
    let age_sel = selector(".subtext .age a");

    let now = Utc::now();
    let mut posts = Vec::new();

    for row in document.select(&row_sel) {
        let link = row
            .select(&title_link_sel)
            .next()
            .or_else(|| row.select(&legacy_link_sel).next());
        let Some(link) = link else {
            continue;
        };

        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() || title == "More" {
            continue;
        }

        let src_url = link
            .value()
            .attr("href")
            .and_then(|href| base.join(href).ok())
            .map(|url| url.to_string());
        let src = row
            .select(&site_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string());

        let subtext = next_element_sibling(row);
        let score = subtext
            .and_then(|sub| sub.select(&score_sel).next())
            .and_then(|el| {
                let text = el.text().collect::<String>();
                text.split_whitespace().next()?.parse::<i64>().ok()
            })
            .unwrap_or(-1);
        let author = subtext
            .and_then(|sub| sub.select(&author_sel).next())
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default();
        let age = subtext
            .and_then(|sub| sub.select(&age_sel).next())
            .map(|el| el.text().collect::<String>());

        posts.push(HnPost {
            title,
            src_url,
            src,
            score,
            author,
            age,
            fetched_at: Some(now),
        });
    }

    let more = document
        .select(&selector("a.morelink"))
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string);

    FrontPage { posts, more }
}

fn next_element_sibling<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let mut node = element.next_sibling();
    while let Some(current) = node {
        if let Some(el) = ElementRef::wrap(current) {
            return Some(el);
        }
        node = current.next_sibling();
    }
    None
}
