use serde::{Deserialize, Serialize};

/// Records per page
pub const PAGE_SIZE: u32 = 5;
/// Query string key holding the page number
pub const PAGE_PARAM: &str = "page";

#[derive(Debug, Default)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Pick `page` out of decoded query pairs. When the key repeats the last
    /// value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let page = pairs
            .into_iter()
            .filter(|(key, _)| key.as_ref() == PAGE_PARAM)
            .last()
            .map(|(_, value)| value.into());
        Self { page }
    }

    /// 1-based page number. Missing, non-numeric and zero values are read
    /// as the first page. Numbers too large for a page saturate, so they
    /// land past the last page instead of wrapping back to the first.
    pub fn page(&self) -> u32 {
        let Some(raw) = self.page.as_deref().map(str::trim) else {
            return 1;
        };
        let digits = raw.strip_prefix('+').unwrap_or(raw);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return 1;
        }
        match digits.parse::<u64>() {
            Ok(0) => 1,
            Ok(page) => u32::try_from(page).unwrap_or(u32::MAX),
            Err(_) => u32::MAX,
        }
    }
}

/// Row window to fetch for a page. One extra row is requested so the
/// presence of a following page is known without a count query.
pub fn window(page: u32) -> (i64, i64) {
    let limit = PAGE_SIZE as i64 + 1;
    let offset = (page as i64 - 1) * PAGE_SIZE as i64;
    (limit, offset)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Links {
    pub first: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub current_page: u32,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub per_page: u32,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub links: Links,
    pub meta: Meta,
}

impl<T> Page<T> {
    /// `rows` is the result of fetching [`window`] for `page`; `path` is the
    /// list endpoint URL the page links are built on.
    pub fn new(mut rows: Vec<T>, page: u32, path: &str) -> Self {
        let has_more = rows.len() > PAGE_SIZE as usize;
        rows.truncate(PAGE_SIZE as usize);

        let offset = (page as u64 - 1) * PAGE_SIZE as u64;
        let (from, to) = if rows.is_empty() {
            (None, None)
        } else {
            (Some(offset + 1), Some(offset + rows.len() as u64))
        };

        Self {
            data: rows,
            links: Links {
                first: page_url(path, 1),
                prev: (page > 1).then(|| page_url(path, page - 1)),
                next: has_more.then(|| page_url(path, page + 1)),
            },
            meta: Meta {
                current_page: page,
                from,
                to,
                per_page: PAGE_SIZE,
                path: path.to_string(),
            },
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            links: self.links,
            meta: self.meta,
        }
    }
}

pub fn page_url(path: &str, page: u32) -> String {
    format!("{path}?page={page}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults_to_first_page() {
        for raw in [None, Some("0"), Some("-3"), Some("abc"), Some(""), Some("2.5")] {
            let query = PageQuery {
                page: raw.map(str::to_string),
            };
            assert_eq!(query.page(), 1, "{raw:?}");
        }
        for (raw, page) in [
            ("3", 3),
            (" 4 ", 4),
            ("5000000000", u32::MAX),
            ("99999999999999999999999", u32::MAX),
        ] {
            let query = PageQuery {
                page: Some(raw.to_string()),
            };
            assert_eq!(query.page(), page, "{raw}");
        }
    }

    #[test]
    fn page_query_last_repeated_key_wins() {
        let query = PageQuery::from_pairs([("sort", "x"), ("page", "1"), ("page", "2")]);
        assert_eq!(query.page(), 2);

        let query = PageQuery::from_pairs(Vec::<(String, String)>::new());
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn saturated_page_is_past_the_end() {
        let (limit, offset) = window(u32::MAX);
        assert_eq!(limit, 6);
        assert!(offset > 0);

        let page = Page::<u32>::new(vec![], u32::MAX, "/check-ins");
        assert!(page.data.is_empty());
        assert_eq!(page.links.next, None);
    }

    #[test]
    fn window_fetches_one_extra_row() {
        assert_eq!(window(1), (6, 0));
        assert_eq!(window(3), (6, 10));
    }

    #[test]
    fn first_page_with_more_rows() {
        let page = Page::new((1..=6).collect::<Vec<u32>>(), 1, "/check-ins");

        assert_eq!(page.data, vec![1, 2, 3, 4, 5]);
        assert_eq!(page.links.prev, None);
        assert_eq!(page.links.next.as_deref(), Some("/check-ins?page=2"));
        assert_eq!(page.meta.from, Some(1));
        assert_eq!(page.meta.to, Some(5));
    }

    #[test]
    fn last_page_has_no_next() {
        let page = Page::new(vec![11, 12], 3, "http://example.com/check-ins");

        assert_eq!(
            page.links.prev.as_deref(),
            Some("http://example.com/check-ins?page=2")
        );
        assert_eq!(page.links.next, None);
        assert_eq!(page.meta.from, Some(11));
        assert_eq!(page.meta.to, Some(12));
    }

    #[test]
    fn empty_page_omits_links_in_json() {
        let page = Page::<u32>::new(vec![], 1, "/check-ins");
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["data"], serde_json::json!([]));
        assert_eq!(json["links"], serde_json::json!({ "first": "/check-ins?page=1" }));
        assert_eq!(json["meta"]["from"], serde_json::Value::Null);
    }
}
