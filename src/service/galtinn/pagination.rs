//! Draining of Galtinn's `next`-linked listings.

use std::future::Future;
use url::Url;

use crate::{error::galtinn::GaltinnError, model::galtinn::Page};

/// Outcome of fetching one listing page.
#[derive(Debug)]
pub enum PageResponse<T> {
    Page(Page<T>),
    /// The page answered 404.
    NotFound,
}

/// Follows `next` links from `first` until exhausted, concatenating results.
///
/// A 404 on the first page means an empty listing. A 404 on any later page,
/// or any error from `fetch_page`, aborts the drain and discards what was
/// collected so far. `next` links must stay on the origin of `first`.
///
/// # Arguments
/// - `first` - URL of the first page
/// - `fetch_page` - Fetches and decodes a single page
///
/// # Returns
/// - `Ok(Vec<T>)` - Every result, in page order
/// - `Err(GaltinnError)` - A page failed or linked elsewhere
pub async fn drain_pages<T, F, Fut>(first: Url, mut fetch_page: F) -> Result<Vec<T>, GaltinnError>
where
    F: FnMut(Url) -> Fut,
    Fut: Future<Output = Result<PageResponse<T>, GaltinnError>>,
{
    let origin = first.origin();
    let mut results = Vec::new();
    let mut next = Some(first);
    let mut is_first_page = true;

    while let Some(url) = next.take() {
        match fetch_page(url.clone()).await? {
            PageResponse::Page(page) => {
                results.extend(page.results);

                if let Some(link) = page.next {
                    let link = Url::parse(&link)?;
                    if link.origin() != origin {
                        return Err(GaltinnError::ForeignNextLink(link.to_string()));
                    }
                    next = Some(link);
                }
            }
            PageResponse::NotFound if is_first_page => return Ok(Vec::new()),
            PageResponse::NotFound => {
                return Err(GaltinnError::FetchFailed {
                    status: 404,
                    url: url.to_string(),
                })
            }
        }

        is_first_page = false;
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn url(page: usize) -> Url {
        Url::parse(&format!("http://galtinn.test/users/?page={}", page)).unwrap()
    }

    fn page(items: std::ops::Range<u32>, next: Option<usize>) -> PageResponse<u32> {
        let results: Vec<u32> = items.collect();
        PageResponse::Page(Page {
            count: 0,
            next: next.map(|n| url(n).to_string()),
            previous: None,
            results,
        })
    }

    #[tokio::test]
    async fn concatenates_pages_in_order() {
        let mut pages = HashMap::new();
        pages.insert(url(1), page(0..10, Some(2)));
        pages.insert(url(2), page(10..20, Some(3)));
        pages.insert(url(3), page(20..24, None));

        let results = drain_pages(url(1), |u| {
            let response = pages.remove(&u).expect("unexpected page");
            async move { Ok(response) }
        })
        .await
        .unwrap();

        assert_eq!(results, (0..24).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn first_page_not_found_is_empty() {
        let results: Vec<u32> = drain_pages(url(1), |_| async { Ok(PageResponse::NotFound) })
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn later_page_not_found_fails() {
        let mut pages = HashMap::new();
        pages.insert(url(1), page(0..10, Some(2)));
        pages.insert(url(2), PageResponse::NotFound);

        let result = drain_pages(url(1), |u| {
            let response = pages.remove(&u).expect("unexpected page");
            async move { Ok(response) }
        })
        .await;

        assert!(matches!(
            result,
            Err(GaltinnError::FetchFailed { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn error_mid_run_discards_partial_results() {
        let mut pages = HashMap::new();
        pages.insert(url(1), Ok(page(0..10, Some(2))));
        pages.insert(
            url(2),
            Err(GaltinnError::FetchFailed {
                status: 500,
                url: url(2).to_string(),
            }),
        );

        let result = drain_pages(url(1), |u| {
            let response = pages.remove(&u).expect("unexpected page");
            async move { response }
        })
        .await;

        assert!(matches!(
            result,
            Err(GaltinnError::FetchFailed { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn rejects_next_link_on_other_origin() {
        let result = drain_pages(url(1), |_| async {
            Ok(PageResponse::Page(Page::<u32> {
                count: 1,
                next: Some("http://elsewhere.test/users/?page=2".to_string()),
                previous: None,
                results: vec![1],
            }))
        })
        .await;

        assert!(matches!(result, Err(GaltinnError::ForeignNextLink(_))));
    }
}
