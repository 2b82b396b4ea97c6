use serde::Serialize;

use crate::utils::pagination::Paged;

/// Links de navegación de una página
#[derive(Debug, Serialize)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// Envelope de listados paginados
#[derive(Debug, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub links: PageLinks,
}

fn page_link(base_path: &str, page: i64, page_size: i64) -> String {
    format!("{}?page={}&page_size={}", base_path, page, page_size)
}

impl<T> PagedResult<T> {
    /// Construye el envelope a partir de una página del dominio
    pub fn from_paged<U>(paged: Paged<U>, base_path: &str, f: impl FnMut(U) -> T) -> Self {
        let total_pages = paged.total_pages();
        let (page, page_size) = (paged.page, paged.page_size);

        let next = (page < total_pages).then(|| page_link(base_path, page + 1, page_size));
        let prev = (page > 1).then(|| page_link(base_path, page - 1, page_size));

        Self {
            items: paged.items.into_iter().map(f).collect(),
            page,
            page_size,
            total_items: paged.total_items,
            total_pages,
            links: PageLinks {
                self_link: page_link(base_path, page, page_size),
                next,
                prev,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::pagination::PageRequest;

    #[test]
    fn test_links_in_the_middle_page() {
        let paged = Paged::new(vec![1, 2], PageRequest::new(2, 2), 5);
        let result = PagedResult::from_paged(paged, "/api/zones", |n| n * 10);

        assert_eq!(result.items, vec![10, 20]);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.links.self_link, "/api/zones?page=2&page_size=2");
        assert_eq!(result.links.next.as_deref(), Some("/api/zones?page=3&page_size=2"));
        assert_eq!(result.links.prev.as_deref(), Some("/api/zones?page=1&page_size=2"));
    }

    #[test]
    fn test_single_page_has_no_neighbours() {
        let paged = Paged::new(vec!["a"], PageRequest::default(), 1);
        let result = PagedResult::from_paged(paged, "/api/tags", |s| s);

        assert!(result.links.next.is_none());
        assert!(result.links.prev.is_none());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["links"]["self"], "/api/tags?page=1&page_size=10");
    }
}
