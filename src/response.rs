//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// Pagination block for list pages.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub last_page: u32,
}

impl Pagination {
    pub fn new(total: u64, page: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let last_page = total.div_ceil(per_page as u64).max(1) as u32;
        Pagination {
            total,
            page,
            per_page,
            last_page,
        }
    }
}

pub fn success_one<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::CREATED, Json(SuccessOne { data, meta: None }))
}

pub fn success_one_ok<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::OK, Json(SuccessOne { data, meta: None }))
}

pub fn success_one_with_meta<T: Serialize>(
    data: T,
    meta: serde_json::Value,
) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        StatusCode::OK,
        Json(SuccessOne {
            data,
            meta: Some(meta),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_last_page_up() {
        assert_eq!(Pagination::new(21, 1, 10).last_page, 3);
        assert_eq!(Pagination::new(20, 2, 10).last_page, 2);
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let p = Pagination::new(0, 1, 10);
        assert_eq!(p.last_page, 1);
        assert_eq!(p.total, 0);
    }
}
