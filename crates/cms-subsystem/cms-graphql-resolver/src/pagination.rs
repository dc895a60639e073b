// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Pagination arguments and page info.
//!
//! Clients paginate either by page (`page`, `pageSize`) or by offset (`start`, `limit`), never
//! both. A limit of `-1` means "no limit"; a positive `max_limit` caps every limit, including
//! that one.

use serde::Serialize;
use serde_json::Value;

use crate::error::ResolverError;

/// Documents to return, as an offset and an optional limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: u64,
    pub limit: Option<u64>,
}

#[derive(Debug, Default)]
struct PaginationArgs {
    page: Option<i64>,
    page_size: Option<i64>,
    start: Option<i64>,
    limit: Option<i64>,
}

impl PaginationArgs {
    fn from_value(value: Option<&Value>) -> Self {
        let int = |key: &str| value.and_then(|value| value.get(key)).and_then(Value::as_i64);
        Self {
            page: int("page"),
            page_size: int("pageSize"),
            start: int("start"),
            limit: int("limit"),
        }
    }

    fn is_page_based(&self) -> bool {
        self.page.is_some() || self.page_size.is_some()
    }

    fn is_offset_based(&self) -> bool {
        self.start.is_some() || self.limit.is_some()
    }
}

/// The window selected by a `pagination` argument
pub fn window(
    pagination: Option<&Value>,
    default_limit: i64,
    max_limit: i64,
) -> Result<Window, ResolverError> {
    let args = PaginationArgs::from_value(pagination);

    let (start, limit) = if args.is_page_based() {
        if args.is_offset_based() {
            return Err(ResolverError::pagination(
                "Cannot use both page & offset pagination in the same query",
            ));
        }
        let page = args.page.unwrap_or(1).max(1);
        let page_size = args.page_size.unwrap_or(default_limit).max(1);
        ((page - 1) * page_size, page_size)
    } else {
        (args.start.unwrap_or(0), args.limit.unwrap_or(default_limit))
    };

    let start = start.max(0);
    let limit = if limit == -1 { -1 } else { limit.max(1) };

    let limit = match (max_limit > 0, limit) {
        (true, -1) => max_limit,
        (true, limit) => limit.min(max_limit),
        (false, limit) => limit,
    };

    Ok(Window {
        start: start as u64,
        limit: (limit != -1).then_some(limit as u64),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub page_count: u64,
}

pub fn page_info(total: u64, window: &Window) -> PageInfo {
    match window.limit {
        Some(limit) if limit > 0 => PageInfo {
            total,
            page: window.start / limit + 1,
            page_size: limit,
            page_count: total.div_ceil(limit),
        },
        _ => PageInfo {
            total,
            page: 1,
            page_size: total.saturating_sub(window.start),
            page_count: 1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplatform_test::multiplatform_test;
    use serde_json::json;

    #[multiplatform_test]
    fn page_arithmetic() {
        let info = page_info(
            57,
            &Window {
                start: 20,
                limit: Some(10),
            },
        );

        assert_eq!(
            PageInfo {
                total: 57,
                page: 3,
                page_size: 10,
                page_count: 6
            },
            info
        );
    }

    #[multiplatform_test]
    fn unlimited_pages() {
        let window = window(Some(&json!({ "start": 20, "limit": -1 })), 10, -1).unwrap();
        assert_eq!(
            Window {
                start: 20,
                limit: None
            },
            window
        );

        assert_eq!(
            PageInfo {
                total: 57,
                page: 1,
                page_size: 37,
                page_count: 1
            },
            page_info(57, &window)
        );
    }

    #[multiplatform_test]
    fn defaults() {
        assert_eq!(
            Window {
                start: 0,
                limit: Some(10)
            },
            window(None, 10, -1).unwrap()
        );
        assert_eq!(
            Window {
                start: 0,
                limit: Some(25)
            },
            window(Some(&json!({})), 25, -1).unwrap()
        );
    }

    #[multiplatform_test]
    fn page_based() {
        assert_eq!(
            Window {
                start: 40,
                limit: Some(20)
            },
            window(Some(&json!({ "page": 3, "pageSize": 20 })), 10, -1).unwrap()
        );
        assert_eq!(
            Window {
                start: 0,
                limit: Some(1)
            },
            window(Some(&json!({ "page": 0, "pageSize": 0 })), 10, -1).unwrap()
        );
    }

    #[multiplatform_test]
    fn mixing_styles_fails() {
        let result = window(Some(&json!({ "page": 1, "limit": 5 })), 10, -1);

        assert!(matches!(
            result,
            Err(ResolverError::Application { name, .. }) if name == "PaginationError"
        ));
    }

    #[multiplatform_test]
    fn max_limit_clamps() {
        assert_eq!(
            Some(100),
            window(Some(&json!({ "limit": 500 })), 10, 100)
                .unwrap()
                .limit
        );
        assert_eq!(
            Some(100),
            window(Some(&json!({ "limit": -1 })), 10, 100).unwrap().limit
        );
        assert_eq!(
            Some(1),
            window(Some(&json!({ "start": -5, "limit": 0 })), 10, 100)
                .unwrap()
                .limit
        );
    }
}
