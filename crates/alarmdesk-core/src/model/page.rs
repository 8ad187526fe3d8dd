// ── Pagination and time-window types ──

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// One page of results plus the counters needed to page further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_pages: u64,
    pub total_elements: u64,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total_pages: 0,
            total_elements: 0,
            has_next: false,
        }
    }

    /// Transform every item, keeping the page counters.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_elements: self.total_elements,
            has_next: self.has_next,
        }
    }

    /// Like [`map`](Self::map), stopping at the first error.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            data: self.data.into_iter().map(f).collect::<Result<_, _>>()?,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
            has_next: self.has_next,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

/// Sort key plus direction, e.g. `createdTime DESC`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub property: String,
    pub direction: Direction,
}

impl SortOrder {
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }
}

/// Relative time window ending "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub span: Duration,
}

/// A history window covering the last `span`.
pub fn history_interval(span: Duration) -> TimeWindow {
    TimeWindow { span }
}

impl TimeWindow {
    /// Resolve the window against `now` into absolute `(start, end)`.
    ///
    /// A span reaching past the earliest representable time starts there.
    pub fn resolve(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = now
            .checked_sub_signed(self.span)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        (start, now)
    }
}

/// A time-bounded, sorted, paginated slice request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePageLink {
    pub page_size: u32,
    pub page: u32,
    pub text_search: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl TimePageLink {
    pub fn new(page_size: u32, page: u32) -> Self {
        Self {
            page_size,
            page,
            text_search: None,
            sort_order: None,
            start_time: None,
            end_time: None,
        }
    }

    /// Build a link whose time bounds come from `window` resolved at `now`.
    pub fn from_window(window: TimeWindow, now: DateTime<Utc>, page_size: u32, page: u32) -> Self {
        let (start, end) = window.resolve(now);
        Self {
            start_time: Some(start),
            end_time: Some(end),
            ..Self::new(page_size, page)
        }
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort_order = Some(sort);
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text_search = (!text.is_empty()).then_some(text);
        self
    }

    /// The link for the following page.
    pub fn next_page(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self.clone()
        }
    }

    /// Wire query parameters, omitting unset values.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("pageSize", self.page_size.to_string()),
            ("page", self.page.to_string()),
        ];
        if let Some(ref text) = self.text_search {
            params.push(("textSearch", text.clone()));
        }
        if let Some(ref sort) = self.sort_order {
            params.push(("sortProperty", sort.property.clone()));
            params.push(("sortOrder", sort.direction.to_string()));
        }
        if let Some(start) = self.start_time {
            params.push(("startTime", start.timestamp_millis().to_string()));
        }
        if let Some(end) = self.end_time {
            params.push(("endTime", end.timestamp_millis().to_string()));
        }
        params
    }
}
