//! Listing assembly - filtered, annotated, paginated post sequences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{PostRecord, Viewer};
use crate::error::RepoError;
use crate::ports::PostRepository;

/// Posts per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Which posts a listing draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    All,
    Author(Uuid),
    Category(Uuid),
}

/// Store-level selection of posts.
///
/// With `public_at` set, only posts that are public at that instant match
/// (see [`crate::policy::is_public`]). Stores order matches by `pub_date`
/// descending, then `created_at` and `id` ascending.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostFilter {
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub public_at: Option<DateTime<Utc>>,
}

impl PostFilter {
    /// Build the filter for `scope` as seen by `viewer`.
    ///
    /// Only an author looking at their own posts skips the publication gate.
    pub fn for_scope(scope: ListingScope, viewer: &Viewer, now: DateTime<Utc>) -> Self {
        match scope {
            ListingScope::All => Self {
                public_at: Some(now),
                ..Self::default()
            },
            ListingScope::Category(category_id) => Self {
                category_id: Some(category_id),
                public_at: Some(now),
                ..Self::default()
            },
            ListingScope::Author(author_id) => Self {
                author_id: Some(author_id),
                public_at: (!viewer.is(author_id)).then_some(now),
                ..Self::default()
            },
        }
    }
}

/// Parse a raw `page` query value. Anything that isn't an integer means the
/// first page; positive integers too large for `i64` saturate so they still
/// clamp to the last page.
pub fn parse_page_number(raw: Option<&str>) -> i64 {
    let Some(raw) = raw.map(str::trim) else {
        return 1;
    };

    match raw.parse::<i64>() {
        Ok(number) => number,
        Err(_) => {
            let digits = raw.strip_prefix('+').unwrap_or(raw);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                i64::MAX
            } else {
                1
            }
        }
    }
}

/// Page arithmetic over `total` items.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    total: u64,
    per_page: u64,
}

impl Paginator {
    pub fn new(total: u64, per_page: u64) -> Self {
        Self {
            total,
            per_page: per_page.max(1),
        }
    }

    /// Number of pages; an empty listing still has one.
    pub fn num_pages(&self) -> u64 {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// Clamp a requested page number into `1..=num_pages`.
    pub fn clamp(&self, requested: i64) -> u64 {
        if requested < 1 {
            return 1;
        }
        (requested as u64).min(self.num_pages())
    }

    pub fn offset(&self, page: u64) -> u64 {
        (page.saturating_sub(1)) * self.per_page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            per_page: self.per_page,
        }
    }
}

/// Count the matches of `filter`, clamp `requested` to a valid page and fetch it.
///
/// Counting and fetching are separate store calls. If posts are deleted in
/// between and a later page comes back empty, the listing is recounted once so
/// the result is the new last page rather than an empty one past it.
pub async fn assemble_page(
    posts: &dyn PostRepository,
    filter: &PostFilter,
    requested: i64,
    per_page: u64,
) -> Result<Page<PostRecord>, RepoError> {
    let page = fetch_page(posts, filter, requested, per_page).await?;
    if page.items.is_empty() && page.number > 1 {
        return fetch_page(posts, filter, requested, per_page).await;
    }
    Ok(page)
}

async fn fetch_page(
    posts: &dyn PostRepository,
    filter: &PostFilter,
    requested: i64,
    per_page: u64,
) -> Result<Page<PostRecord>, RepoError> {
    let total = posts.count(filter).await?;
    let paginator = Paginator::new(total, per_page);
    let number = paginator.clamp(requested);

    let items = posts
        .find_records(filter, paginator.offset(number), paginator.per_page())
        .await?;

    Ok(Page {
        items,
        number,
        num_pages: paginator.num_pages(),
        total,
        per_page: paginator.per_page(),
    })
}
