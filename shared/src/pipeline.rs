//! Category filtering, sorting and pagination of the activity list

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::models::{ActivityRecord, CategorySelection, PageState, SortOrder};
use crate::types::{Page, PaginationMeta};

/// Flattened keywords of every selected category
pub fn keywords_for(selection: &CategorySelection) -> Vec<&'static str> {
    selection
        .iter()
        .flat_map(|category| category.keywords().iter().copied())
        .collect()
}

/// Keep activities whose name or description mentions one of the keywords.
/// An empty keyword list keeps everything.
pub fn filter_by_category(activities: Vec<ActivityRecord>, keywords: &[&str]) -> Vec<ActivityRecord> {
    if keywords.is_empty() {
        return activities;
    }

    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    activities
        .into_iter()
        .filter(|activity| {
            let text = activity.search_text();
            keywords.iter().any(|kw| text.contains(kw.as_str()))
        })
        .collect()
}

/// Stable sort by rating or price. Missing ratings count as -1,
/// missing prices as larger than any price.
pub fn sort_activities(mut activities: Vec<ActivityRecord>, order: SortOrder) -> Vec<ActivityRecord> {
    let compare: fn(&ActivityRecord, &ActivityRecord) -> Ordering = match order {
        SortOrder::None => return activities,
        SortOrder::RatingAsc | SortOrder::RatingDesc => compare_rating,
        SortOrder::PriceAsc | SortOrder::PriceDesc => compare_price,
    };

    // slice::sort_by is stable, so ties keep their input order in both directions
    if order.is_descending() {
        activities.sort_by(|a, b| compare(b, a));
    } else {
        activities.sort_by(compare);
    }
    activities
}

fn compare_rating(a: &ActivityRecord, b: &ActivityRecord) -> Ordering {
    a.rating_sort_key().total_cmp(&b.rating_sort_key())
}

fn compare_price(a: &ActivityRecord, b: &ActivityRecord) -> Ordering {
    compare_missing_last(a.price_amount(), b.price_amount())
}

fn compare_missing_last(a: Option<Decimal>, b: Option<Decimal>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Number of pages needed for `total_items`; never less than one
pub fn total_pages(total_items: usize, page_size: u32) -> u32 {
    let page_size = page_size.max(1) as usize;
    let pages = total_items.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Slice out one page. Out-of-range page requests are clamped to
/// `1..=total_pages`.
pub fn paginate<T: Clone>(items: &[T], page_size: u32, requested_page: i64) -> Page<T> {
    let per_page = page_size.max(1);
    let pages = total_pages(items.len(), per_page);
    let page = requested_page.clamp(1, i64::from(pages)) as u32;

    let start = ((page - 1) as usize).saturating_mul(per_page as usize);
    let end = start.saturating_add(per_page as usize).min(items.len());
    let slice = if start < items.len() {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items: slice,
        pagination: PaginationMeta {
            page,
            per_page,
            total_items: items.len() as u64,
            total_pages: pages,
        },
    }
}

/// Filter, sort and paginate according to the session's selection and page state
pub fn run_pipeline(
    activities: Vec<ActivityRecord>,
    selection: &CategorySelection,
    page_state: &PageState,
) -> Page<ActivityRecord> {
    let keywords = keywords_for(selection);
    let filtered = filter_by_category(activities, &keywords);
    let sorted = sort_activities(filtered, page_state.sort_order);
    paginate(
        &sorted,
        page_state.page_size.get(),
        i64::from(page_state.current_page),
    )
}
