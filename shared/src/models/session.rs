//! Explicit session state and the commands that change it
//!
//! Every user action is a [`SessionCommand`]. [`apply`] turns the current
//! state plus a command into the next state without touching the network;
//! the server-side orchestrator then renders a view from that state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::category::CategorySelection;
use super::city::CitySuggestion;
use crate::validation::validate_radius_km;

pub const DEFAULT_RADIUS_KM: u32 = 5;

/// Sort order for the activity list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep the provider's order
    #[default]
    None,
    RatingDesc,
    RatingAsc,
    PriceDesc,
    PriceAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::None,
        SortOrder::RatingDesc,
        SortOrder::RatingAsc,
        SortOrder::PriceDesc,
        SortOrder::PriceAsc,
    ];

    pub fn is_descending(&self) -> bool {
        matches!(self, SortOrder::RatingDesc | SortOrder::PriceDesc)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::None => write!(f, "None"),
            SortOrder::RatingDesc => write!(f, "Rating ↓"),
            SortOrder::RatingAsc => write!(f, "Rating ↑"),
            SortOrder::PriceDesc => write!(f, "Price ↓"),
            SortOrder::PriceAsc => write!(f, "Price ↑"),
        }
    }
}

/// Allowed page sizes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    Twenty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Five, PageSize::Ten, PageSize::Twenty];

    pub fn get(&self) -> u32 {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = SessionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(PageSize::Five),
            10 => Ok(PageSize::Ten),
            20 => Ok(PageSize::Twenty),
            other => Err(SessionError::InvalidPageSize(other)),
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

/// Navigation state of the activity list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageState {
    /// 1-based
    pub current_page: u32,
    pub page_size: PageSize,
    pub sort_order: SortOrder,
    /// Page count of the last rendered view; bounds next-page navigation
    #[serde(default = "one")]
    pub known_total_pages: u32,
}

fn one() -> u32 {
    1
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: PageSize::default(),
            sort_order: SortOrder::default(),
            known_total_pages: 1,
        }
    }
}

impl PageState {
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Record the page count of a rendered view and pull the current page into range
    pub fn settle(&mut self, total_pages: u32) {
        self.known_total_pages = total_pages.max(1);
        self.current_page = self.current_page.clamp(1, self.known_total_pages);
    }
}

/// Everything the explorer remembers between user actions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    pub id: Uuid,
    pub city: Option<CitySuggestion>,
    pub radius_km: u32,
    pub travel_date: NaiveDate,
    pub page: PageState,
    pub categories: CategorySelection,
    /// Apply the weather preset on the next render
    pub use_preset: bool,
    /// A search has been submitted; results are rendered from now on
    pub have_results: bool,
}

impl SessionState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            city: None,
            radius_km: DEFAULT_RADIUS_KM,
            travel_date: today,
            page: PageState::default(),
            categories: CategorySelection::new(),
            use_preset: false,
            have_results: false,
        }
    }

    /// Replace the category selection with a weather preset
    pub fn apply_preset(&mut self, preset: CategorySelection) {
        self.categories = preset;
        self.use_preset = false;
        self.page.reset();
    }
}

/// A single user action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionCommand {
    SelectCity { city: CitySuggestion },
    SetRadius { km: u32 },
    SetTravelDate { date: NaiveDate },
    SetPageSize { size: PageSize },
    SetSortOrder { order: SortOrder },
    /// Manual category edit; overrides any pending preset
    SetCategories { categories: CategorySelection },
    RequestPreset,
    Search,
    NextPage,
    PrevPage,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Search radius must be between 1 and 20 km, got {0}")]
    InvalidRadius(u32),

    #[error("Page size must be 5, 10 or 20, got {0}")]
    InvalidPageSize(u32),

    #[error("Select a city before searching")]
    NoCitySelected,
}

/// Compute the next session state for a command
pub fn apply(mut state: SessionState, command: SessionCommand) -> Result<SessionState, SessionError> {
    match command {
        SessionCommand::SelectCity { city } => {
            state.city = Some(city);
        }
        SessionCommand::SetRadius { km } => {
            validate_radius_km(km).map_err(|_| SessionError::InvalidRadius(km))?;
            state.radius_km = km;
        }
        SessionCommand::SetTravelDate { date } => {
            state.travel_date = date;
        }
        SessionCommand::SetPageSize { size } => {
            if state.page.page_size != size {
                state.page.page_size = size;
                state.page.reset();
            }
        }
        SessionCommand::SetSortOrder { order } => {
            state.page.sort_order = order;
        }
        SessionCommand::SetCategories { categories } => {
            state.categories = categories;
            state.use_preset = false;
        }
        SessionCommand::RequestPreset => {
            state.use_preset = true;
            state.page.reset();
        }
        SessionCommand::Search => {
            if state.city.is_none() {
                return Err(SessionError::NoCitySelected);
            }
            state.have_results = true;
            state.page.reset();
        }
        SessionCommand::NextPage => {
            let next = state.page.current_page.saturating_add(1);
            state.page.current_page = next.min(state.page.known_total_pages.max(1));
        }
        SessionCommand::PrevPage => {
            state.page.current_page = state.page.current_page.saturating_sub(1).max(1);
        }
        SessionCommand::Refresh => {}
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn paris() -> CitySuggestion {
        CitySuggestion {
            name: "Paris".to_string(),
            iata_code: "PAR".to_string(),
            latitude: 48.85341,
            longitude: 2.3488,
        }
    }

    #[test]
    fn test_new_session_defaults() {
        let state = SessionState::new(today());
        assert_eq!(state.radius_km, 5);
        assert_eq!(state.page.current_page, 1);
        assert_eq!(state.page.page_size, PageSize::Ten);
        assert_eq!(state.page.sort_order, SortOrder::None);
        assert!(!state.have_results);
        assert!(!state.use_preset);
    }

    #[test]
    fn test_search_requires_city() {
        let state = SessionState::new(today());
        assert_eq!(
            apply(state, SessionCommand::Search),
            Err(SessionError::NoCitySelected)
        );
    }

    #[test]
    fn test_search_resets_page() {
        let mut state = SessionState::new(today());
        state.city = Some(paris());
        state.page.current_page = 3;

        let state = apply(state, SessionCommand::Search).unwrap();
        assert!(state.have_results);
        assert_eq!(state.page.current_page, 1);
    }

    #[test]
    fn test_radius_validated() {
        let state = SessionState::new(today());
        assert_eq!(
            apply(state.clone(), SessionCommand::SetRadius { km: 21 }),
            Err(SessionError::InvalidRadius(21))
        );
        let state = apply(state, SessionCommand::SetRadius { km: 20 }).unwrap();
        assert_eq!(state.radius_km, 20);
    }

    #[test]
    fn test_navigation_clamps_to_known_pages() {
        let mut state = SessionState::new(today());
        state.page.settle(3);

        let state = apply(state, SessionCommand::PrevPage).unwrap();
        assert_eq!(state.page.current_page, 1);

        let state = apply(state, SessionCommand::NextPage).unwrap();
        let state = apply(state, SessionCommand::NextPage).unwrap();
        let state = apply(state, SessionCommand::NextPage).unwrap();
        assert_eq!(state.page.current_page, 3);
    }

    #[test]
    fn test_manual_categories_cancel_pending_preset() {
        let state = SessionState::new(today());
        let state = apply(state, SessionCommand::RequestPreset).unwrap();
        assert!(state.use_preset);

        let state = apply(
            state,
            SessionCommand::SetCategories {
                categories: CategorySelection::from([Category::Tours]),
            },
        )
        .unwrap();
        assert!(!state.use_preset);
        assert!(state.categories.contains(Category::Tours));
    }

    #[test]
    fn test_apply_preset_resets_page() {
        let mut state = SessionState::new(today());
        state.use_preset = true;
        state.page.current_page = 2;

        state.apply_preset(CategorySelection::from([Category::Wine, Category::Historical]));
        assert!(!state.use_preset);
        assert_eq!(state.page.current_page, 1);
        assert_eq!(state.categories.len(), 2);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut state = SessionState::new(today());
        state.page.current_page = 2;
        let state = apply(state, SessionCommand::SetPageSize { size: PageSize::Twenty }).unwrap();
        assert_eq!(state.page.current_page, 1);
        assert_eq!(state.page.page_size.get(), 20);
    }

    #[test]
    fn test_command_wire_format() {
        let command: SessionCommand =
            serde_json::from_str(r#"{"type": "set_page_size", "size": 5}"#).unwrap();
        assert_eq!(command, SessionCommand::SetPageSize { size: PageSize::Five });

        let bad = serde_json::from_str::<SessionCommand>(r#"{"type": "set_page_size", "size": 7}"#);
        assert!(bad.is_err());

        let command: SessionCommand = serde_json::from_str(r#"{"type": "next_page"}"#).unwrap();
        assert_eq!(command, SessionCommand::NextPage);
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let mut state = SessionState::new(today());
        state.city = Some(CitySuggestion {
            latitude: 48.5,
            longitude: 2.25,
            ..paris()
        });
        let json = serde_json::to_string(&state).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
