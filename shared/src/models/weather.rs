//! Historical weather models and the weather-based category preset

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::category::{Category, CategorySelection};

/// Number of past years compared for the selected travel date
pub const LOOKBACK_YEARS: u32 = 3;

/// Below this average temperature a dry day counts as cold
pub const COLD_THRESHOLD_CELSIUS: f64 = 15.0;

/// Minimum number of rainy lookback years for a rain verdict
pub const RAINY_YEARS_REQUIRED: usize = 2;

/// Observed daily weather for one lookback year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub year: i32,
    pub max_temp_celsius: f64,
    pub min_temp_celsius: f64,
    /// Always >= 0
    pub precipitation_mm: f64,
}

impl WeatherSample {
    /// Midpoint of the daily max and min temperature
    pub fn mid_temp_celsius(&self) -> f64 {
        (self.max_temp_celsius + self.min_temp_celsius) / 2.0
    }

    pub fn is_rainy(&self) -> bool {
        self.precipitation_mm > 0.0
    }
}

/// Rain flag and average temperature derived from a sample set.
///
/// `avg_temp_celsius` is `None` when there were no samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherVerdict {
    pub rain_flag: bool,
    pub avg_temp_celsius: Option<f64>,
}

impl WeatherVerdict {
    pub fn no_data() -> Self {
        Self {
            rain_flag: false,
            avg_temp_celsius: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.avg_temp_celsius.is_some()
    }
}

/// Classify up to three lookback samples into a verdict
pub fn classify_weather(samples: &[WeatherSample]) -> WeatherVerdict {
    if samples.is_empty() {
        return WeatherVerdict::no_data();
    }

    let rainy_years = samples.iter().filter(|s| s.is_rainy()).count();
    let total: f64 = samples.iter().map(WeatherSample::mid_temp_celsius).sum();

    WeatherVerdict {
        rain_flag: rainy_years >= RAINY_YEARS_REQUIRED,
        avg_temp_celsius: Some(total / samples.len() as f64),
    }
}

/// Weather situation that drives the category preset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeatherOutlook {
    Rainy,
    ColdDry,
    WarmDry,
}

impl WeatherOutlook {
    /// Rain wins over temperature. Missing or NaN temperature is treated as warm.
    pub fn from_verdict(rain_flag: bool, avg_temp_celsius: Option<f64>) -> Self {
        if rain_flag {
            return WeatherOutlook::Rainy;
        }
        match avg_temp_celsius {
            Some(t) if t < COLD_THRESHOLD_CELSIUS => WeatherOutlook::ColdDry,
            _ => WeatherOutlook::WarmDry,
        }
    }

    pub fn categories(&self) -> CategorySelection {
        match self {
            WeatherOutlook::Rainy => CategorySelection::from([
                Category::Museums,
                Category::Restaurants,
                Category::Historical,
                Category::Sightseeing,
            ]),
            WeatherOutlook::ColdDry => CategorySelection::from([
                Category::Museums,
                Category::Historical,
                Category::Tours,
                Category::Sightseeing,
            ]),
            WeatherOutlook::WarmDry => {
                CategorySelection::from([Category::Wine, Category::Historical])
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherOutlook::Rainy => "Rain (2 of 3 years or more)",
            WeatherOutlook::ColdDry => "No rain, average below 15 °C",
            WeatherOutlook::WarmDry => "No rain, average 15 °C or above",
        }
    }
}

/// Default category selection for a weather verdict
pub fn preset_categories(rain_flag: bool, avg_temp_celsius: Option<f64>) -> CategorySelection {
    WeatherOutlook::from_verdict(rain_flag, avg_temp_celsius).categories()
}

/// Same month and day in each of the previous `years` years, newest first.
/// February 29 falls back to February 28 in non-leap years.
pub fn lookback_dates(travel_date: NaiveDate, years: u32) -> Vec<NaiveDate> {
    (1..=years as i32)
        .filter_map(|n| {
            let year = travel_date.year() - n;
            NaiveDate::from_ymd_opt(year, travel_date.month(), travel_date.day())
                .or_else(|| NaiveDate::from_ymd_opt(year, travel_date.month(), 28))
        })
        .collect()
}

/// Everything the UI shows about the lookback weather
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub samples: Vec<WeatherSample>,
    pub verdict: WeatherVerdict,
    pub outlook: WeatherOutlook,
    pub preset: CategorySelection,
    pub summary_en: String,
    pub summary_de: String,
}

impl WeatherReport {
    pub fn from_samples(samples: Vec<WeatherSample>) -> Self {
        let verdict = classify_weather(&samples);
        let outlook = WeatherOutlook::from_verdict(verdict.rain_flag, verdict.avg_temp_celsius);
        let (summary_en, summary_de) = summarize(&verdict);

        Self {
            samples,
            verdict,
            outlook,
            preset: outlook.categories(),
            summary_en,
            summary_de,
        }
    }
}

fn summarize(verdict: &WeatherVerdict) -> (String, String) {
    let Some(avg) = verdict.avg_temp_celsius else {
        return (
            "No weather data available.".to_string(),
            "Keine Wetterdaten verfügbar.".to_string(),
        );
    };

    if verdict.rain_flag {
        (
            format!("Rain expected, average temperature {avg:.1} °C."),
            format!("Regen erwartet, Durchschnittstemperatur {avg:.1} °C."),
        )
    } else {
        (
            format!("No rain expected, average temperature {avg:.1} °C."),
            format!("Kein Regen erwartet, Durchschnittstemperatur {avg:.1} °C."),
        )
    }
}

/// One row of the rule table shown to users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetRule {
    pub outlook: WeatherOutlook,
    pub condition: String,
    pub categories: CategorySelection,
}

/// Human-readable explanation of how the weather preset is derived
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRules {
    pub rain_detection: String,
    pub temperature_average: String,
    pub presets: Vec<PresetRule>,
}

pub fn weather_rules() -> WeatherRules {
    WeatherRules {
        rain_detection: format!(
            "A date counts as rainy when precipitation above 0 mm was measured on it in at least {} of the last {} years.",
            RAINY_YEARS_REQUIRED, LOOKBACK_YEARS
        ),
        temperature_average:
            "Average temperature is the mean of each year's (daily max + daily min) / 2.".to_string(),
        presets: [
            WeatherOutlook::Rainy,
            WeatherOutlook::ColdDry,
            WeatherOutlook::WarmDry,
        ]
        .into_iter()
        .map(|outlook| PresetRule {
            outlook,
            condition: outlook.label().to_string(),
            categories: outlook.categories(),
        })
        .collect(),
    }
}
