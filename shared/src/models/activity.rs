//! Tourist activity records as returned by the travel-data provider

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Rating used for sorting when an activity has none
pub const MISSING_RATING_SORT_KEY: f64 = -1.0;

/// A bookable activity near the selected city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    /// 0-5; the provider sends it as a string or a number
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_duration: Option<String>,
    #[serde(default)]
    pub pictures: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Sent as a string or a number; blank or unparseable means no amount
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

impl ActivityRecord {
    /// Lowercased "name description" text used for keyword matching
    pub fn search_text(&self) -> String {
        format!("{} {}", self.name, self.short_description).to_lowercase()
    }

    pub fn price_amount(&self) -> Option<Decimal> {
        self.price.as_ref().and_then(|p| p.amount)
    }

    pub fn rating_sort_key(&self) -> f64 {
        self.rating.unwrap_or(MISSING_RATING_SORT_KEY)
    }

    /// e.g. "1,234.56 EUR", or "N/A" without an amount
    pub fn price_label(&self) -> String {
        match &self.price {
            Some(Price {
                amount: Some(amount),
                currency_code,
            }) => {
                let formatted = format_amount(*amount);
                match currency_code.as_deref() {
                    Some(code) if !code.is_empty() => format!("{formatted} {code}"),
                    _ => formatted,
                }
            }
            _ => "N/A".to_string(),
        }
    }

    pub fn rating_label(&self) -> String {
        self.rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Two decimals with comma thousands separators
fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part:0<2}")
}

fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|r| r.is_finite()))
}

fn deserialize_lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(serde_json::Value::String(s)) => parse_decimal(s.trim()),
        _ => None,
    })
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_provider_payload() {
        let json = r#"{
            "type": "activity",
            "id": "4615",
            "name": "Vineyard Tour",
            "shortDescription": "Taste local wine",
            "rating": "4.500000",
            "price": {"amount": "1234.5", "currencyCode": "EUR"},
            "minimumDuration": "3 hours",
            "pictures": ["https://img.example/1.jpg"],
            "bookingLink": "https://book.example/4615"
        }"#;

        let activity: ActivityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(activity.rating, Some(4.5));
        assert_eq!(activity.price_amount(), Some(Decimal::from_str("1234.5").unwrap()));
        assert_eq!(activity.price_label(), "1,234.50 EUR");
        assert_eq!(activity.minimum_duration.as_deref(), Some("3 hours"));
    }

    #[test]
    fn test_numeric_rating_and_price() {
        let json = r#"{"id": "1", "name": "A", "rating": 3, "price": {"amount": 12}}"#;
        let activity: ActivityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(activity.rating, Some(3.0));
        assert_eq!(activity.price_label(), "12.00");
    }

    #[test]
    fn test_missing_fields_default() {
        let activity: ActivityRecord = serde_json::from_str(r#"{"id": "2"}"#).unwrap();
        assert_eq!(activity.rating, None);
        assert_eq!(activity.rating_sort_key(), MISSING_RATING_SORT_KEY);
        assert_eq!(activity.price_label(), "N/A");
        assert_eq!(activity.rating_label(), "N/A");
        assert!(activity.pictures.is_empty());
    }

    #[test]
    fn test_garbage_rating_is_absent() {
        let json = r#"{"id": "3", "rating": "not rated"}"#;
        let activity: ActivityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(activity.rating, None);
    }

    #[test]
    fn test_unusable_price_amount_is_absent() {
        let json = r#"[
            {"id": "1"},
            {"id": "2", "price": {"amount": "", "currencyCode": "EUR"}},
            {"id": "3", "price": {"amount": "on request", "currencyCode": "EUR"}},
            {"id": "4", "price": {"amount": " 45.90 ", "currencyCode": "EUR"}}
        ]"#;
        let activities: Vec<ActivityRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(activities.len(), 4);
        assert_eq!(activities[1].price_amount(), None);
        assert_eq!(activities[1].price_label(), "N/A");
        assert_eq!(activities[2].price_amount(), None);
        assert_eq!(activities[3].price_label(), "45.90 EUR");
    }

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(Decimal::from(1_234_567)), "1,234,567.00");
        assert_eq!(format_amount(Decimal::from_str("999.999").unwrap()), "1,000.00");
        assert_eq!(format_amount(Decimal::from_str("0.5").unwrap()), "0.50");
    }

    #[test]
    fn test_search_text_is_lowercase() {
        let activity: ActivityRecord =
            serde_json::from_str(r#"{"name": "City MUSEUM", "shortDescription": "Old Art"}"#)
                .unwrap();
        assert_eq!(activity.search_text(), "city museum old art");
    }
}
