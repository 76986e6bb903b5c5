//! Boundary normalization of provider payloads.
//!
//! Providers send JSON whose shape drifts: quantities as numbers or numeric
//! strings, recipe ids as integers or strings, missing items as display
//! strings or objects. Rows that can't be read are skipped with a warning;
//! only structural problems (wrong top-level type, too many rows) fail.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::catalog::store::RecipeCatalog;
use crate::core::ingredient::Normalizer;
use crate::core::pantry::PantryEntry;
use crate::core::recipe::{MissingIngredient, RecipeId};
use crate::matching::preference::{
    default_labels, CookingRecord, PreferenceProfile, Preferences, RecommendationSignal,
};
use crate::parsing::ParseError;
use crate::utils::validation::{check_pantry_limit, MAX_PANTRY_ENTRIES, MAX_RECIPES};

/// Keys tried, in order, for an inventory or missing item's name
const NAME_KEYS: [&str; 4] = ["name", "food_name", "ingredient", "item"];

/// Keys tried, in order, for a missing item's amount
const MISSING_AMOUNT_KEYS: [&str; 5] = [
    "shortage",
    "shortage_amount",
    "missing_quantity_g",
    "missing_quantity",
    "required",
];

/// Read inventory rows.
///
/// A row is either a bare name string or an object naming the item under
/// `name`, `food_name`, `ingredient` or `item`. Other rows and rows without a
/// name are skipped. `quantity` may be a number or a numeric string and
/// defaults to 0; an unreadable `expiration_date` becomes `None`.
///
/// # Errors
///
/// Returns `ParseError::TooManyEntries` past the pantry limit.
pub fn parse_inventory_payload(items: &[Value]) -> Result<Vec<PantryEntry>, ParseError> {
    let mut entries = Vec::new();

    for (i, item) in items.iter().enumerate() {
        let entry = match item {
            Value::String(name) => Some(PantryEntry::new(name.trim())),
            Value::Object(obj) => Some(inventory_row(obj)),
            _ => None,
        };
        let Some(entry) = entry else {
            tracing::warn!("inventory row {} is not a name or an object; skipped", i + 1);
            continue;
        };
        if entry.name.is_empty() {
            tracing::warn!("inventory row {} has no name; skipped", i + 1);
            continue;
        }

        if check_pantry_limit(entries.len()).is_some() {
            return Err(ParseError::TooManyEntries(entries.len() + 1, MAX_PANTRY_ENTRIES));
        }

        entries.push(entry);
    }

    tracing::debug!("parsed {} of {} inventory rows", entries.len(), items.len());
    Ok(entries)
}

fn inventory_row(obj: &serde_json::Map<String, Value>) -> PantryEntry {
    let name = NAME_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(value_as_string))
        .unwrap_or_default();

    let quantity = obj.get("quantity").and_then(value_as_f64).unwrap_or(0.0);
    let unit = obj
        .get("unit")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let expiration_date = obj
        .get("expiration_date")
        .and_then(Value::as_str)
        .and_then(parse_iso_date);

    PantryEntry {
        name: name.trim().to_string(),
        quantity,
        unit,
        expiration_date,
    }
}

/// Read an inventory payload given as a JSON document: either an array of
/// rows or an object with an `inventory` or `items` array.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for any other shape.
pub fn parse_inventory_value(value: &Value) -> Result<Vec<PantryEntry>, ParseError> {
    match value {
        Value::Array(items) => parse_inventory_payload(items),
        Value::Object(obj) => {
            let items = obj
                .get("inventory")
                .or_else(|| obj.get("items"))
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    ParseError::InvalidFormat(
                        "expected an 'inventory' or 'items' array".to_string(),
                    )
                })?;
            parse_inventory_payload(items)
        }
        _ => Err(ParseError::InvalidFormat(
            "inventory must be a JSON array or object".to_string(),
        )),
    }
}

/// Fold one reported missing item into a [`MissingIngredient`].
///
/// Accepts display strings (`"エビ (50.0g不足)"`, `"パスタ (200.0g必要)"`,
/// `"パスタ"`) and objects keyed by `name`/`food_name` with an optional
/// amount under `shortage`/`missing_quantity_g` and similar keys. Returns
/// `None` when no name can be read.
pub fn parse_missing_item(value: &Value, normalizer: &Normalizer) -> Option<MissingIngredient> {
    let (name, amount) = match value {
        Value::String(s) => (normalizer.normalize(s), parenthetical_amount(s)),
        Value::Object(obj) => {
            let raw = NAME_KEYS
                .iter()
                .find_map(|key| obj.get(*key).and_then(value_as_string))?;
            let amount = MISSING_AMOUNT_KEYS
                .iter()
                .find_map(|key| obj.get(*key).and_then(value_as_f64));
            (normalizer.normalize(&raw), amount)
        }
        _ => return None,
    };

    if name.is_empty() {
        return None;
    }
    let entry = MissingIngredient::new(name);
    Some(match amount {
        Some(amount) => entry.with_shortage(amount),
        None => entry,
    })
}

/// Read recommendation output into [`Preferences`].
///
/// Accepts either an array of per-recipe results or an object with a
/// `results` (or `recommendations`) array. A profile is taken from
/// top-level `user_preference_vector`/`user_preference_labels`, or from the
/// first result that carries them.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for any other shape,
/// `ParseError::TooManyEntries` past the recipe limit.
pub fn parse_recommendations(value: &Value, normalizer: &Normalizer) -> Result<Preferences, ParseError> {
    let (results, top): (&[Value], Option<&serde_json::Map<String, Value>>) = match value {
        Value::Array(items) => (items.as_slice(), None),
        Value::Object(obj) => {
            let results = obj
                .get("results")
                .or_else(|| obj.get("recommendations"))
                .and_then(Value::as_array)
                .map_or(&[][..], Vec::as_slice);
            (results, Some(obj))
        }
        _ => {
            return Err(ParseError::InvalidFormat(
                "recommendations must be a JSON array or object".to_string(),
            ))
        }
    };

    if results.len() > MAX_RECIPES {
        return Err(ParseError::TooManyEntries(results.len(), MAX_RECIPES));
    }

    let profile = top
        .and_then(parse_profile)
        .or_else(|| results.iter().filter_map(Value::as_object).find_map(parse_profile));
    let mut preferences = Preferences {
        profile,
        ..Preferences::default()
    };

    for (i, result) in results.iter().enumerate() {
        match parse_signal(result, normalizer) {
            Some(signal) => preferences.add_signal(signal),
            None => tracing::warn!("recommendation {} has no recipe id; skipped", i + 1),
        }
    }

    tracing::debug!(
        "parsed {} recommendation signals (profile: {})",
        preferences.signals.len(),
        preferences.profile.is_some()
    );
    Ok(preferences)
}

/// Read a preferences document.
///
/// Everything [`parse_recommendations`] accepts, plus an object with a
/// `history` array of `{recipe_id, completed_at}` rows. A history-derived
/// profile (labels from `labels`, else the built-in feature labels) is used
/// only when the document carries no explicit preference vector.
///
/// # Errors
///
/// Same as [`parse_recommendations`].
pub fn parse_preferences_document(
    value: &Value,
    catalog: &RecipeCatalog,
    normalizer: &Normalizer,
    now: DateTime<Utc>,
) -> Result<Preferences, ParseError> {
    let mut preferences = parse_recommendations(value, normalizer)?;

    if preferences.profile.is_none() {
        if let Some(history) = value.get("history").and_then(Value::as_array) {
            let labels = value
                .get("labels")
                .and_then(Value::as_array)
                .map(|labels| labels.iter().filter_map(value_as_string).collect())
                .unwrap_or_else(default_labels);
            let records = parse_history_payload(history);
            preferences.profile = PreferenceProfile::from_history(labels, &records, catalog, now);
            if preferences.profile.is_none() {
                tracing::warn!(
                    "none of {} history rows matched a catalog recipe; no profile built",
                    history.len()
                );
            }
        }
    }

    Ok(preferences)
}

fn parse_profile(obj: &serde_json::Map<String, Value>) -> Option<PreferenceProfile> {
    let vector: Vec<f64> = obj
        .get("user_preference_vector")?
        .as_array()?
        .iter()
        .map(|v| value_as_f64(v).unwrap_or(0.0))
        .collect();
    let labels: Vec<String> = obj
        .get("user_preference_labels")?
        .as_array()?
        .iter()
        .map(|v| value_as_string(v).unwrap_or_default())
        .collect();
    if vector.is_empty() || labels.is_empty() {
        return None;
    }
    Some(PreferenceProfile::new(labels, vector))
}

fn parse_signal(value: &Value, normalizer: &Normalizer) -> Option<RecommendationSignal> {
    let obj = value.as_object()?;
    let id = obj
        .get("recipe_id")
        .or_else(|| obj.get("id"))
        .and_then(value_as_string)
        .filter(|id| !id.trim().is_empty())?;

    let mut signal = RecommendationSignal::new(RecipeId::new(id.trim()));
    signal.preference_score = obj.get("preference_score").and_then(value_as_f64);
    signal.is_boosted = obj
        .get("is_boosted")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    signal.missing = obj
        .get("missing_items")
        .or_else(|| obj.get("missing"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| parse_missing_item(item, normalizer))
                .collect()
        })
        .unwrap_or_default();
    Some(signal)
}

/// Read cooking history rows `{recipe_id, completed_at}`.
///
/// Rows without an id or a readable timestamp are skipped. Timestamps may be
/// RFC 3339, a naive ISO datetime (taken as UTC), or a bare date.
pub fn parse_history_payload(items: &[Value]) -> Vec<CookingRecord> {
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let id = obj.get("recipe_id").and_then(value_as_string)?;
            let completed_at = obj
                .get("completed_at")
                .and_then(Value::as_str)
                .and_then(parse_timestamp)?;
            Some(CookingRecord {
                recipe_id: RecipeId::new(id),
                completed_at,
            })
        })
        .collect()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    parse_iso_date(raw)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// First number inside the first parenthetical: `"エビ (50.0g不足)"` gives 50.0
fn parenthetical_amount(raw: &str) -> Option<f64> {
    let start = raw.find(['(', '（'])?;
    let inner = &raw[start..];
    let inner = inner.trim_start_matches(['(', '（']).trim_start();
    let number: String = inner
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number.parse().ok()
}

/// Strings, or numbers rendered as strings (integer recipe ids)
fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers, or strings that parse as numbers
fn value_as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|v: &f64| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inventory_payload_skips_bad_rows() {
        let items = vec![
            json!({"name": "玉ねぎ", "quantity": 2, "unit": "個", "expiration_date": "2026-10-20"}),
            json!({"name": "  ", "quantity": 1}),
            json!(42),
            json!({"quantity": 3}),
            json!({"name": "牛乳", "quantity": "500", "expiration_date": "soon"}),
            json!({"name": "卵", "quantity": "many"}),
            json!(" 豚肉 "),
            json!({"food_name": "エビ", "quantity": 100, "unit": "g"}),
        ];
        let entries = parse_inventory_payload(&items).unwrap();

        assert_eq!(entries.len(), 5);
        assert_eq!(entries[3].name, "豚肉");
        assert_eq!(entries[4].name, "エビ");
        assert_eq!(entries[4].unit, "g");
        assert_eq!(entries[0].name, "玉ねぎ");
        assert!((entries[0].quantity - 2.0).abs() < 1e-9);
        assert_eq!(entries[0].unit, "個");
        assert_eq!(entries[0].expiration_date, NaiveDate::from_ymd_opt(2026, 10, 20));
        assert!((entries[1].quantity - 500.0).abs() < 1e-9);
        assert!(entries[1].expiration_date.is_none());
        assert!(entries[2].quantity.abs() < 1e-9);
    }

    #[test]
    fn test_inventory_payload_limit() {
        let items: Vec<Value> = (0..=MAX_PANTRY_ENTRIES)
            .map(|i| json!({"name": format!("item{i}")}))
            .collect();
        assert!(matches!(
            parse_inventory_payload(&items),
            Err(ParseError::TooManyEntries(_, MAX_PANTRY_ENTRIES))
        ));
    }

    #[test]
    fn test_inventory_value_shapes() {
        let normalized = parse_inventory_value(&json!({"inventory": [{"name": "egg"}]})).unwrap();
        assert_eq!(normalized.len(), 1);
        let bare = parse_inventory_value(&json!([{"name": "egg"}, {"name": "milk"}])).unwrap();
        assert_eq!(bare.len(), 2);
        assert!(parse_inventory_value(&json!("egg")).is_err());
        assert!(parse_inventory_value(&json!({"other": []})).is_err());
    }

    #[test]
    fn test_missing_item_strings() {
        let n = Normalizer::default();

        let shrimp = parse_missing_item(&json!("エビ (50.0g不足)"), &n).unwrap();
        assert_eq!(shrimp.name.as_str(), "エビ");
        assert_eq!(shrimp.shortage_amount, Some(50.0));

        let pasta = parse_missing_item(&json!("パスタ (200.0g必要)"), &n).unwrap();
        assert_eq!(pasta.name.as_str(), "パスタ");
        assert_eq!(pasta.shortage_amount, Some(200.0));

        let plain = parse_missing_item(&json!("パスタ"), &n).unwrap();
        assert_eq!(plain.shortage_amount, None);

        let full_width = parse_missing_item(&json!("たまねぎ（30g不足）"), &n).unwrap();
        assert_eq!(full_width.name.as_str(), "玉ねぎ");
        assert_eq!(full_width.shortage_amount, Some(30.0));

        assert!(parse_missing_item(&json!("   "), &n).is_none());
        assert!(parse_missing_item(&json!(42), &n).is_none());
    }

    #[test]
    fn test_missing_item_objects() {
        let n = Normalizer::default();

        let a = parse_missing_item(&json!({"name": "Eggs", "shortage": 2}), &n).unwrap();
        assert_eq!(a.name.as_str(), "egg");
        assert_eq!(a.shortage_amount, Some(2.0));

        let b = parse_missing_item(&json!({"food_name": "エビ", "missing_quantity_g": "50.5"}), &n)
            .unwrap();
        assert_eq!(b.name.as_str(), "エビ");
        assert_eq!(b.shortage_amount, Some(50.5));

        let c = parse_missing_item(&json!({"food_name": "パスタ"}), &n).unwrap();
        assert_eq!(c.shortage_amount, None);

        assert!(parse_missing_item(&json!({"shortage": 1}), &n).is_none());
    }

    #[test]
    fn test_missing_item_shapes_agree() {
        let n = Normalizer::default();
        let from_string = parse_missing_item(&json!("エビ (50.0g不足)"), &n);
        let from_object = parse_missing_item(&json!({"food_name": "えび", "missing_quantity_g": 50.0}), &n);
        assert_eq!(from_string, from_object);
    }

    #[test]
    fn test_parse_recommendations_object() {
        let n = Normalizer::default();
        let value = json!({
            "user_preference_vector": [1.0, 0.0],
            "user_preference_labels": ["和食", "洋食"],
            "results": [
                {"recipe_id": 1, "preference_score": 0.8, "is_boosted": true,
                 "missing_items": ["エビ (50.0g不足)"]},
                {"recipe_id": "nikujaga"},
                {"recipe_name": "no id"}
            ]
        });
        let prefs = parse_recommendations(&value, &n).unwrap();

        let profile = prefs.profile.as_ref().unwrap();
        assert_eq!(profile.labels, vec!["和食".to_string(), "洋食".to_string()]);
        assert_eq!(prefs.signals.len(), 2);

        let first = prefs.signal(&RecipeId::new("1")).unwrap();
        assert_eq!(first.preference_score, Some(0.8));
        assert!(first.is_boosted);
        assert_eq!(first.missing.len(), 1);

        let second = prefs.signal(&RecipeId::new("nikujaga")).unwrap();
        assert_eq!(second.preference_score, None);
        assert!(!second.is_boosted);
    }

    #[test]
    fn test_parse_recommendations_profile_from_result() {
        let n = Normalizer::default();
        let value = json!([
            {"recipe_id": 3, "user_preference_vector": [0.2], "user_preference_labels": ["中華"]}
        ]);
        let prefs = parse_recommendations(&value, &n).unwrap();
        assert_eq!(prefs.profile.unwrap().labels, vec!["中華".to_string()]);
        assert!(parse_recommendations(&json!(1), &n).is_err());
    }

    #[test]
    fn test_parse_history_payload() {
        let items = vec![
            json!({"recipe_id": 1, "completed_at": "2026-10-01T12:00:00Z"}),
            json!({"recipe_id": "nikujaga", "completed_at": "2026-10-02T08:30:00"}),
            json!({"recipe_id": "oyakodon", "completed_at": "2026-10-03"}),
            json!({"recipe_id": "bad", "completed_at": "yesterday"}),
            json!({"completed_at": "2026-10-03"}),
        ];
        let history = parse_history_payload(&items);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].recipe_id, RecipeId::new("1"));
        assert_eq!(history[2].completed_at.to_rfc3339(), "2026-10-03T00:00:00+00:00");
    }

    #[test]
    fn test_preferences_document_from_history() {
        let n = Normalizer::default();
        let mut catalog = RecipeCatalog::new();
        catalog.add_recipe(crate::core::recipe::Recipe::new("wa", "和").with_feature("和食", 1.0));
        let now = Utc::now();
        let value = json!({
            "history": [{"recipe_id": "wa", "completed_at": now.to_rfc3339()}],
            "results": [{"recipe_id": "wa", "is_boosted": true}]
        });
        let prefs = parse_preferences_document(&value, &catalog, &n, now).unwrap();
        let profile = prefs.profile.unwrap();
        assert_eq!(profile.labels.len(), 12);
        assert!((profile.vector[0] - 1.0).abs() < 1e-9);
        assert!(prefs.signals[&RecipeId::new("wa")].is_boosted);

        // An explicit vector wins over history
        let value = json!({
            "user_preference_vector": [0.5],
            "user_preference_labels": ["洋食"],
            "history": [{"recipe_id": "wa", "completed_at": now.to_rfc3339()}]
        });
        let prefs = parse_preferences_document(&value, &catalog, &n, now).unwrap();
        assert_eq!(prefs.profile.unwrap().labels, vec!["洋食".to_string()]);
    }

    #[test]
    fn test_parenthetical_amount() {
        assert_eq!(parenthetical_amount("エビ (50.0g不足)"), Some(50.0));
        assert_eq!(parenthetical_amount("エビ"), None);
        assert_eq!(parenthetical_amount("エビ (少々)"), None);
    }
}
