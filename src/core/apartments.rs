//! Static apartment data and the popup view derived from it.
//!
//! The store is parsed once from the embedded JSON table and is read-only
//! afterwards. Identifiers are the object keys and match the suffix of the
//! click-region mesh names.

use super::constants::{
    FLOORPLAN_DIR, PLAN_PLACEHOLDER_SRC, STATUS_COLOR_AVAILABLE, STATUS_COLOR_DEFAULT,
    STATUS_COLOR_SOLD,
};
use fnv::FnvHashMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid apartment data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate apartment id {0:?}")]
    DuplicateId(String),
}

/// A display value as it appears in the JSON table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
    /// Arrays and objects, shown the way a browser stringifies them.
    Other(serde_json::Value),
}

impl FieldValue {
    /// Whether the popup shows this value. Empty text, zero and `false` are
    /// treated as missing.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Flag(b) => *b,
            FieldValue::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Other(v) => !v.is_null(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Flag(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write_number(f, n),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Other(v) => f.write_str(&js_string(v)),
        }
    }
}

// Whole floats print without a trailing `.0`.
fn write_number(f: &mut fmt::Formatter<'_>, n: &serde_json::Number) -> fmt::Result {
    match n.as_f64() {
        Some(v) if n.is_f64() && v.is_finite() => write!(f, "{}", v),
        _ => write!(f, "{}", n),
    }
}

fn js_string(v: &serde_json::Value) -> String {
    use serde_json::Value;
    match v {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => FieldValue::Number(n.clone()).to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(js_string).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ApartmentRecord {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub floor: Option<FieldValue>,
    #[serde(default)]
    pub area_m2: Option<FieldValue>,
    #[serde(default)]
    pub rooms: Option<FieldValue>,
    #[serde(default)]
    pub price_eur: Option<FieldValue>,
    #[serde(default)]
    pub status: Option<FieldValue>,
    #[serde(default)]
    pub note: Option<FieldValue>,
    #[serde(default, rename = "planImage")]
    pub plan_image: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl ApartmentRecord {
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().and_then(FieldValue::as_text)
    }

    pub fn field(&self, field: DisplayField) -> Option<&FieldValue> {
        match field {
            DisplayField::Floor => self.floor.as_ref(),
            DisplayField::AreaM2 => self.area_m2.as_ref(),
            DisplayField::Rooms => self.rooms.as_ref(),
            DisplayField::PriceEur => self.price_eur.as_ref(),
            DisplayField::Status => self.status.as_ref(),
            DisplayField::Note => self.note.as_ref(),
        }
    }
}

/// Fields shown in the popup, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayField {
    Floor,
    AreaM2,
    Rooms,
    PriceEur,
    Status,
    Note,
}

pub const DISPLAY_FIELDS: [DisplayField; 6] = [
    DisplayField::Floor,
    DisplayField::AreaM2,
    DisplayField::Rooms,
    DisplayField::PriceEur,
    DisplayField::Status,
    DisplayField::Note,
];

impl DisplayField {
    pub fn key(self) -> &'static str {
        match self {
            DisplayField::Floor => "floor",
            DisplayField::AreaM2 => "area_m2",
            DisplayField::Rooms => "rooms",
            DisplayField::PriceEur => "price_eur",
            DisplayField::Status => "status",
            DisplayField::Note => "note",
        }
    }
}

/// Serbian label for a data key; unknown keys are shown with spaces.
pub fn field_label(key: &str) -> Cow<'static, str> {
    match key {
        "floor" => Cow::Borrowed("Sprat"),
        "area_m2" => Cow::Borrowed("Površina (m²)"),
        "rooms" => Cow::Borrowed("Broj soba"),
        "price_eur" => Cow::Borrowed("Cena (€)"),
        "status" => Cow::Borrowed("Status"),
        "note" => Cow::Borrowed("Napomena"),
        other => Cow::Owned(other.replace('_', " ")),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PopupRow {
    pub label: Cow<'static, str>,
    pub value: String,
}

pub fn popup_rows(record: &ApartmentRecord) -> Vec<PopupRow> {
    DISPLAY_FIELDS
        .iter()
        .filter_map(|&f| {
            let v = record.field(f)?;
            v.is_present().then(|| PopupRow {
                label: field_label(f.key()),
                value: v.to_string(),
            })
        })
        .collect()
}

/// Conventional floor-plan path for an apartment class name.
pub fn floorplan_image_src(apartment_class: &str) -> String {
    format!("{}/{}.png", FLOORPLAN_DIR, apartment_class.trim())
}

/// Image shown in the popup: the record's own plan image, the placeholder
/// when that is blank, or the floor-plan convention when the record has none.
pub fn plan_image_src(record: &ApartmentRecord) -> String {
    match record.plan_image.as_deref() {
        Some(src) if !src.trim().is_empty() => src.to_string(),
        Some(_) => PLAN_PLACEHOLDER_SRC.to_string(),
        None => floorplan_image_src(&record.id),
    }
}

/// Highlight color for an apartment status. Only `sold` and `available` are
/// recognised; everything else, including a missing status, is gray.
pub fn status_color(status: Option<&str>) -> &'static str {
    match status.map(|s| s.to_lowercase()) {
        Some(s) if s == "sold" => STATUS_COLOR_SOLD,
        Some(s) if s == "available" => STATUS_COLOR_AVAILABLE,
        _ => STATUS_COLOR_DEFAULT,
    }
}

#[derive(Clone, Debug, Default)]
pub struct ApartmentStore {
    records: FnvHashMap<String, ApartmentRecord>,
}

impl ApartmentStore {
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let Entries(entries) = serde_json::from_str(json)?;
        let mut records = FnvHashMap::default();
        records.reserve(entries.len());
        for (id, mut record) in entries {
            if records.contains_key(&id) {
                return Err(StoreError::DuplicateId(id));
            }
            record.id = id.clone();
            records.insert(id, record);
        }
        Ok(Self { records })
    }

    pub fn get(&self, id: &str) -> Option<&ApartmentRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

// Keeps every key/value pair in document order so duplicates can be reported
// instead of silently overwritten.
struct Entries(Vec<(String, ApartmentRecord)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object keyed by apartment id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entries, A::Error> {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((k, v)) = map.next_entry::<String, ApartmentRecord>()? {
                    out.push((k, v));
                }
                Ok(Entries(out))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
