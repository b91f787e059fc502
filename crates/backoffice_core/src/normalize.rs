//! Maps heterogeneous API records onto [`CanonicalItem`].
//!
//! Upstream payloads name the same attribute differently depending on the
//! sub-type (`nom` for products, `titre` for donations, ...). Each logical
//! attribute therefore has an ordered list of candidate keys; the first key
//! holding a usable value wins. Every accessor degrades to a safe default,
//! so the only way a record is rejected is a missing identifier.

use std::collections::HashSet;

use backoffice_logging::{bo_debug, bo_warn};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::item::{CanonicalItem, ItemType, Owner, SourceKind};

const UNTITLED: &str = "Untitled";

const ID_KEYS: &[&str] = &["uuid", "id", "_id"];
const TITLE_KEYS: &[&str] = &["nom", "libelle", "titre", "title", "name"];
const DESCRIPTION_KEYS: &[&str] = &["description", "desc", "details"];
const STATUS_KEYS: &[&str] = &["statut", "status", "etat"];
const CREATED_KEYS: &[&str] = &["created_at", "createdAt", "date_creation"];
const UPDATED_KEYS: &[&str] = &["updated_at", "updatedAt", "date_modification"];
const PUBLISHED_KEYS: &[&str] = &["est_publie", "is_published", "published", "publie"];
const BLOCKED_KEYS: &[&str] = &["est_bloque", "is_blocked", "blocked", "bloque"];
const DELETED_KEYS: &[&str] = &["is_deleted", "est_supprime", "deleted"];
const DELETED_AT_KEYS: &[&str] = &["deleted_at"];
const PRICE_KEYS: &[&str] = &["prix", "price", "montant"];
const QUANTITY_KEYS: &[&str] = &["quantite", "quantity", "stock"];
const OWNER_KEYS: &[&str] = &["vendeur", "utilisateur", "user", "owner", "createur"];
const CATEGORY_KEYS: &[&str] = &["categorie", "category", "categorie_libelle"];
const TYPE_KEYS: &[&str] = &["type", "type_annonce"];

const OWNER_NAME_KEYS: &[&str] = &["nom_complet", "full_name", "name"];
const OWNER_FIRST_NAME_KEYS: &[&str] = &["prenoms", "prenom", "first_name"];
const OWNER_LAST_NAME_KEYS: &[&str] = &["nom", "last_name"];
const OWNER_PRO_FLAG_KEYS: &[&str] = &["est_professionnel", "is_professional"];
const OWNER_PRO_TYPE_KEYS: &[&str] = &["type", "type_compte"];

/// Keys under which a favorite wraps the favorited record, with the item
/// type each one implies.
const FAVORITE_WRAPPERS: &[(&str, Option<ItemType>)] = &[
    ("annonce", Some(ItemType::Listing)),
    ("produit", Some(ItemType::Product)),
    ("don", Some(ItemType::Donation)),
    ("echange", Some(ItemType::Exchange)),
    ("item", None),
];

/// Ordered set of JSON objects searched for each attribute.
struct Layers<'a> {
    objects: Vec<&'a Map<String, Value>>,
}

impl<'a> Layers<'a> {
    fn lookup(&self, keys: &[&str]) -> Option<&'a Value> {
        self.objects
            .iter()
            .find_map(|object| lookup(*object, keys))
    }

    fn string(&self, keys: &[&str]) -> Option<String> {
        self.objects
            .iter()
            .find_map(|object| keys.iter().find_map(|key| object.get(*key).and_then(as_text)))
    }

    fn flag(&self, keys: &[&str]) -> Option<bool> {
        self.objects
            .iter()
            .find_map(|object| keys.iter().find_map(|key| object.get(*key).and_then(as_bool)))
    }
}

/// First value under `keys` that is neither null nor an empty string.
fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(text) => !text.trim().is_empty(),
            _ => true,
        })
}

/// Normalizes one raw record. Returns `None` when the record is not an
/// object or carries no usable identifier.
pub fn normalize(raw: &Value, kind: SourceKind) -> Option<CanonicalItem> {
    let record = raw.as_object()?;
    let id = ID_KEYS
        .iter()
        .find_map(|key| record.get(*key).and_then(as_text))?;

    let (layers, wrapped_type) = match kind {
        SourceKind::Favorite => favorite_layers(record),
        _ => (
            Layers {
                objects: vec![record],
            },
            None,
        ),
    };

    let item_type = match kind {
        SourceKind::Listing | SourceKind::Favorite => wrapped_type
            .or_else(|| {
                layers
                    .string(TYPE_KEYS)
                    .and_then(|text| text.parse::<ItemType>().ok())
            })
            .unwrap_or_else(|| kind.default_item_type()),
        _ => kind.default_item_type(),
    };

    let is_published = layers.flag(PUBLISHED_KEYS).unwrap_or(false);
    let is_blocked = layers.flag(BLOCKED_KEYS).unwrap_or(false);
    let is_deleted = layers.flag(DELETED_KEYS).unwrap_or(false)
        || layers.lookup(DELETED_AT_KEYS).is_some();

    let status = layers
        .string(STATUS_KEYS)
        .map(|status| status.to_lowercase())
        .unwrap_or_else(|| derive_status(kind, is_deleted, is_blocked, is_published).to_string());

    Some(CanonicalItem {
        id,
        title: layers
            .string(TITLE_KEYS)
            .unwrap_or_else(|| UNTITLED.to_string()),
        description: layers.string(DESCRIPTION_KEYS).unwrap_or_default(),
        item_type,
        status,
        created_at: layers.lookup(CREATED_KEYS).and_then(as_timestamp),
        updated_at: layers.lookup(UPDATED_KEYS).and_then(as_timestamp),
        is_published,
        is_blocked,
        is_deleted,
        price: layers.lookup(PRICE_KEYS).and_then(as_number),
        quantity: layers
            .lookup(QUANTITY_KEYS)
            .and_then(as_quantity)
            .unwrap_or(1),
        owner: layers.lookup(OWNER_KEYS).and_then(as_owner),
        category: layers.lookup(CATEGORY_KEYS).and_then(as_category),
        raw: raw.clone(),
    })
}

fn favorite_layers(record: &Map<String, Value>) -> (Layers<'_>, Option<ItemType>) {
    for (key, implied) in FAVORITE_WRAPPERS {
        if let Some(inner) = record.get(*key).and_then(Value::as_object) {
            // An explicit type on the wrapped record beats the wrapper key.
            let explicit = TYPE_KEYS
                .iter()
                .find_map(|type_key| inner.get(*type_key).and_then(as_text))
                .and_then(|text| text.parse::<ItemType>().ok());
            return (
                Layers {
                    objects: vec![inner, record],
                },
                explicit.or(*implied),
            );
        }
    }
    (
        Layers {
            objects: vec![record],
        },
        None,
    )
}

fn derive_status(kind: SourceKind, deleted: bool, blocked: bool, published: bool) -> &'static str {
    if deleted {
        "deleted"
    } else if blocked {
        "blocked"
    } else if published {
        "published"
    } else if kind == SourceKind::Role {
        "active"
    } else {
        "pending"
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "oui" | "yes" => Some(true),
            "false" | "0" | "non" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn as_quantity(value: &Value) -> Option<u32> {
    let number = as_number(value)?;
    if number < 0.0 {
        return None;
    }
    Some(number.min(f64::from(u32::MAX)) as u32)
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::String(text) => parse_timestamp(text.trim()),
        _ => None,
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn as_owner(value: &Value) -> Option<Owner> {
    match value {
        Value::String(name) => {
            let name = name.trim();
            (!name.is_empty()).then(|| Owner {
                name: name.to_string(),
                is_professional: false,
            })
        }
        Value::Object(object) => {
            let layers = Layers {
                objects: vec![object],
            };
            let name = layers.string(OWNER_NAME_KEYS).or_else(|| {
                let parts: Vec<String> = [OWNER_FIRST_NAME_KEYS, OWNER_LAST_NAME_KEYS]
                    .into_iter()
                    .filter_map(|keys| layers.string(keys))
                    .collect();
                (!parts.is_empty()).then(|| parts.join(" "))
            })?;
            let is_professional = layers.flag(OWNER_PRO_FLAG_KEYS).unwrap_or_else(|| {
                layers
                    .string(OWNER_PRO_TYPE_KEYS)
                    .map(|kind| {
                        matches!(
                            kind.to_ascii_lowercase().as_str(),
                            "professionnel" | "professional" | "pro"
                        )
                    })
                    .unwrap_or(false)
            });
            Some(Owner {
                name,
                is_professional,
            })
        }
        _ => None,
    }
}

fn as_category(value: &Value) -> Option<String> {
    match value {
        Value::Object(object) => Layers {
            objects: vec![object],
        }
        .string(TITLE_KEYS),
        other => as_text(other),
    }
}

/// Extracts the record array from a list response.
///
/// Endpoints answer with a bare array, `{"data": [...]}` or
/// `{"data": {"data": [...]}}`. Any other shape yields no records.
pub fn unwrap_records(payload: &Value) -> &[Value] {
    let records = match payload {
        Value::Array(items) => Some(items.as_slice()),
        Value::Object(object) => match object.get("data") {
            Some(Value::Array(items)) => Some(items.as_slice()),
            Some(Value::Object(inner)) => inner
                .get("data")
                .and_then(Value::as_array)
                .map(Vec::as_slice),
            _ => None,
        },
        _ => None,
    };
    match records {
        Some(records) => records,
        None => {
            bo_warn!("List payload has no record array; treating it as empty");
            &[]
        }
    }
}

/// Normalizes a batch, dropping unusable records and repeated identifiers.
pub fn normalize_all(records: &[Value], kind: SourceKind) -> Vec<CanonicalItem> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut items = Vec::with_capacity(records.len());
    let mut dropped = 0usize;
    for (index, raw) in records.iter().enumerate() {
        let Some(item) = normalize(raw, kind) else {
            dropped += 1;
            bo_debug!("Dropping record #{} without usable id ({:?})", index, kind);
            continue;
        };
        if !seen.insert(item.id.clone()) {
            bo_warn!("Dropping duplicate record id={} at #{}", item.id, index);
            continue;
        }
        items.push(item);
    }
    if dropped > 0 {
        bo_warn!("Dropped {} of {} {:?} records", dropped, records.len(), kind);
    }
    items
}
