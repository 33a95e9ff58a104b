//! Release package models
//!
//! Typed view over the subset of an open-contracting release that the
//! `tenders` table needs. Every field is optional and decoding is lenient:
//! the feed is not validated against the data standard. A field with an
//! unexpected type falls back to its own default without disturbing its
//! siblings.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One page of the release feed
#[derive(Debug, Clone, Default)]
pub struct ReleasePackage {
    /// Releases in feed order
    pub releases: Vec<Release>,

    /// Link to the next page, `None` when the feed is exhausted
    pub next_page: Option<String>,
}

impl ReleasePackage {
    /// Decode a page body
    ///
    /// A missing `releases` array is an empty page and a missing
    /// `links.next` ends pagination. Releases are decoded one at a time so a
    /// single oddly shaped record cannot fail the page.
    pub fn from_value(body: Value) -> Result<Self, serde_json::Error> {
        let wire: WirePackage = serde_json::from_value(body)?;

        let releases = wire
            .releases
            .unwrap_or_default()
            .into_iter()
            .map(Release::from_value)
            .collect();

        let next_page = wire
            .links
            .and_then(|links| links.next)
            .filter(|next| !next.trim().is_empty());

        Ok(Self {
            releases,
            next_page,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WirePackage {
    #[serde(default)]
    releases: Option<Vec<Value>>,
    #[serde(default)]
    links: Option<WireLinks>,
}

#[derive(Debug, Deserialize)]
struct WireLinks {
    #[serde(default)]
    next: Option<String>,
}

/// One version of a procurement notice
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// Contract process identifier shared by all versions
    #[serde(default, deserialize_with = "lenient")]
    pub ocid: String,

    /// Release identifier
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    /// Release date (RFC 3339)
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,

    /// Lifecycle tags, e.g. `["tender", "tenderUpdate"]`
    #[serde(default, deserialize_with = "string_list")]
    pub tag: Vec<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub tender: Option<Tender>,

    #[serde(default, deserialize_with = "lenient")]
    pub buyer: Option<Organization>,

    /// The release exactly as received
    #[serde(skip)]
    pub raw: Value,
}

impl Release {
    /// Decode one release, keeping the original JSON
    ///
    /// Mistyped fields are dropped one by one. A release that is not a JSON
    /// object at all degrades to its raw payload instead of failing.
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<Release>(value.clone()) {
            Ok(mut release) => {
                release.raw = value;
                release
            }
            Err(e) => {
                let ocid = value
                    .get("ocid")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                tracing::warn!(
                    ocid = %ocid,
                    error = %e,
                    "Release is not an object, keeping raw payload only"
                );
                Release {
                    ocid,
                    raw: value,
                    ..Default::default()
                }
            }
        }
    }
}

/// Tender section of a release
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<MonetaryValue>,
    #[serde(default, deserialize_with = "lenient")]
    pub min_value: Option<MonetaryValue>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_value: Option<MonetaryValue>,
    #[serde(default, deserialize_with = "lenient")]
    pub tender_period: Option<Period>,
    #[serde(default, deserialize_with = "lenient")]
    pub contract_period: Option<Period>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub items: Vec<Item>,
}

/// Amount with optional currency
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonetaryValue {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub currency: Option<String>,
}

/// Start/end dates (RFC 3339)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(default, deserialize_with = "lenient")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub end_date: Option<String>,
}

/// Tender line item
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, deserialize_with = "lenient")]
    pub classification: Option<Classification>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub delivery_addresses: Vec<Address>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Classification {
    #[serde(default, deserialize_with = "lenient")]
    pub scheme: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, deserialize_with = "lenient")]
    pub region: Option<String>,
}

/// Buyer organization reference
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Organization {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// Decode a field, falling back to its default on a type mismatch
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a list element by element, dropping elements that do not fit
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Accept amounts sent as numbers or numeric strings
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accept identifiers sent as strings or numbers
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// `tag` is an array in OCDS but some publishers send a bare string
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(values)) => values
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => vec![s],
        _ => Vec::new(),
    })
}
