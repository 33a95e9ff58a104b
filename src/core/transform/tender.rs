//! Release to tender row mapping

use super::slug::slugify;
use super::stage::derive_stage;
use crate::config::TenderflowConfig;
use crate::domain::release::{MonetaryValue, Period, Release, Tender};
use crate::domain::TenderRow;
use chrono::{DateTime, Utc};

/// Settings the mapping needs from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Currency assumed for values without one
    pub reporting_currency: String,

    /// Title used when the release has none
    pub placeholder_title: String,
}

impl TransformOptions {
    pub fn from_config(config: &TenderflowConfig) -> Self {
        Self {
            reporting_currency: config.feed.reporting_currency.clone(),
            placeholder_title: config.sync.placeholder_title.clone(),
        }
    }
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            reporting_currency: "GBP".to_string(),
            placeholder_title: "Untitled tender".to_string(),
        }
    }
}

/// Map one release to a tender row
///
/// Pure and infallible: missing or malformed optional fields become `None`
/// (or the configured defaults) and the whole release is kept as
/// `raw_payload`. `synced_at` and `updated_at` are both set to `now`.
pub fn transform_release(
    release: &Release,
    options: &TransformOptions,
    now: DateTime<Utc>,
) -> TenderRow {
    let tender = release.tender.as_ref();

    let title = tender
        .and_then(|t| non_blank(t.title.as_deref()))
        .unwrap_or(&options.placeholder_title)
        .to_string();

    let value = tender.and_then(|t| t.value.as_ref());
    let value_amount = amount(value);
    let value_min = amount(tender.and_then(|t| t.min_value.as_ref()));
    // Range notices carry min in minValue and max in value
    let value_max = amount(tender.and_then(|t| t.max_value.as_ref()))
        .or_else(|| value_min.and(value_amount));

    let value_currency = [value, tender.and_then(|t| t.max_value.as_ref())]
        .into_iter()
        .flatten()
        .find_map(|v| non_blank(v.currency.as_deref()))
        .unwrap_or(&options.reporting_currency)
        .to_string();

    let buyer = release.buyer.as_ref();

    TenderRow {
        ocid: release.ocid.clone(),
        release_id: release.id.clone(),
        slug: slugify(&title, &release.ocid),
        title,
        description: tender.and_then(|t| t.description.clone()),
        status: tender.and_then(|t| t.status.clone()),
        stage: derive_stage(&release.tag),
        buyer_name: buyer.and_then(|b| b.name.clone()),
        buyer_id: buyer.and_then(|b| b.id.clone()),
        value_amount,
        value_currency,
        value_min,
        value_max,
        published_at: parse_date(release.date.as_deref()),
        tender_start: period_start(tender.and_then(|t| t.tender_period.as_ref())),
        tender_end: period_end(tender.and_then(|t| t.tender_period.as_ref())),
        contract_start: period_start(tender.and_then(|t| t.contract_period.as_ref())),
        contract_end: period_end(tender.and_then(|t| t.contract_period.as_ref())),
        cpv_codes: tender.map(cpv_codes).unwrap_or_default(),
        region: tender.and_then(first_region),
        raw_payload: release.raw.clone(),
        synced_at: now,
        updated_at: now,
    }
}

/// Classification ids of items whose scheme is CPV, in item order
pub fn cpv_codes(tender: &Tender) -> Vec<String> {
    tender
        .items
        .iter()
        .filter_map(|item| item.classification.as_ref())
        .filter(|c| c.scheme.as_deref() == Some("CPV"))
        .filter_map(|c| c.id.clone())
        .collect()
}

/// Region of the first delivery address listed
pub fn first_region(tender: &Tender) -> Option<String> {
    tender
        .items
        .iter()
        .flat_map(|item| item.delivery_addresses.iter())
        .next()
        .and_then(|address| address.region.clone())
}

fn amount(value: Option<&MonetaryValue>) -> Option<f64> {
    value.and_then(|v| v.amount).filter(|a| a.is_finite())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
        .map(|d| d.with_timezone(&Utc))
}

fn period_start(period: Option<&Period>) -> Option<DateTime<Utc>> {
    parse_date(period.and_then(|p| p.start_date.as_deref()))
}

fn period_end(period: Option<&Period>) -> Option<DateTime<Utc>> {
    parse_date(period.and_then(|p| p.end_date.as_deref()))
}
