use garde::Validate;
use kernel::model::{
    id::VenueId,
    reservation::{ReservationStatus, ReservationStatusCount},
    venue::{Category, VenueStatus, VenueStatusCount},
};
use serde::{Deserialize, Serialize};
use shared::error::AppResult;
use std::collections::BTreeMap;
use strum::VariantArray;

use super::parse_place;

#[derive(Debug, Deserialize, Validate)]
pub struct ModerateVenueRequest {
    #[garde(required)]
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[garde(required)]
    pub category: Option<String>,
}

impl ModerateVenueRequest {
    pub fn place(&self) -> AppResult<(VenueId, Category)> {
        parse_place(
            self.id.as_deref().unwrap_or_default(),
            self.category.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// カテゴリごとの掲載状態の件数と、予約状態ごとの件数
#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub venues: BTreeMap<&'static str, BTreeMap<&'static str, i64>>,
    pub reservations: BTreeMap<&'static str, i64>,
}

impl TotalsResponse {
    pub fn new(venues: Vec<VenueStatusCount>, reservations: Vec<ReservationStatusCount>) -> Self {
        // 件数ゼロの組み合わせも 0 として返す
        let mut venue_totals: BTreeMap<&'static str, BTreeMap<&'static str, i64>> = Category::VARIANTS
            .iter()
            .map(|c| {
                let statuses = VenueStatus::VARIANTS.iter().map(|s| (s.as_str(), 0)).collect();
                (c.as_str(), statuses)
            })
            .collect();
        for count in venues {
            if let Some(statuses) = venue_totals.get_mut(count.category.as_str()) {
                statuses.insert(count.status.as_str(), count.total);
            }
        }

        let mut reservation_totals: BTreeMap<&'static str, i64> = ReservationStatus::VARIANTS
            .iter()
            .map(|s| (s.as_str(), 0))
            .collect();
        for count in reservations {
            reservation_totals.insert(count.status.as_str(), count.total);
        }

        Self {
            venues: venue_totals,
            reservations: reservation_totals,
        }
    }
}
