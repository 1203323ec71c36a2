use kernel::model::{
    id::{UserId, VenueId},
    venue::{Staffing, Venue, VenueStatusCount},
};
use super::parse_column;
use shared::error::AppError;
use sqlx::{
    types::chrono::{DateTime, Utc},
    FromRow,
};
use uuid::Uuid;

#[derive(FromRow)]
pub struct VenueRow {
    pub venue_id: VenueId,
    pub category: String,
    pub venue_name: String,
    pub manager_id: UserId,
    pub supervisor_ids: Option<Vec<Uuid>>,
    pub employee_ids: Option<Vec<Uuid>>,
    pub is_sub_venue: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<VenueRow> for Venue {
    type Error = AppError;

    fn try_from(value: VenueRow) -> Result<Self, Self::Error> {
        let VenueRow {
            venue_id,
            category,
            venue_name,
            manager_id,
            supervisor_ids,
            employee_ids,
            is_sub_venue,
            status,
            created_at,
        } = value;
        // 両方 NULL のときだけ「担当者情報なし」とみなす
        let staffing = match (supervisor_ids, employee_ids) {
            (None, None) => None,
            (supervisors, employees) => Some(Staffing {
                supervisors: into_user_ids(supervisors),
                employees: into_user_ids(employees),
            }),
        };
        Ok(Venue {
            venue_id,
            category: parse_column("category", &category)?,
            venue_name,
            manager_id,
            staffing,
            is_sub_venue,
            status: parse_column("status", &status)?,
            created_at,
        })
    }
}

fn into_user_ids(ids: Option<Vec<Uuid>>) -> Vec<UserId> {
    ids.unwrap_or_default().into_iter().map(UserId::from).collect()
}

pub fn into_raw_ids(ids: &[UserId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.raw()).collect()
}

#[derive(FromRow)]
pub struct VenueStatusCountRow {
    pub category: String,
    pub status: String,
    pub total: i64,
}

impl TryFrom<VenueStatusCountRow> for VenueStatusCount {
    type Error = AppError;

    fn try_from(value: VenueStatusCountRow) -> Result<Self, Self::Error> {
        Ok(VenueStatusCount {
            category: parse_column("category", &value.category)?,
            status: parse_column("status", &value.status)?,
            total: value.total,
        })
    }
}
