use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{UserId, VenueId},
    venue::{event::CreateVenue, Category, Staffing, Venue, VenueStatus},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenueRequest {
    // 会場名はメールの件名に入るので改行を含めさせない
    #[garde(length(min = 1), pattern(r"^[^\r\n]+$"))]
    pub name: String,
    #[garde(skip)]
    pub category: Category,
    #[garde(skip)]
    #[serde(default)]
    pub supervisors: Vec<UserId>,
    #[garde(skip)]
    #[serde(default)]
    pub employees: Vec<UserId>,
    #[garde(skip)]
    #[serde(default)]
    pub is_sub_venue: bool,
}

impl CreateVenueRequest {
    // 新規登録は常に担当者情報を持つ（空でもよい）
    pub fn into_event(self, manager_id: UserId) -> CreateVenue {
        let CreateVenueRequest {
            name,
            category,
            supervisors,
            employees,
            is_sub_venue,
        } = self;
        CreateVenue {
            category,
            venue_name: name,
            manager_id,
            staffing: Some(Staffing {
                supervisors,
                employees,
            }),
            is_sub_venue,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaffRequest {
    #[serde(default)]
    pub supervisors: Vec<UserId>,
    #[serde(default)]
    pub employees: Vec<UserId>,
}

impl From<UpdateStaffRequest> for Staffing {
    fn from(value: UpdateStaffRequest) -> Self {
        Staffing {
            supervisors: value.supervisors,
            employees: value.employees,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueResponse {
    #[serde(rename = "ID")]
    pub venue_id: VenueId,
    pub category: Category,
    pub name: String,
    #[serde(rename = "managerID")]
    pub manager_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisors: Option<Vec<UserId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<Vec<UserId>>,
    pub is_sub_venue: bool,
    pub status: VenueStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Venue> for VenueResponse {
    fn from(value: Venue) -> Self {
        let Venue {
            venue_id,
            category,
            venue_name,
            manager_id,
            staffing,
            is_sub_venue,
            status,
            created_at,
        } = value;
        let (supervisors, employees) = match staffing {
            Some(s) => (Some(s.supervisors), Some(s.employees)),
            None => (None, None),
        };
        Self {
            venue_id,
            category,
            name: venue_name,
            manager_id,
            supervisors,
            employees,
            is_sub_venue,
            status,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenuesResponse {
    pub items: Vec<VenueResponse>,
}

impl From<Vec<Venue>> for VenuesResponse {
    fn from(value: Vec<Venue>) -> Self {
        Self {
            items: value.into_iter().map(VenueResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedVenueResponse {
    #[serde(rename = "ID")]
    pub venue_id: VenueId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(name: &str) -> CreateVenueRequest {
        serde_json::from_value(json!({ "name": name, "category": "bar" })).unwrap()
    }

    #[test]
    fn venue_name_must_be_a_single_line() {
        assert!(request("Blue Note").validate(&()).is_ok());
        assert!(request("Blue Note\r\nBcc: all@example.com")
            .validate(&())
            .is_err());
        assert!(request("Blue\nNote").validate(&()).is_err());
        assert!(request("").validate(&()).is_err());
    }
}
