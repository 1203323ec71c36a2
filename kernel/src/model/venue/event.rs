use crate::model::{
    id::{UserId, VenueId},
    venue::{Category, Staffing, VenueStatus},
};

#[derive(Debug)]
pub struct CreateVenue {
    pub category: Category,
    pub venue_name: String,
    pub manager_id: UserId,
    pub staffing: Option<Staffing>,
    pub is_sub_venue: bool,
}

#[derive(Debug)]
pub struct UpdateStaffing {
    pub venue_id: VenueId,
    pub category: Category,
    pub staffing: Staffing,
}

#[derive(Debug)]
pub struct UpdateVenueStatus {
    pub venue_id: VenueId,
    pub category: Category,
    pub status: VenueStatus,
}
