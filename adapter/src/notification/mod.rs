pub mod gmail;
pub mod log;

use chrono::{NaiveDate, NaiveTime};
use kernel::model::{reservation::Reservation, user::User, venue::Venue};

pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Mail {
    pub fn acceptance(customer: &User, reservation: &Reservation, venue: &Venue) -> Self {
        Self {
            to: customer.email.clone(),
            subject: format!("Your reservation at {} is confirmed", venue.venue_name),
            body: format!(
                "Hello {},\n\nYour reservation at {} has been accepted.\n\
                 Reservation ID: {}\nDate: {}\nTime: {}\nParty size: {}\n",
                customer.user_name,
                venue.venue_name,
                reservation.reservation_id,
                format_date(reservation.date),
                format_time(reservation.time),
                reservation.party_size,
            ),
        }
    }

    pub fn rejection(customer: &User) -> Self {
        Self {
            to: customer.email.clone(),
            subject: "Your reservation could not be accepted".into(),
            body: format!(
                "Hello {},\n\nUnfortunately your reservation request was declined. \
                 Please try another date or venue.\n",
                customer.user_name
            ),
        }
    }

    // RFC 5322 形式のメッセージ。ヘッダー値の改行は取り除く
    pub fn to_rfc5322(&self) -> String {
        format!(
            "To: {}\r\nSubject: {}\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\n{}",
            header_value(&self.to),
            header_value(&self.subject),
            self.body
        )
    }
}

fn header_value(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kernel::model::{
        id::{ReservationId, UserId, VenueId},
        reservation::ReservationStatus,
        role::Role,
        venue::{Category, VenueStatus},
    };

    #[test]
    fn acceptance_mail_carries_booking_details() {
        let customer = User {
            user_id: UserId::new(),
            user_name: "Aiko".into(),
            email: "aiko@example.com".into(),
            role: Role::User,
            is_banned: false,
        };
        let venue = Venue {
            venue_id: VenueId::new(),
            category: Category::Restaurant,
            venue_name: "Sakura Dining".into(),
            manager_id: UserId::new(),
            staffing: None,
            is_sub_venue: false,
            status: VenueStatus::Approved,
            created_at: Utc::now(),
        };
        let reservation = Reservation {
            reservation_id: ReservationId::new(),
            venue_id: venue.venue_id,
            category: Category::Restaurant,
            customer_id: customer.user_id,
            status: ReservationStatus::Accepted,
            date: NaiveDate::from_ymd_opt(2025, 9, 14).unwrap(),
            time: NaiveTime::from_hms_opt(18, 45, 0).unwrap(),
            party_size: 3,
            created_at: Utc::now(),
        };

        let mail = Mail::acceptance(&customer, &reservation, &venue);
        assert_eq!(mail.to, "aiko@example.com");
        assert!(mail.body.contains("Sakura Dining"));
        assert!(mail.body.contains(&reservation.reservation_id.to_string()));
        assert!(mail.body.contains("2025-09-14"));
        assert!(mail.body.contains("18:45"));
        assert!(mail.body.contains("Party size: 3"));
        assert!(mail.to_rfc5322().starts_with("To: aiko@example.com\r\n"));
    }

    #[test]
    fn header_values_cannot_add_headers() {
        let mail = Mail {
            to: "aiko@example.com\r\nBcc: leak@example.com".into(),
            subject: "Your reservation at Bar\r\nBcc: leak@example.com is confirmed".into(),
            body: "line one\r\nline two".into(),
        };
        let raw = mail.to_rfc5322();
        let (headers, body) = raw.split_once("\r\n\r\n").unwrap();
        assert_eq!(headers.lines().count(), 3);
        assert!(!headers.lines().any(|l| l.starts_with("Bcc:")));
        assert_eq!(body, "line one\r\nline two");
    }
}
