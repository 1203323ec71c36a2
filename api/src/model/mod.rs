pub mod admin;
pub mod reservation;
pub mod venue;

use kernel::model::{id::VenueId, venue::Category};
use shared::error::AppResult;

// 旧 API と同じく ID と category を文字列で受け取り、ここで型に変換する
pub(crate) fn parse_place(id: &str, category: &str) -> AppResult<(VenueId, Category)> {
    Ok((id.parse()?, category.parse()?))
}
