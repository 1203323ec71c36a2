pub mod reservation;
pub mod user;
pub mod venue;

use shared::error::AppError;
use std::{fmt::Display, str::FromStr};

// DB に想定外の値が入っているのはリクエストの誤りではないので 500 扱い
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| AppError::ConversionEntityError(format!("{column} = {value:?}: {e}")))
}
