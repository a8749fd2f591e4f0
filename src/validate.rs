//! Format checks for operator input. None of these touch the database.

use rust_decimal::Decimal;
use std::str::FromStr;

pub const MAX_LOGIN_LEN: usize = 50;
pub const MAX_PASSWORD_LEN: usize = 30;
pub const PHONE_COUNTRY_CODE: &str = "+1-";

/// Most copies of one game a single order line may hold.
pub const MAX_COPIES_PER_GAME: i32 = 999;

/// Largest price `catalog.price NUMERIC(10, 2)` can store.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Column widths of the free-text fields operators type in.
pub const MAX_GAME_NAME_LEN: usize = 100;
pub const MAX_GENRE_LEN: usize = 50;
pub const MAX_STATUS_LEN: usize = 50;
pub const MAX_LOCATION_LEN: usize = 60;
pub const MAX_COURIER_LEN: usize = 60;

const GAME_ID_PREFIX: &str = "game";
const GAME_ID_LEN: usize = 8;

pub fn is_valid_login(login: &str) -> bool {
    !login.is_empty() && login.chars().count() <= MAX_LOGIN_LEN
}

pub fn is_valid_password(password: &str) -> bool {
    !password.is_empty() && password.chars().count() <= MAX_PASSWORD_LEN
}

/// Accepts the `DDD-DDD-DDDD` form typed by the operator.
pub fn is_valid_phone(phone: &str) -> bool {
    let bytes = phone.as_bytes();
    bytes.len() == 12
        && bytes.iter().enumerate().all(|(i, b)| match i {
            3 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Stored phone number for a validated `DDD-DDD-DDDD` entry.
pub fn full_phone_number(phone: &str) -> String {
    format!("{PHONE_COUNTRY_CODE}{phone}")
}

pub fn is_valid_game_id(game_id: &str) -> bool {
    game_id.len() == GAME_ID_LEN
        && game_id
            .strip_prefix(GAME_ID_PREFIX)
            .is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Positive whole number typed as plain decimal digits.
///
/// Signs, whitespace, and zero are rejected, as is anything that does not
/// fit in an `i32`.
pub fn parse_positive(input: &str) -> Option<i32> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse::<i32>().ok().filter(|n| *n > 0)
}

/// Copies of one game in an order: positive and at most
/// `MAX_COPIES_PER_GAME`.
pub fn parse_quantity(input: &str) -> Option<i32> {
    parse_positive(input).filter(|n| *n <= MAX_COPIES_PER_GAME)
}

/// Non-negative whole number, used for overdue counts.
pub fn parse_count(input: &str) -> Option<i32> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse::<i32>().ok()
}

/// Non-negative amount with at most two fractional digits, no larger than
/// `MAX_PRICE`.
pub fn parse_price(input: &str) -> Option<Decimal> {
    let price = Decimal::from_str(input.trim()).ok()?;
    (price >= Decimal::ZERO && price <= MAX_PRICE && price.scale() <= 2).then_some(price)
}

/// Non-empty text of at most `max_len` characters.
pub fn bounded_text(input: &str, max_len: usize) -> Option<String> {
    (!input.is_empty() && input.chars().count() <= max_len).then(|| input.to_string())
}

/// Optional field edit: blank keeps the stored value (`Some(None)`), text
/// within `max_len` replaces it, and longer text is rejected (`None`).
pub fn optional_text(input: &str, max_len: usize) -> Option<Option<String>> {
    if input.is_empty() {
        return Some(None);
    }
    bounded_text(input, max_len).map(Some)
}

/// `Some(true)` for yes, `Some(false)` for no, `None` for anything else.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
