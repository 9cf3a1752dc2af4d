use chrono::{NaiveDateTime, Timelike};

pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        4..=11 => "Доброе утро",
        12..=16 => "Добрый день",
        17..=21 => "Добрый вечер",
        _ => "Доброй ночи",
    }
}

pub fn greeting_at(instant: &NaiveDateTime) -> &'static str {
    greeting_for_hour(instant.hour())
}
