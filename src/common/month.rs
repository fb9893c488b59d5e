// src/common/month.rs

use chrono::{Datelike, NaiveDate};

use crate::common::error::AppError;

// Chave de mês no formato "YYYY-MM".
// Zero à esquerda garante que as chaves ordenam lexicograficamente
// na mesma ordem do calendário — comparações de string bastam.

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

// Valida uma chave vinda de fora (query string, payload).
// Aceita apenas "YYYY-MM" com mês entre 01 e 12.
pub fn validate_month_key(key: &str) -> Result<(), AppError> {
    let invalid = || AppError::InvalidMonthKey(key.to_string());

    let (year, month) = key.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    match month.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => Ok(()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert_eq!(month_key(date), "2026-03");
    }

    #[test]
    fn month_keys_order_like_the_calendar() {
        let before = month_key(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        let after = month_key(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert!(before < after);
    }

    #[test]
    fn validate_accepts_well_formed_keys() {
        assert!(validate_month_key("2026-01").is_ok());
        assert!(validate_month_key("1999-12").is_ok());
    }

    #[test]
    fn validate_rejects_malformed_keys() {
        for key in ["2026-13", "2026-00", "2026-1", "26-01", "2026/01", "abcd-ef", ""] {
            assert!(validate_month_key(key).is_err(), "aceitou {key:?}");
        }
    }
}
