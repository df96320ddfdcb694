//! Utilitários de data e competência
//!
//! Datas circulam como strings ISO (`YYYY-MM-DD`) e competências como
//! `YYYY-MM`. Strings ISO ordenam lexicograficamente igual à ordem
//! cronológica, então os ranges de consulta usam comparação direta.

use chrono::{Datelike, NaiveDate, Weekday};

/// Interpreta uma competência `YYYY-MM`
pub fn parse_month(s: &str) -> Option<(i32, u32)> {
    let (y, m) = s.split_once('-')?;
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

/// Interpreta uma data ISO `YYYY-MM-DD`
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Primeiro dia da competência e primeiro dia da competência seguinte
///
/// O intervalo resultante é semiaberto: `[first, next_first)`
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let next_first = NaiveDate::from_ymd_opt(ny, nm, 1)?;
    Some((first, next_first))
}

/// Quantidade de dias da competência
pub fn days_in_month(year: i32, month: u32) -> u32 {
    month_bounds(year, month)
        .map(|(first, next)| (next - first).num_days() as u32)
        .unwrap_or(0)
}

/// Competência anterior
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// Todos os dias da competência, em ordem
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    match month_bounds(year, month) {
        Some((first, next)) => first.iter_days().take_while(|d| *d < next).collect(),
        None => Vec::new(),
    }
}

/// Sábado ou domingo
///
/// Fins de semana são apenas destaque visual na grade, sem diferença
/// de comportamento.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-03"), Some((2025, 3)));
        assert_eq!(parse_month("2025-13"), None);
        assert_eq!(parse_month("banana"), None);
    }

    #[test]
    fn test_month_bounds() {
        let (first, next) = month_bounds(2025, 2).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(next, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());

        let (first, next) = month_bounds(2025, 12).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(next, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29); // bissexto
        assert_eq!(days_in_month(2025, 4), 30);
    }

    #[test]
    fn test_previous_month() {
        assert_eq!(previous_month(2025, 1), (2024, 12));
        assert_eq!(previous_month(2025, 6), (2025, 5));
    }

    #[test]
    fn test_month_days_count_matches() {
        assert_eq!(month_days(2025, 2).len(), 28);
        assert_eq!(month_days(2024, 2).len(), 29);
    }

    #[test]
    fn test_is_weekend() {
        // 2025-08-02 é sábado
        assert!(is_weekend(NaiveDate::from_ymd_opt(2025, 8, 2).unwrap()));
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2025, 8, 4).unwrap()));
    }
}
