// src/core/patterns.rs
//
// Textual conventions of the exported grid. Keep them stable.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::consts::{DAY_NAMES, FIRST_SHIFT_MARKERS, SECOND_SHIFT_MARKERS, TABLE_START_TOKENS};
use crate::model::{Day, Shift};
use super::normalize::normalize;

static CLASS_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\d+\s*[A-ZА-ЯЁ](\s*[A-ZА-ЯЁ])?$").unwrap()
});

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2}[.:]\d{2}\s*[–-]\s*\d{1,2}[.:]\d{2}").unwrap()
});

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+").unwrap());

/// Digits followed by one or two letters, e.g. `5А`, `10 б`, `11АБ`.
pub fn is_class_label(cell: &str) -> bool {
    CLASS_LABEL.is_match(cell.trim())
}

/// Grade number of a class label, used for ordering class lists.
pub fn grade_of(label: &str) -> Option<u32> {
    LEADING_NUMBER.find(label.trim()).and_then(|m| m.as_str().parse().ok())
}

/// The first `HH.MM–HH.MM` style range inside `cell`.
pub fn find_duration(cell: &str) -> Option<&str> {
    DURATION.find(cell).map(|m| m.as_str())
}

/// Day announced by a banner cell: `ПОНЕДЕЛЬНИК`, `Вторник 2 смена`,
/// `РАСПИСАНИЕ НА ПЯТНИЦУ` style text. The day must open the cell or follow
/// `НА`, so subjects like `Окружающая среда` are not banners.
pub fn day_in(text: &str) -> Option<Day> {
    let norm = normalize(text);
    let words: Vec<&str> = norm
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    words.iter().enumerate().find_map(|(i, word)| {
        if i > 0 && words[i - 1] != "НА" {
            return None;
        }
        DAY_NAMES
            .iter()
            .position(|names| names.contains(word))
            .and_then(Day::from_index)
    })
}

pub fn has_table_token(text: &str) -> bool {
    let norm = normalize(text);
    TABLE_START_TOKENS.iter().any(|t| norm.contains(t))
}

/// Shift announced by a banner, if any.
pub fn shift_marker(text: &str) -> Option<Shift> {
    let norm = normalize(text);
    if SECOND_SHIFT_MARKERS.iter().any(|m| norm.contains(m)) {
        Some(Shift::Second)
    } else if FIRST_SHIFT_MARKERS.iter().any(|m| norm.contains(m)) {
        Some(Shift::First)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_labels() {
        for ok in ["5А", "5а", "10 Б", "11АБ", "7 a", "9 A B"] {
            assert!(is_class_label(ok), "{ok}");
        }
        for bad in ["101", "А5", "5АБВ", "Время", "", "5-А", "8.00–8.45"] {
            assert!(!is_class_label(bad), "{bad}");
        }
    }

    #[test]
    fn durations() {
        assert_eq!(find_duration("8.00–8.45"), Some("8.00–8.45"));
        assert_eq!(find_duration("1 урок 13:05 - 13:50"), Some("13:05 - 13:50"));
        assert_eq!(find_duration("Время"), None);
        assert_eq!(find_duration("8.00"), None);
    }

    #[test]
    fn day_names_match_whole_words_only() {
        assert_eq!(day_in("РАСПИСАНИЕ НА ПОНЕДЕЛЬНИК"), Some(Day::Mon));
        assert_eq!(day_in("  среда  "), Some(Day::Wed));
        assert_eq!(day_in("Saturday"), Some(Day::Sat));
        assert_eq!(day_in("Расписание на пятницу"), Some(Day::Fri));
        assert_eq!(day_in("Вторник 2 смена"), Some(Day::Tue));
        assert_eq!(day_in("Окружающая среда"), None);
        assert_eq!(day_in("Средаведение"), None);
        assert_eq!(day_in(""), None);
    }

    #[test]
    fn shift_markers() {
        assert_eq!(shift_marker("2 смена"), Some(Shift::Second));
        assert_eq!(shift_marker("ВТОРАЯ  СМЕНА"), Some(Shift::Second));
        assert_eq!(shift_marker("1 смена"), Some(Shift::First));
        assert_eq!(shift_marker("смена"), None);
    }

    #[test]
    fn grades() {
        assert_eq!(grade_of("10Б"), Some(10));
        assert_eq!(grade_of("Б"), None);
    }
}
