use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::journal_entry::JournalEntry;
use crate::mood::Mood;

/// Number of entries per mood over the whole collection, in registry order.
pub fn mood_counts(entries: &[JournalEntry]) -> Vec<(Mood, usize)> {
    Mood::ALL
        .iter()
        .map(|&mood| (mood, entries.iter().filter(|e| e.mood == mood).count()))
        .collect()
}

/// Mood of the most recent entry for each local day of the given month.
pub fn month_moods(entries: &[JournalEntry], year: i32, month: u32) -> BTreeMap<u32, Mood> {
    let mut days = BTreeMap::new();
    // Entries are newest first, so the first hit for a day wins.
    for entry in entries {
        let date = entry.local_date();
        if date.year() == year && date.month() == month {
            days.entry(date.day()).or_insert(entry.mood);
        }
    }
    days
}

/// Calendar rows for a month: each row is Monday..Sunday, `None` outside the month.
pub fn month_grid(year: i32, month: u32) -> Vec<[Option<u32>; 7]> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let days_in_month = days_in_month(year, month);
    let offset = first.weekday().num_days_from_monday() as usize;

    let mut rows = Vec::new();
    let mut row = [None; 7];
    let mut col = offset;
    for day in 1..=days_in_month {
        row[col] = Some(day);
        col += 1;
        if col == 7 {
            rows.push(row);
            row = [None; 7];
            col = 0;
        }
    }
    if col > 0 {
        rows.push(row);
    }
    rows
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(0, |d| d.day())
}
