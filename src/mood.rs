use std::fmt;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// The five moods an entry can carry, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mood {
    Rad,
    Good,
    Meh,
    Bad,
    Awful,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Rad, Mood::Good, Mood::Meh, Mood::Bad, Mood::Awful];

    /// Identifier as stored and as sent to the insight service.
    pub fn id(self) -> &'static str {
        match self {
            Mood::Rad => "RAD",
            Mood::Good => "GOOD",
            Mood::Meh => "MEH",
            Mood::Bad => "BAD",
            Mood::Awful => "AWFUL",
        }
    }

    pub fn config(self) -> &'static MoodConfig {
        metadata_for(self)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Display metadata for a mood.
#[derive(Debug, PartialEq, Eq)]
pub struct MoodConfig {
    pub mood: Mood,
    pub label: &'static str,
    pub emoji: &'static str,
    pub color: Color,
    pub bg_color: Color,
}

static RAD: MoodConfig = MoodConfig {
    mood: Mood::Rad,
    label: "Rad",
    emoji: "🤩",
    color: Color::Rgb(0x8b, 0x5c, 0xf6),
    bg_color: Color::Rgb(0xf5, 0xf3, 0xff),
};

static GOOD: MoodConfig = MoodConfig {
    mood: Mood::Good,
    label: "Good",
    emoji: "😊",
    color: Color::Rgb(0x10, 0xb9, 0x81),
    bg_color: Color::Rgb(0xec, 0xfd, 0xf5),
};

static MEH: MoodConfig = MoodConfig {
    mood: Mood::Meh,
    label: "Meh",
    emoji: "😐",
    color: Color::Rgb(0xf5, 0x9e, 0x0b),
    bg_color: Color::Rgb(0xff, 0xfb, 0xeb),
};

static BAD: MoodConfig = MoodConfig {
    mood: Mood::Bad,
    label: "Bad",
    emoji: "😔",
    color: Color::Rgb(0xf9, 0x73, 0x16),
    bg_color: Color::Rgb(0xff, 0xf7, 0xed),
};

static AWFUL: MoodConfig = MoodConfig {
    mood: Mood::Awful,
    label: "Awful",
    emoji: "😫",
    color: Color::Rgb(0xef, 0x44, 0x44),
    bg_color: Color::Rgb(0xfe, 0xf2, 0xf2),
};

pub fn metadata_for(mood: Mood) -> &'static MoodConfig {
    match mood {
        Mood::Rad => &RAD,
        Mood::Good => &GOOD,
        Mood::Meh => &MEH,
        Mood::Bad => &BAD,
        Mood::Awful => &AWFUL,
    }
}
