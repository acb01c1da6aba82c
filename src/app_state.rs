//! In-memory application state and the transitions between screens.
//!
//! Every change goes through [`AppState::dispatch`]. The reducer never
//! touches storage or the network; it returns an [`Effect`] that the
//! controller carries out.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::insight::{AiInsight, CONTEXT_ENTRIES, MIN_ENTRIES_FOR_INSIGHT};
use crate::journal_entry::JournalEntry;
use crate::mood::Mood;
use crate::photo::expand_home;
use crate::stats;

pub const MIN_PASSWORD_LEN: usize = 4;
pub const UNLOCK_ERROR_DURATION: Duration = Duration::from_secs(2);
pub const NOTICE_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseScreen {
    Feed,
    Calendar,
    Stats,
    NewEntry,
}

/// Full-screen layers that hide the base screen while active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Locked {
        attempt: String,
        error_since: Option<Instant>,
    },
    PasswordSetup {
        input: String,
    },
}

impl Overlay {
    fn locked() -> Self {
        Overlay::Locked {
            attempt: String::new(),
            error_since: None,
        }
    }

    fn password_setup() -> Self {
        Overlay::PasswordSetup {
            input: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Base(BaseScreen),
    Overlay(Overlay, BaseScreen),
}

impl Screen {
    pub fn base(&self) -> BaseScreen {
        match self {
            Screen::Base(base) | Screen::Overlay(_, base) => *base,
        }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        match self {
            Screen::Base(_) => None,
            Screen::Overlay(overlay, _) => Some(overlay),
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Screen::Overlay(Overlay::Locked { .. }, _))
    }
}

/// The entry being composed on the new-entry screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub mood: Option<Mood>,
    pub text: String,
    pub photo: Option<String>,
    pub tags: Vec<String>,
    pub tag_input: String,
    pub photo_input: String,
    /// Ticket of the photo load this draft is waiting for.
    pub pending_photo: Option<u64>,
}

impl Draft {
    pub fn can_save(&self) -> bool {
        self.mood.is_some() && !self.text.trim().is_empty()
    }

    /// Appends the trimmed tag input unless it is empty or already present.
    fn add_tag(&mut self) -> bool {
        let tag = self.tag_input.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        self.tag_input.clear();
        true
    }

    fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A short message shown under the current screen until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    shown_at: Instant,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Info,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    Idle,
    InFlight { ticket: u64 },
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(BaseScreen),
    Back,
    SelectMood(Mood),
    SetDraftText(String),
    SetTagInput(String),
    AddTag,
    RemoveTag(String),
    SetPhotoInput(String),
    AttachPhoto,
    PhotoLoaded {
        ticket: u64,
        result: Result<String, String>,
    },
    RemovePhoto,
    SaveEntry,
    SetSearchQuery(String),
    ToggleLock,
    OpenPasswordSetup,
    SetPasswordInput(String),
    SavePassword,
    CancelPasswordSetup,
    SetUnlockAttempt(String),
    SubmitUnlock,
    RequestInsight,
    InsightReady {
        ticket: u64,
        insight: Option<AiInsight>,
    },
    Tick(Instant),
}

/// Work the reducer asks the controller to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    PersistEntries,
    PersistPassword(String),
    Analyze {
        ticket: u64,
        entries: Vec<JournalEntry>,
    },
    LoadPhoto {
        ticket: u64,
        path: PathBuf,
    },
}

#[derive(Debug)]
pub struct AppState {
    entries: Vec<JournalEntry>,
    password: Option<String>,
    pub screen: Screen,
    pub search_query: String,
    pub draft: Draft,
    pub insight: Option<AiInsight>,
    pub analysis: AnalysisStatus,
    pub notice: Option<Notice>,
    next_ticket: u64,
}

impl AppState {
    /// Starts locked over the feed when a password is stored.
    pub fn new(entries: Vec<JournalEntry>, password: Option<String>) -> Self {
        let screen = if password.is_some() {
            Screen::Overlay(Overlay::locked(), BaseScreen::Feed)
        } else {
            Screen::Base(BaseScreen::Feed)
        };

        AppState {
            entries,
            password,
            screen,
            search_query: String::new(),
            draft: Draft::default(),
            insight: None,
            analysis: AnalysisStatus::Idle,
            notice: None,
            next_ticket: 1,
        }
    }

    /// Newest first.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn filtered_entries(&self) -> Vec<&JournalEntry> {
        let query = self.search_query.to_lowercase();
        self.entries.iter().filter(|e| e.matches(&query)).collect()
    }

    pub fn mood_counts(&self) -> Vec<(Mood, usize)> {
        stats::mood_counts(&self.entries)
    }

    pub fn unlock_error(&self) -> bool {
        matches!(
            self.screen,
            Screen::Overlay(
                Overlay::Locked {
                    error_since: Some(_),
                    ..
                },
                _
            )
        )
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.analysis, AnalysisStatus::InFlight { .. })
    }

    pub fn dispatch(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Tick(now) => {
                self.expire(now);
                None
            }
            Action::InsightReady { ticket, insight } => {
                self.finish_analysis(ticket, insight);
                None
            }
            Action::PhotoLoaded { ticket, result } => {
                self.finish_photo(ticket, result);
                None
            }
            action if self.screen.overlay().is_some() => self.dispatch_overlay(action),
            action => self.dispatch_base(action),
        }
    }

    fn dispatch_overlay(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::SetUnlockAttempt(text) => {
                if let Screen::Overlay(Overlay::Locked { attempt, .. }, _) = &mut self.screen {
                    *attempt = text;
                }
                None
            }
            Action::SubmitUnlock => {
                self.submit_unlock();
                None
            }
            Action::SetPasswordInput(text) => {
                if let Screen::Overlay(Overlay::PasswordSetup { input }, _) = &mut self.screen {
                    *input = text;
                }
                None
            }
            Action::SavePassword => self.save_password(),
            Action::CancelPasswordSetup => {
                if let Screen::Overlay(Overlay::PasswordSetup { .. }, base) = self.screen {
                    self.screen = Screen::Base(base);
                }
                None
            }
            _ => None,
        }
    }

    fn dispatch_base(&mut self, action: Action) -> Option<Effect> {
        let base = self.screen.base();
        let composing = base == BaseScreen::NewEntry;

        match action {
            Action::Navigate(target) => {
                debug!(?target, "navigate");
                self.screen = Screen::Base(target);
                None
            }
            Action::Back => {
                match base {
                    BaseScreen::NewEntry => {
                        self.draft = Draft::default();
                        self.screen = Screen::Base(BaseScreen::Feed);
                    }
                    BaseScreen::Calendar | BaseScreen::Stats => {
                        self.screen = Screen::Base(BaseScreen::Feed);
                    }
                    BaseScreen::Feed => {}
                }
                None
            }
            Action::SelectMood(mood) if composing => {
                self.draft.mood = Some(mood);
                None
            }
            Action::SetDraftText(text) if composing => {
                self.draft.text = text;
                None
            }
            Action::SetTagInput(text) if composing => {
                self.draft.tag_input = text;
                None
            }
            Action::AddTag if composing => {
                self.draft.add_tag();
                None
            }
            Action::RemoveTag(tag) if composing => {
                self.draft.remove_tag(&tag);
                None
            }
            Action::SetPhotoInput(text) if composing => {
                self.draft.photo_input = text;
                None
            }
            Action::AttachPhoto if composing => {
                let input = std::mem::take(&mut self.draft.photo_input);
                if input.trim().is_empty() {
                    return None;
                }
                let ticket = self.take_ticket();
                self.draft.pending_photo = Some(ticket);
                Some(Effect::LoadPhoto {
                    ticket,
                    path: expand_home(&input),
                })
            }
            Action::RemovePhoto if composing => {
                self.draft.photo = None;
                self.draft.pending_photo = None;
                None
            }
            Action::SaveEntry if composing => self.save_entry(),
            Action::SetSearchQuery(query) => {
                self.search_query = query;
                None
            }
            Action::ToggleLock => {
                if self.password.is_some() {
                    info!("journal locked");
                    self.screen = Screen::Overlay(Overlay::locked(), base);
                } else {
                    self.screen = Screen::Overlay(Overlay::password_setup(), base);
                }
                None
            }
            Action::OpenPasswordSetup => {
                self.screen = Screen::Overlay(Overlay::password_setup(), base);
                None
            }
            Action::RequestInsight => self.request_insight(),
            _ => None,
        }
    }

    fn save_entry(&mut self) -> Option<Effect> {
        if !self.draft.can_save() {
            return None;
        }
        let draft = std::mem::take(&mut self.draft);
        let mood = draft.mood?;
        let entry = JournalEntry::new(mood, draft.text, draft.photo, draft.tags);
        info!(id = %entry.id, mood = %entry.mood, "entry saved");

        self.entries.insert(0, entry);
        self.screen = Screen::Base(BaseScreen::Feed);
        Some(Effect::PersistEntries)
    }

    fn submit_unlock(&mut self) {
        let Screen::Overlay(Overlay::Locked { attempt, error_since }, _) = &mut self.screen else {
            return;
        };

        let matches = self
            .password
            .as_deref()
            .map_or(true, |password| password == attempt.as_str());

        if matches {
            info!("journal unlocked");
            self.screen = Screen::Base(BaseScreen::Feed);
        } else {
            warn!("incorrect password entered");
            attempt.clear();
            *error_since = Some(Instant::now());
        }
    }

    fn save_password(&mut self) -> Option<Effect> {
        let Screen::Overlay(Overlay::PasswordSetup { input }, base) = &mut self.screen else {
            return None;
        };

        if input.chars().count() < MIN_PASSWORD_LEN {
            self.notice = Some(Notice::error(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            )));
            return None;
        }

        let password = std::mem::take(input);
        self.screen = Screen::Base(*base);
        self.password = Some(password.clone());
        self.notice = Some(Notice::info("Password set successfully!"));
        info!("password set");
        Some(Effect::PersistPassword(password))
    }

    fn request_insight(&mut self) -> Option<Effect> {
        if self.is_analyzing() {
            debug!("insight already in flight, ignoring request");
            return None;
        }
        if self.entries.len() < MIN_ENTRIES_FOR_INSIGHT {
            self.notice = Some(Notice::info(format!(
                "Please create at least {MIN_ENTRIES_FOR_INSIGHT} entries to get meaningful AI insights."
            )));
            return None;
        }

        let ticket = self.take_ticket();
        self.analysis = AnalysisStatus::InFlight { ticket };
        Some(Effect::Analyze {
            ticket,
            entries: self.entries.iter().take(CONTEXT_ENTRIES).cloned().collect(),
        })
    }

    fn take_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    /// Only the draft that asked for the photo receives it.
    fn finish_photo(&mut self, ticket: u64, result: Result<String, String>) {
        if self.draft.pending_photo != Some(ticket) {
            debug!(ticket, "discarding stale photo result");
            return;
        }
        self.draft.pending_photo = None;
        match result {
            Ok(uri) => self.draft.photo = Some(uri),
            Err(message) => self.notice = Some(Notice::error(message)),
        }
    }

    fn finish_analysis(&mut self, ticket: u64, insight: Option<AiInsight>) {
        if self.analysis != (AnalysisStatus::InFlight { ticket }) {
            debug!(ticket, "discarding stale insight result");
            return;
        }
        self.analysis = if insight.is_some() {
            AnalysisStatus::Idle
        } else {
            AnalysisStatus::Failed
        };
        self.insight = insight;
    }

    fn expire(&mut self, now: Instant) {
        if let Screen::Overlay(Overlay::Locked { error_since, .. }, _) = &mut self.screen {
            if let Some(since) = *error_since {
                if now.duration_since(since) >= UNLOCK_ERROR_DURATION {
                    *error_since = None;
                }
            }
        }
        if self
            .notice
            .as_ref()
            .is_some_and(|n| now.duration_since(n.shown_at) >= NOTICE_DURATION)
        {
            self.notice = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compose(state: &mut AppState, mood: Option<Mood>, text: &str, tags: &[&str]) {
        state.dispatch(Action::Navigate(BaseScreen::NewEntry));
        if let Some(mood) = mood {
            state.dispatch(Action::SelectMood(mood));
        }
        state.dispatch(Action::SetDraftText(text.to_string()));
        for tag in tags {
            state.dispatch(Action::SetTagInput(tag.to_string()));
            state.dispatch(Action::AddTag);
        }
    }

    fn with_entries(moods: &[Mood]) -> AppState {
        let entries = moods
            .iter()
            .map(|&m| JournalEntry::new(m, "x".into(), None, vec![]))
            .collect();
        AppState::new(entries, None)
    }

    #[test]
    fn starts_on_feed_without_password() {
        let state = AppState::new(vec![], None);
        assert_eq!(state.screen, Screen::Base(BaseScreen::Feed));
    }

    #[test]
    fn starts_locked_with_password() {
        let state = AppState::new(vec![], Some("abcd".into()));
        assert!(state.screen.is_locked());
        assert_eq!(state.screen.base(), BaseScreen::Feed);
    }

    #[test]
    fn saving_prepends_entry_and_returns_to_feed() {
        let mut state = AppState::new(vec![], None);
        compose(&mut state, Some(Mood::Good), "Had a great walk", &["outdoors"]);

        let effect = state.dispatch(Action::SaveEntry);

        assert_eq!(effect, Some(Effect::PersistEntries));
        assert_eq!(state.entries().len(), 1);
        let entry = &state.entries()[0];
        assert_eq!(entry.mood, Mood::Good);
        assert_eq!(entry.text, "Had a great walk");
        assert_eq!(entry.photo, None);
        assert_eq!(entry.tags, vec!["outdoors".to_string()]);
        assert_eq!(state.draft, Draft::default());
        assert_eq!(state.screen, Screen::Base(BaseScreen::Feed));
    }

    #[test]
    fn saving_without_mood_or_text_is_a_no_op() {
        let mut state = AppState::new(vec![], None);
        compose(&mut state, None, "words but no mood", &[]);
        assert_eq!(state.dispatch(Action::SaveEntry), None);
        assert!(state.entries().is_empty());
        assert_eq!(state.screen, Screen::Base(BaseScreen::NewEntry));

        state.dispatch(Action::SelectMood(Mood::Meh));
        state.dispatch(Action::SetDraftText("   \n ".into()));
        assert_eq!(state.dispatch(Action::SaveEntry), None);
        assert!(state.entries().is_empty());
        assert_eq!(state.screen, Screen::Base(BaseScreen::NewEntry));
    }

    #[test]
    fn saves_are_newest_first() {
        let mut state = AppState::new(vec![], None);
        for text in ["first", "second", "third"] {
            compose(&mut state, Some(Mood::Rad), text, &[]);
            state.dispatch(Action::SaveEntry);
        }
        let texts: Vec<_> = state.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
    }

    #[test]
    fn back_discards_the_draft() {
        let mut state = AppState::new(vec![], None);
        compose(&mut state, Some(Mood::Bad), "never mind", &["x"]);
        state.dispatch(Action::Back);
        assert_eq!(state.draft, Draft::default());
        assert_eq!(state.screen, Screen::Base(BaseScreen::Feed));
        assert!(state.entries().is_empty());
    }

    #[test]
    fn duplicate_and_blank_tags_are_rejected() {
        let mut state = AppState::new(vec![], None);
        compose(&mut state, Some(Mood::Good), "t", &["calm", "calm", "  ", " Calm "]);
        assert_eq!(state.draft.tags, vec!["calm".to_string(), "Calm".to_string()]);
    }

    #[test]
    fn rejected_tag_keeps_its_input() {
        let mut state = AppState::new(vec![], None);
        compose(&mut state, Some(Mood::Good), "t", &["calm"]);
        state.dispatch(Action::SetTagInput("calm".into()));
        state.dispatch(Action::AddTag);
        assert_eq!(state.draft.tag_input, "calm");
    }

    #[test]
    fn removing_a_tag_keeps_order() {
        let mut state = AppState::new(vec![], None);
        compose(&mut state, Some(Mood::Good), "t", &["a", "b", "c"]);
        state.dispatch(Action::RemoveTag("b".into()));
        assert_eq!(state.draft.tags, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn photo_attach_replace_and_remove() {
        let mut state = AppState::new(vec![], None);
        compose(&mut state, Some(Mood::Good), "t", &[]);

        let first = attach(&mut state, "/tmp/a.png");
        assert_eq!(state.draft.photo_input, "");
        state.dispatch(Action::PhotoLoaded {
            ticket: first,
            result: Ok("data:image/png;base64,AA==".into()),
        });
        assert_eq!(state.draft.photo.as_deref(), Some("data:image/png;base64,AA=="));

        let second = attach(&mut state, "/tmp/b.png");
        state.dispatch(Action::PhotoLoaded {
            ticket: second,
            result: Ok("data:image/png;base64,BB==".into()),
        });
        assert_eq!(state.draft.photo.as_deref(), Some("data:image/png;base64,BB=="));
        assert_eq!(state.draft.pending_photo, None);

        state.dispatch(Action::RemovePhoto);
        assert_eq!(state.draft.photo, None);
    }

    fn attach(state: &mut AppState, path: &str) -> u64 {
        state.dispatch(Action::SetPhotoInput(path.into()));
        match state.dispatch(Action::AttachPhoto) {
            Some(Effect::LoadPhoto { ticket, path: loaded }) => {
                assert_eq!(loaded, PathBuf::from(path));
                ticket
            }
            other => panic!("expected a photo load, got {other:?}"),
        }
    }

    #[test]
    fn superseded_photo_load_is_ignored() {
        let mut state = AppState::new(vec![], None);
        compose(&mut state, Some(Mood::Good), "t", &[]);
        let old = attach(&mut state, "/tmp/a.png");
        let new = attach(&mut state, "/tmp/b.png");

        state.dispatch(Action::PhotoLoaded {
            ticket: new,
            result: Ok("data:image/png;base64,BB==".into()),
        });
        state.dispatch(Action::PhotoLoaded {
            ticket: old,
            result: Ok("data:image/png;base64,AA==".into()),
        });
        assert_eq!(state.draft.photo.as_deref(), Some("data:image/png;base64,BB=="));
    }

    #[test]
    fn photo_landing_after_back_does_not_reach_the_next_entry() {
        let mut state = AppState::new(vec![], None);
        compose(&mut state, Some(Mood::Bad), "discarded", &[]);
        let ticket = attach(&mut state, "/tmp/a.png");
        state.dispatch(Action::Back);

        state.dispatch(Action::PhotoLoaded {
            ticket,
            result: Ok("data:image/png;base64,AA==".into()),
        });
        compose(&mut state, Some(Mood::Good), "fresh", &[]);
        state.dispatch(Action::SaveEntry);

        assert_eq!(state.entries().len(), 1);
        assert_eq!(state.entries()[0].text, "fresh");
        assert_eq!(state.entries()[0].photo, None);
    }

    #[test]
    fn photo_landing_after_save_does_not_reach_the_next_entry() {
        let mut state = AppState::new(vec![], None);
        compose(&mut state, Some(Mood::Rad), "first", &[]);
        let ticket = attach(&mut state, "/tmp/a.png");
        state.dispatch(Action::SaveEntry);
        assert_eq!(state.entries()[0].photo, None);

        state.dispatch(Action::PhotoLoaded {
            ticket,
            result: Ok("data:image/png;base64,AA==".into()),
        });
        compose(&mut state, Some(Mood::Good), "second", &[]);
        state.dispatch(Action::SaveEntry);

        assert_eq!(state.entries()[0].text, "second");
        assert_eq!(state.entries()[0].photo, None);
    }

    #[test]
    fn blank_photo_path_does_nothing() {
        let mut state = AppState::new(vec![], None);
        compose(&mut state, Some(Mood::Good), "t", &[]);
        state.dispatch(Action::SetPhotoInput("   ".into()));
        assert_eq!(state.dispatch(Action::AttachPhoto), None);
    }

    #[test]
    fn failed_photo_load_shows_a_notice() {
        let mut state = AppState::new(vec![], None);
        compose(&mut state, Some(Mood::Good), "t", &[]);
        let ticket = attach(&mut state, "/tmp/notes.txt");
        state.dispatch(Action::PhotoLoaded {
            ticket,
            result: Err("not an image".into()),
        });
        let notice = state.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(state.draft.photo, None);
    }

    #[test]
    fn lock_without_password_opens_setup() {
        let mut state = AppState::new(vec![], None);
        state.dispatch(Action::Navigate(BaseScreen::Stats));
        state.dispatch(Action::ToggleLock);
        assert_eq!(
            state.screen,
            Screen::Overlay(Overlay::password_setup(), BaseScreen::Stats)
        );
    }

    #[test]
    fn password_lock_unlock_cycle() {
        let mut state = AppState::new(vec![], None);
        state.dispatch(Action::ToggleLock);
        state.dispatch(Action::SetPasswordInput("abcd".into()));
        assert_eq!(
            state.dispatch(Action::SavePassword),
            Some(Effect::PersistPassword("abcd".into()))
        );
        assert_eq!(state.screen, Screen::Base(BaseScreen::Feed));
        assert!(state.has_password());

        state.dispatch(Action::ToggleLock);
        assert!(state.screen.is_locked());

        state.dispatch(Action::SetUnlockAttempt("abc".into()));
        state.dispatch(Action::SubmitUnlock);
        assert!(state.screen.is_locked());
        assert!(state.unlock_error());
        assert!(matches!(
            &state.screen,
            Screen::Overlay(Overlay::Locked { attempt, .. }, _) if attempt.is_empty()
        ));

        state.dispatch(Action::Tick(Instant::now() + UNLOCK_ERROR_DURATION));
        assert!(!state.unlock_error());

        state.dispatch(Action::SetUnlockAttempt("abcd".into()));
        state.dispatch(Action::SubmitUnlock);
        assert_eq!(state.screen, Screen::Base(BaseScreen::Feed));
    }

    #[test]
    fn unlock_is_case_sensitive() {
        let mut state = AppState::new(vec![], Some("Secret".into()));
        state.dispatch(Action::SetUnlockAttempt("secret".into()));
        state.dispatch(Action::SubmitUnlock);
        assert!(state.screen.is_locked());
    }

    #[test]
    fn unlock_error_survives_until_the_delay() {
        let mut state = AppState::new(vec![], Some("abcd".into()));
        state.dispatch(Action::SubmitUnlock);
        state.dispatch(Action::Tick(Instant::now()));
        assert!(state.unlock_error());
    }

    #[test]
    fn unlock_always_lands_on_feed() {
        let mut state = AppState::new(vec![], Some("abcd".into()));
        state.dispatch(Action::SetUnlockAttempt("abcd".into()));
        state.dispatch(Action::SubmitUnlock);
        state.dispatch(Action::Navigate(BaseScreen::Calendar));
        state.dispatch(Action::ToggleLock);
        state.dispatch(Action::SetUnlockAttempt("abcd".into()));
        state.dispatch(Action::SubmitUnlock);
        assert_eq!(state.screen, Screen::Base(BaseScreen::Feed));
    }

    #[test]
    fn short_password_is_rejected_and_setup_stays_open() {
        let mut state = AppState::new(vec![], None);
        state.dispatch(Action::ToggleLock);
        state.dispatch(Action::SetPasswordInput("ab".into()));
        assert_eq!(state.dispatch(Action::SavePassword), None);
        assert!(!state.has_password());
        assert!(matches!(
            state.screen,
            Screen::Overlay(Overlay::PasswordSetup { .. }, _)
        ));
        assert_eq!(state.notice.as_ref().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn cancel_setup_discards_input() {
        let mut state = AppState::new(vec![], None);
        state.dispatch(Action::Navigate(BaseScreen::Calendar));
        state.dispatch(Action::OpenPasswordSetup);
        state.dispatch(Action::SetPasswordInput("abcdef".into()));
        state.dispatch(Action::CancelPasswordSetup);
        assert_eq!(state.screen, Screen::Base(BaseScreen::Calendar));
        assert!(!state.has_password());
    }

    #[test]
    fn overlays_swallow_navigation() {
        let mut state = AppState::new(vec![], Some("abcd".into()));
        state.dispatch(Action::Navigate(BaseScreen::Stats));
        state.dispatch(Action::SetSearchQuery("peek".into()));
        assert!(state.screen.is_locked());
        assert_eq!(state.screen.base(), BaseScreen::Feed);
        assert_eq!(state.search_query, "");
    }

    #[test]
    fn search_matches_text_or_tags_case_insensitively() {
        let mut state = AppState::new(
            vec![
                JournalEntry::new(Mood::Good, "A CALM evening".into(), None, vec![]),
                JournalEntry::new(Mood::Bad, "stormy".into(), None, vec!["Calm-ish".into()]),
                JournalEntry::new(Mood::Meh, "busy".into(), None, vec!["work".into()]),
            ],
            None,
        );

        assert_eq!(state.filtered_entries().len(), 3);

        state.dispatch(Action::SetSearchQuery("calm".into()));
        let texts: Vec<_> = state.filtered_entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["A CALM evening", "stormy"]);
        assert_eq!(state.entries().len(), 3);
    }

    #[test]
    fn insight_requires_three_entries() {
        let mut state = with_entries(&[Mood::Good, Mood::Bad]);
        assert_eq!(state.dispatch(Action::RequestInsight), None);
        assert!(!state.is_analyzing());
        assert!(state.notice.is_some());
    }

    #[test]
    fn only_one_analysis_in_flight() {
        let mut state = with_entries(&[Mood::Good, Mood::Good, Mood::Bad]);
        let first = state.dispatch(Action::RequestInsight);
        assert!(matches!(first, Some(Effect::Analyze { ticket: 1, ref entries }) if entries.len() == 3));
        assert!(state.is_analyzing());
        assert_eq!(state.dispatch(Action::RequestInsight), None);
    }

    #[test]
    fn analysis_carries_only_the_newest_entries() {
        let mut state = AppState::new(
            (0..10)
                .map(|i| JournalEntry::new(Mood::Meh, format!("entry {i}"), None, vec![]))
                .collect(),
            None,
        );
        match state.dispatch(Action::RequestInsight) {
            Some(Effect::Analyze { entries, .. }) => {
                assert_eq!(entries.len(), CONTEXT_ENTRIES);
                assert_eq!(entries[0].text, "entry 0");
            }
            other => panic!("expected an analysis, got {other:?}"),
        }
    }

    #[test]
    fn insight_result_lands_and_stale_results_are_dropped() {
        let mut state = with_entries(&[Mood::Good, Mood::Good, Mood::Bad]);
        state.dispatch(Action::RequestInsight);
        state.dispatch(Action::Navigate(BaseScreen::Feed));

        let insight = AiInsight {
            summary: "steady".into(),
            dominant_mood: "Content".into(),
            recommendations: vec![],
            growth_focus: "rest".into(),
        };
        state.dispatch(Action::InsightReady {
            ticket: 99,
            insight: Some(insight.clone()),
        });
        assert!(state.is_analyzing());
        assert_eq!(state.insight, None);

        state.dispatch(Action::InsightReady {
            ticket: 1,
            insight: Some(insight.clone()),
        });
        assert_eq!(state.analysis, AnalysisStatus::Idle);
        assert_eq!(state.insight, Some(insight));
    }

    #[test]
    fn failed_insight_allows_retry() {
        let mut state = with_entries(&[Mood::Good, Mood::Good, Mood::Bad]);
        state.dispatch(Action::RequestInsight);
        state.dispatch(Action::InsightReady {
            ticket: 1,
            insight: None,
        });
        assert_eq!(state.analysis, AnalysisStatus::Failed);
        assert!(matches!(
            state.dispatch(Action::RequestInsight),
            Some(Effect::Analyze { ticket: 2, .. })
        ));
    }

    #[test]
    fn notices_expire() {
        let mut state = with_entries(&[]);
        state.dispatch(Action::RequestInsight);
        assert!(state.notice.is_some());
        state.dispatch(Action::Tick(Instant::now() + NOTICE_DURATION));
        assert_eq!(state.notice, None);
    }

    #[test]
    fn draft_actions_are_ignored_off_the_composer() {
        let mut state = AppState::new(vec![], None);
        state.dispatch(Action::SelectMood(Mood::Rad));
        state.dispatch(Action::SetDraftText("stray".into()));
        assert_eq!(state.draft, Draft::default());
    }
}
