//! Wooden fish: knock for merit.
//!
//! Two counters are kept, lifetime `merit` and `today_merit`. The daily
//! counter belongs to `date` and restarts when a knock lands on a new day.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::zlog_debug;

/// Store key for the merit counters blob.
pub const STORE_KEY: &str = "wooden_fish";
pub const STRIKE_DURATION: Duration = Duration::from_millis(150);
pub const FLOAT_DURATION: Duration = Duration::from_millis(1500);
/// Floating texts drift at most this many columns left or right of center.
pub const FLOAT_SPREAD: f32 = 30.0;
/// Oldest floating texts are dropped past this many.
pub const MAX_FLOATING: usize = 32;

pub const BLESSINGS: [&str; 6] = [
    "功德 +1",
    "善哉善哉",
    "阿弥陀佛",
    "心诚则灵",
    "积德行善",
    "福报无量",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FishBlob {
    #[serde(default)]
    pub merit: Option<u64>,
    #[serde(default)]
    pub today_merit: Option<u64>,
    /// Kept as text so a foreign date format only loses the daily count.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub id: u64,
    pub text: &'static str,
    pub x_offset: f32,
    pub born_at: Instant,
}

impl FloatingText {
    /// 0.0 when spawned, 1.0 when it is about to disappear.
    pub fn progress(&self, now: Instant) -> f32 {
        let age = now.saturating_duration_since(self.born_at);
        (age.as_secs_f32() / FLOAT_DURATION.as_secs_f32()).min(1.0)
    }

    fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.born_at) >= FLOAT_DURATION
    }
}

#[derive(Debug, Clone)]
pub struct WoodenFish {
    merit: u64,
    today_merit: u64,
    date: NaiveDate,
    sound_enabled: bool,
    struck_until: Option<Instant>,
    floating: Vec<FloatingText>,
    next_id: u64,
}

impl WoodenFish {
    pub fn new(today: NaiveDate, sound_enabled: bool) -> Self {
        Self {
            merit: 0,
            today_merit: 0,
            date: today,
            sound_enabled,
            struck_until: None,
            floating: Vec::new(),
            next_id: 0,
        }
    }

    /// Restore counters. The daily count only survives if it was saved today.
    pub fn from_blob(blob: FishBlob, today: NaiveDate, sound_enabled: bool) -> Self {
        let mut fish = Self::new(today, sound_enabled);
        if let Some(merit) = blob.merit.filter(|m| *m > 0) {
            fish.merit = merit;
        }
        let saved_date = blob
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok());
        if saved_date == Some(today) {
            fish.today_merit = blob.today_merit.unwrap_or(0);
        }
        fish
    }

    pub fn to_blob(&self) -> FishBlob {
        FishBlob {
            merit: Some(self.merit),
            today_merit: Some(self.today_merit),
            date: Some(self.date.format(DATE_FORMAT).to_string()),
        }
    }

    pub fn merit(&self) -> u64 {
        self.merit
    }

    pub fn today_merit(&self) -> u64 {
        self.today_merit
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn floating(&self) -> &[FloatingText] {
        &self.floating
    }

    pub fn is_struck(&self, now: Instant) -> bool {
        self.struck_until.is_some_and(|until| now < until)
    }

    /// Move to a new calendar day, zeroing the daily counter if it changed.
    pub fn roll_date(&mut self, today: NaiveDate) -> bool {
        if self.date == today {
            return false;
        }
        zlog_debug!("WoodenFish day rollover {} -> {}", self.date, today);
        self.date = today;
        self.today_merit = 0;
        true
    }

    /// One knock. Returns true when a tone should be played.
    pub fn knock<R: Rng>(&mut self, now: Instant, today: NaiveDate, rng: &mut R) -> bool {
        self.roll_date(today);
        self.merit += 1;
        self.today_merit += 1;
        self.struck_until = Some(now + STRIKE_DURATION);

        let text = BLESSINGS.choose(rng).copied().unwrap_or(BLESSINGS[0]);
        let x_offset = rng.gen_range(-FLOAT_SPREAD..FLOAT_SPREAD);
        self.floating.push(FloatingText {
            id: self.next_id,
            text,
            x_offset,
            born_at: now,
        });
        self.next_id += 1;
        if self.floating.len() > MAX_FLOATING {
            let excess = self.floating.len() - MAX_FLOATING;
            self.floating.drain(..excess);
        }

        self.sound_enabled
    }

    pub fn reset(&mut self) {
        self.merit = 0;
        self.today_merit = 0;
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Drop finished animations. Returns true if anything visible changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.struck_until.is_some_and(|until| now >= until) {
            self.struck_until = None;
            changed = true;
        }
        let before = self.floating.len();
        self.floating.retain(|f| !f.expired(now));
        changed || self.floating.len() != before
    }
}
