//! "What to eat": a random pick over an editable food list.
//!
//! A spin shows [`SPIN_FRAMES`] random names, one every
//! [`SPIN_FRAME_INTERVAL`], then settles on a final pick that is pushed onto
//! the history. Time is passed in by the caller so the wheel can be driven
//! from ticks and tested without sleeping.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Store key for the food list and history blob.
pub const STORE_KEY: &str = "what_to_eat";
pub const DEFAULT_CATEGORY: &str = "其他";
pub const HISTORY_LIMIT: usize = 10;
pub const SPIN_FRAMES: u32 = 20;
pub const SPIN_FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub name: String,
    pub category: String,
}

impl Food {
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
        }
    }
}

const DEFAULT_FOODS: &[(&str, &str)] = &[
    ("红烧肉", "中餐"),
    ("宫保鸡丁", "中餐"),
    ("麻婆豆腐", "中餐"),
    ("糖醋排骨", "中餐"),
    ("鱼香肉丝", "中餐"),
    ("回锅肉", "中餐"),
    ("东坡肉", "中餐"),
    ("水煮鱼", "中餐"),
    ("兰州拉面", "面食"),
    ("重庆小面", "面食"),
    ("炸酱面", "面食"),
    ("刀削面", "面食"),
    ("热干面", "面食"),
    ("担担面", "面食"),
    ("汉堡薯条", "快餐"),
    ("炸鸡", "快餐"),
    ("披萨", "快餐"),
    ("三明治", "快餐"),
    ("寿司", "日韩料理"),
    ("拉面", "日韩料理"),
    ("韩式烤肉", "日韩料理"),
    ("石锅拌饭", "日韩料理"),
    ("咖喱饭", "日韩料理"),
    ("火锅", "其他"),
    ("烧烤", "其他"),
    ("自助餐", "其他"),
    ("麻辣烫", "其他"),
    ("黄焖鸡", "其他"),
    ("沙县小吃", "其他"),
    ("煲仔饭", "其他"),
];

pub fn default_foods() -> Vec<Food> {
    DEFAULT_FOODS
        .iter()
        .map(|(name, category)| Food::new(name, category))
        .collect()
}

/// Persisted shape. Either field may be missing in an older or hand-edited
/// blob; a missing field keeps the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodBlob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foods: Option<Vec<Food>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Spin {
    frames_done: u32,
    next_frame_at: Instant,
}

/// Outcome of advancing the wheel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinStep {
    /// Not spinning, or the next frame is not due yet.
    Idle,
    /// A new random name is showing.
    Frame,
    /// The wheel stopped on this food; history has been updated.
    Finished(String),
}

#[derive(Debug, Clone)]
pub struct FoodPicker {
    foods: Vec<Food>,
    history: Vec<String>,
    result: Option<String>,
    spin: Option<Spin>,
}

impl Default for FoodPicker {
    fn default() -> Self {
        Self {
            foods: default_foods(),
            history: Vec::new(),
            result: None,
            spin: None,
        }
    }
}

impl FoodPicker {
    pub fn from_blob(blob: FoodBlob) -> Self {
        let mut picker = Self::default();
        if let Some(foods) = blob.foods {
            picker.foods = foods;
        }
        if let Some(mut history) = blob.history {
            history.truncate(HISTORY_LIMIT);
            picker.history = history;
        }
        picker
    }

    pub fn to_blob(&self) -> FoodBlob {
        FoodBlob {
            foods: Some(self.foods.clone()),
            history: Some(self.history.clone()),
        }
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    /// Most recent pick first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    /// Unique categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for food in &self.foods {
            if !seen.contains(&food.category.as_str()) {
                seen.push(&food.category);
            }
        }
        seen
    }

    /// Start the wheel. Returns `Ok(false)` if it is already turning.
    pub fn start_spin(&mut self, now: Instant) -> Result<bool> {
        if self.spin.is_some() {
            return Ok(false);
        }
        if self.foods.is_empty() {
            return Err(Error::NoFoods);
        }
        self.result = None;
        self.spin = Some(Spin {
            frames_done: 0,
            next_frame_at: now + SPIN_FRAME_INTERVAL,
        });
        Ok(true)
    }

    pub fn cancel_spin(&mut self) {
        if self.spin.take().is_some() {
            self.result = None;
        }
    }

    /// Play every frame that is due at `now`.
    pub fn advance<R: Rng>(&mut self, now: Instant, rng: &mut R) -> SpinStep {
        let mut step = SpinStep::Idle;

        while let Some(mut spin) = self.spin {
            if now < spin.next_frame_at {
                break;
            }
            spin.frames_done += 1;
            spin.next_frame_at += SPIN_FRAME_INTERVAL;

            let Some(name) = self.choose(rng) else {
                // list emptied underneath the wheel
                self.cancel_spin();
                return SpinStep::Idle;
            };

            if spin.frames_done >= SPIN_FRAMES {
                self.spin = None;
                let pick = self.choose(rng).unwrap_or(name);
                self.record(pick.clone());
                return SpinStep::Finished(pick);
            }

            self.result = Some(name);
            self.spin = Some(spin);
            step = SpinStep::Frame;
        }

        step
    }

    /// Pick immediately without animation.
    pub fn pick_now<R: Rng>(&mut self, rng: &mut R) -> Result<String> {
        let pick = self.choose(rng).ok_or(Error::NoFoods)?;
        self.spin = None;
        self.record(pick.clone());
        Ok(pick)
    }

    fn choose<R: Rng>(&self, rng: &mut R) -> Option<String> {
        self.foods.choose(rng).map(|f| f.name.clone())
    }

    fn record(&mut self, pick: String) {
        self.result = Some(pick.clone());
        self.history.insert(0, pick);
        self.history.truncate(HISTORY_LIMIT);
    }

    /// Append a food. Blank names are ignored; an empty category falls back
    /// to [`DEFAULT_CATEGORY`].
    pub fn add_food(&mut self, name: &str, category: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            c => c,
        };
        self.foods.push(Food::new(name, category));
        true
    }

    /// Remove every food with this name. Returns how many were removed.
    pub fn remove_food(&mut self, name: &str) -> usize {
        let before = self.foods.len();
        self.foods.retain(|f| f.name != name);
        before - self.foods.len()
    }
}
