#![forbid(unsafe_code)]

//! Scenario files: a list configuration, initial sections, and a script of
//! input steps.
//!
//! Scenarios are TOML or JSON, chosen by file extension:
//!
//! ```toml
//! name = "move milk to the top"
//!
//! [config]
//! row_height = 50.0
//! section_header_height = 40.0
//!
//! [[sections]]
//! id = "groceries"
//! items = ["eggs", "bread", "milk"]
//!
//! [[steps]]
//! op = "item_pan"
//! section = "groceries"
//! item = "milk"
//! event = { kind = "begin", y = 165.0 }
//! ```

use std::path::Path;

use regroup_core::{PanEvent, PointerEvent};
use regroup_layout::{Item, Section};
use regroup_list::ListConfig;
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// One scripted replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub config: ListConfig,
    pub sections: Vec<SectionSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Feed every committed order back through `set_sections`, the way a
    /// host store would.
    #[serde(default = "default_true")]
    pub apply_commits: bool,
    /// Frame duration used by `tick` and `settle` steps, in milliseconds.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_frame_ms() -> u64 {
    16
}

/// A section as written in a scenario: an id and its item ids in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionSpec {
    pub id: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl SectionSpec {
    pub fn to_section(&self) -> Section<Item> {
        Section::new(
            self.id.as_str(),
            self.items.iter().map(|id| Item::new(id.as_str())).collect(),
        )
    }

    pub fn from_section(section: &Section<Item>) -> Self {
        Self {
            id: section.id.to_string(),
            items: section.data.iter().map(|item| item.id.to_string()).collect(),
        }
    }
}

/// Semantic pan events, as scripted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanStep {
    Begin { y: f64 },
    Update { y: f64 },
    End,
    Cancel,
}

impl From<PanStep> for PanEvent {
    fn from(step: PanStep) -> Self {
        match step {
            PanStep::Begin { y } => Self::Begin { absolute_y: y },
            PanStep::Update { y } => Self::Update { absolute_y: y },
            PanStep::End => Self::End,
            PanStep::Cancel => Self::Cancel,
        }
    }
}

/// Raw pointer samples, recognized into pans by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerStep {
    Down { y: f64 },
    Move { y: f64 },
    Up,
    Cancel,
}

impl From<PointerStep> for PointerEvent {
    fn from(step: PointerStep) -> Self {
        match step {
            PointerStep::Down { y } => Self::Down { y },
            PointerStep::Move { y } => Self::Move { y },
            PointerStep::Up => Self::Up,
            PointerStep::Cancel => Self::Cancel,
        }
    }
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Deliver a pan event to an item.
    ItemPan {
        section: String,
        item: String,
        event: PanStep,
    },
    /// Deliver a pan event to a section header.
    SectionPan { section: String, event: PanStep },
    /// Feed a raw pointer sample to the item (or, without `item`, the
    /// section header) under the pointer.
    Pointer {
        section: String,
        #[serde(default)]
        item: Option<String>,
        pointer: PointerStep,
    },
    /// The scroll surface reports a new offset.
    Scroll { offset: f64 },
    /// Advance animations by `frames` frames.
    Tick {
        #[serde(default = "default_frames")]
        frames: u32,
    },
    /// Tick until every animation is idle.
    Settle,
    /// Replace the sections, as a host data change would.
    SetSections { sections: Vec<SectionSpec> },
    /// Record the current frame under `label`.
    Snapshot { label: String },
}

fn default_frames() -> u32 {
    1
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a scenario, choosing the format by extension (`.json` is JSON,
    /// anything else TOML).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn initial_sections(&self) -> Vec<Section<Item>> {
        self.sections.iter().map(SectionSpec::to_section).collect()
    }

    /// Check the config and structural consistency. Returns all problems.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.config.validate();
        if self.frame_ms == 0 {
            errors.push("frame_ms must be > 0".into());
        }
        let mut seen = std::collections::HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.id.as_str()) {
                errors.push(format!("duplicate section id {:?}", section.id));
            }
            let mut items = std::collections::HashSet::new();
            for item in &section.items {
                if !items.insert(item.as_str()) {
                    errors.push(format!(
                        "duplicate item id {item:?} in section {:?}",
                        section.id
                    ));
                }
            }
        }
        errors
    }

    /// Like [`validate`](Self::validate) but returns `Err` on any problem.
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(HarnessError::Scenario(errors.join("; ")))
        }
    }
}
