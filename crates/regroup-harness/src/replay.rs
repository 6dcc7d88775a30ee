#![forbid(unsafe_code)]

//! Headless replay of a [`Scenario`] against a [`ListController`].
//!
//! The replayer stands in for a host: it owns the list, echoes auto-scroll
//! into the scroll offset, recognizes raw pointer samples into pans, and
//! (unless disabled) feeds every committed order back through
//! `set_sections` the way a host store would.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use regroup_core::{PanConfig, PanEvent, PanRecognizer};
use regroup_layout::{EntityId, Item, Section};
use regroup_list::{ListController, ListError, ListFrame};
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::error::{HarnessError, Result};
use crate::scenario::{Scenario, SectionSpec, Step};

/// Upper bound on frames ticked by one `settle` step.
pub const MAX_SETTLE_FRAMES: u32 = 10_000;

type CommitSink = Arc<Mutex<Vec<Vec<Section<Item>>>>>;

/// One order reported through `on_reorder`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitRecord {
    /// Index of the step whose event produced the commit.
    pub step: usize,
    pub sections: Vec<SectionSpec>,
}

/// A frame recorded by a `snapshot` step.
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    pub label: String,
    pub step: usize,
    pub frame: ListFrame,
}

/// Everything a replay observed.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub name: String,
    pub steps: usize,
    pub frames_ticked: u64,
    pub commits: Vec<CommitRecord>,
    pub snapshots: Vec<FrameRecord>,
    pub final_sections: Vec<SectionSpec>,
    pub final_frame: ListFrame,
}

/// Drives one list through scripted steps.
#[derive(Debug)]
pub struct Replayer {
    list: ListController<Item>,
    sink: CommitSink,
    recognizer: PanRecognizer,
    frame: Duration,
    apply_commits: bool,
    frames_ticked: u64,
    commits: Vec<CommitRecord>,
    snapshots: Vec<FrameRecord>,
}

impl Replayer {
    /// Mount the scenario's sections under its config.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Scenario`] or [`HarnessError::Config`] when the
    /// scenario does not validate.
    pub fn new(scenario: &Scenario) -> Result<Self> {
        let errors = scenario.validate();
        if !errors.is_empty() {
            return Err(HarnessError::Scenario(errors.join("; ")));
        }

        let sink: CommitSink = Arc::new(Mutex::new(Vec::new()));
        let commits = Arc::clone(&sink);
        let mut list = ListController::new(scenario.config.clone(), scenario.initial_sections())
            .with_on_reorder(move |next| {
                commits
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(next);
            });
        list.attach_surface(list.context().scroll_y().clone());

        Ok(Self {
            list,
            sink,
            recognizer: PanRecognizer::new(PanConfig::default()),
            frame: Duration::from_millis(scenario.frame_ms),
            apply_commits: scenario.apply_commits,
            frames_ticked: 0,
            commits: Vec::new(),
            snapshots: Vec::new(),
        })
    }

    pub fn list(&self) -> &ListController<Item> {
        &self.list
    }

    /// Apply one step.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Step`] when a pan names an unmounted section or item,
    /// and [`HarnessError::Scenario`] when a `settle` step never settles.
    pub fn step(&mut self, index: usize, step: &Step) -> Result<()> {
        debug!(step = index, ?step, "replay step");
        match step {
            Step::ItemPan {
                section,
                item,
                event,
            } => {
                let target = Target::item(section, item);
                self.dispatch(index, &target, (*event).into())?;
            }
            Step::SectionPan { section, event } => {
                let target = Target::header(section);
                self.dispatch(index, &target, (*event).into())?;
            }
            Step::Pointer {
                section,
                item,
                pointer,
            } => {
                let target = match item {
                    Some(item) => Target::item(section, item),
                    None => Target::header(section),
                };
                for event in self.recognizer.process((*pointer).into()) {
                    self.dispatch(index, &target, event)?;
                }
            }
            Step::Scroll { offset } => self.list.on_scroll(*offset),
            Step::Tick { frames } => {
                for _ in 0..*frames {
                    self.tick();
                }
            }
            Step::Settle => self.settle()?,
            Step::SetSections { sections } => {
                self.list
                    .set_sections(sections.iter().map(SectionSpec::to_section).collect());
            }
            Step::Snapshot { label } => self.snapshots.push(FrameRecord {
                label: label.clone(),
                step: index,
                frame: self.list.frame(),
            }),
        }
        Ok(())
    }

    fn dispatch(&mut self, index: usize, target: &Target, event: PanEvent) -> Result<()> {
        let routed = match &target.item {
            Some(item) => self.list.item_pan(&target.section, item, event),
            None => self.list.section_pan(&target.section, event),
        };
        routed.map_err(|source: ListError| HarnessError::Step {
            step: index,
            source,
        })?;
        self.collect_commits(index);
        Ok(())
    }

    fn collect_commits(&mut self, index: usize) {
        let drained: Vec<_> = std::mem::take(
            &mut *self.sink.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for next in drained {
            info!(step = index, sections = next.len(), "commit observed");
            self.commits.push(CommitRecord {
                step: index,
                sections: next.iter().map(SectionSpec::from_section).collect(),
            });
            if self.apply_commits {
                self.list.set_sections(next);
            }
        }
    }

    fn tick(&mut self) -> bool {
        self.frames_ticked += 1;
        self.list.tick(self.frame)
    }

    fn settle(&mut self) -> Result<()> {
        for _ in 0..MAX_SETTLE_FRAMES {
            if !self.tick() {
                return Ok(());
            }
        }
        Err(HarnessError::Scenario(format!(
            "animations did not settle within {MAX_SETTLE_FRAMES} frames"
        )))
    }

    /// Consume the replayer into its report.
    pub fn finish(self, name: &str, steps: usize) -> Report {
        let final_sections = self
            .list
            .sections()
            .iter()
            .map(SectionSpec::from_section)
            .collect();
        Report {
            name: name.to_string(),
            steps,
            frames_ticked: self.frames_ticked,
            commits: self.commits,
            snapshots: self.snapshots,
            final_sections,
            final_frame: self.list.frame(),
        }
    }
}

/// Where a pan is delivered.
struct Target {
    section: EntityId,
    item: Option<EntityId>,
}

impl Target {
    fn item(section: &str, item: &str) -> Self {
        Self {
            section: section.into(),
            item: Some(item.into()),
        }
    }

    fn header(section: &str) -> Self {
        Self {
            section: section.into(),
            item: None,
        }
    }
}

/// Replay every step of `scenario` and report what happened.
///
/// # Errors
///
/// See [`Replayer::new`] and [`Replayer::step`].
pub fn replay(scenario: &Scenario) -> Result<Report> {
    let span = info_span!("replay", name = %scenario.name);
    let _guard = span.enter();

    let mut replayer = Replayer::new(scenario)?;
    for (index, step) in scenario.steps.iter().enumerate() {
        replayer.step(index, step)?;
    }
    let report = replayer.finish(&scenario.name, scenario.steps.len());
    info!(
        commits = report.commits.len(),
        frames = report.frames_ticked,
        "replay finished"
    );
    Ok(report)
}
