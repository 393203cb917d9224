//! Two-way layout toggle
//!
//! Only the first two stored templates take part. If the live layout matches
//! the first one, the second is applied; in every other case, including a live
//! layout that matches neither, the first one is.

use tracing::{debug, info};

use crate::error::{LayoutError, Result};
use crate::layout::Layout;

/// The two templates the toggle alternates between
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePair {
    pub first: Layout,
    pub second: Layout,
}

impl TemplatePair {
    pub fn new(first: Layout, second: Layout) -> Self {
        Self { first, second }
    }

    /// Take the first two templates in store order; later ones are left for
    /// the launcher listing
    pub fn from_templates(templates: Vec<Layout>) -> Result<Self> {
        let found = templates.len();
        let mut iter = templates.into_iter();
        match (iter.next(), iter.next()) {
            (Some(first), Some(second)) => {
                if found > 2 {
                    debug!(ignored = found - 2, "Only the first two templates take part in switching");
                }
                Ok(Self::new(first, second))
            }
            _ => Err(LayoutError::NoTemplates { found }),
        }
    }
}

/// Slot of the pair a switch picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchDecision<'a> {
    pub slot: Slot,
    pub layout: &'a Layout,
}

impl SwitchDecision<'_> {
    /// Diagnostic line for stderr
    pub fn report(&self) -> String {
        format!("switch to {}", self.slot.index())
    }
}

/// Pick the template to apply next given the live layout
pub fn next_layout<'a>(live: &Layout, pair: &'a TemplatePair) -> SwitchDecision<'a> {
    let live_footprint = live.footprint();
    let decision = if live_footprint == pair.first.footprint() {
        SwitchDecision {
            slot: Slot::Second,
            layout: &pair.second,
        }
    } else {
        SwitchDecision {
            slot: Slot::First,
            layout: &pair.first,
        }
    };
    info!(
        live = %live_footprint,
        slot = decision.slot.index(),
        layout = decision.layout.label(),
        "Chose next layout"
    );
    decision
}
