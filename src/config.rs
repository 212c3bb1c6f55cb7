//! JSON configuration for a design session.

use crate::geometry::{LayoutMode, Panel, PanelId, Panels, Spacing};
use crate::sample::{SamplePolicy, Selection};
use crate::transform::ImagePlacement;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelsConfig {
    pub left_wing: Panel,
    pub right_wing: Panel,
    pub left_tail: Panel,
    pub right_tail: Panel,
}

impl Default for PanelsConfig {
    fn default() -> Self {
        let panels = Panels::default();
        Self {
            left_wing: *panels.get(PanelId::LeftWing),
            right_wing: *panels.get(PanelId::RightWing),
            left_tail: *panels.get(PanelId::LeftTail),
            right_tail: *panels.get(PanelId::RightTail),
        }
    }
}

impl From<PanelsConfig> for Panels {
    fn from(c: PanelsConfig) -> Self {
        Panels::new([c.left_wing, c.right_wing, c.left_tail, c.right_tail])
    }
}

/// Everything a [`Designer`](crate::Designer) starts from. Missing fields take defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignerConfig {
    pub panels: PanelsConfig,
    pub spacing: Spacing,
    pub layout: LayoutMode,
    pub policy: SamplePolicy,
    pub selection: Selection,
    pub placement: ImagePlacement,
}

impl DesignerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DesignerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.spacing.validate()?;
        for (_, panel) in Panels::from(self.panels).iter() {
            panel.validate()?;
        }
        Ok(())
    }
}
