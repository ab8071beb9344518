use anyhow::Result;
use boardfx_engine::{MessageEffect, MessageOptions};

use super::{Scene, Stage};

pub struct ScoringScene;

impl Scene for ScoringScene {
    fn name(&self) -> &'static str {
        "scoring"
    }

    fn description(&self) -> &'static str {
        "score popup over the player while a message shows over the table"
    }

    fn play(&self, stage: &Stage) -> Result<()> {
        let manager = &stage.manager;
        let quick = MessageOptions::new()
            .effect(MessageEffect::FadeInOut)
            .duration(1200.0);
        let (score, message, bubble) = stage.run(async {
            futures::join!(
                manager.display_scoring(&stage.player, 12, "2e7d32", None),
                manager.display_message(&stage.table, "Trick won", None),
                manager.display_bubble(&stage.player, "Nice!", Some(&quick)),
            )
        })?;
        score?;
        message?;
        bubble?;
        Ok(())
    }
}
