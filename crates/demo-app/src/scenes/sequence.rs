use anyhow::Result;
use boardfx_engine::{AnimationSettings, LegSettings, SequenceLeg};

use super::{Scene, Stage};

pub struct SequenceScene;

impl Scene for SequenceScene {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn description(&self) -> &'static str {
        "reveal a card at the screen center, hold it, then drop it on the table"
    }

    fn play(&self, stage: &Stage) -> Result<()> {
        let card = stage.cards[1];
        let legs = [
            SequenceLeg::ScreenCenter,
            SequenceLeg::Pause(600.0),
            SequenceLeg::Destination,
        ];
        let per_leg = [
            AnimationSettings::new().duration(700.0).bump(1.5),
            AnimationSettings::new(),
            AnimationSettings::new().duration(400.0),
        ];
        stage.run(stage.manager.sequence_animations_attach(
            &card,
            &stage.table,
            &legs,
            LegSettings::PerLeg(&per_leg),
            None,
        ))??;

        // Same trip through another element instead of the screen center.
        stage.run(stage.manager.slide_to_element_and_attach(
            &stage.cards[2],
            &stage.player,
            &stage.table,
            LegSettings::Default,
            None,
        ))??;
        Ok(())
    }
}
