use anyhow::Result;
use boardfx_engine::LegacySettings;

use super::{Manager, Scene, Stage};

pub struct LegacyScene;

impl Scene for LegacyScene {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn description(&self) -> &'static str {
        "CSS-transition path: show a card at the screen center, then slide it home"
    }

    fn play(&self, stage: &Stage) -> Result<()> {
        let manager: &Manager = &stage.manager;
        let played = stage.run(manager.attach_with_show_to_screen_animation(
            &stage.cards[0],
            &stage.table,
            None,
            None,
        ))??;
        tracing::info!(played, "show to screen");

        let settings = LegacySettings::new().duration(300.0).rotation_delta(-20.0);
        stage.run(manager.attach_with_slide_animation(
            &stage.cards[1],
            &stage.deck,
            Some(&settings),
            None,
        ))??;
        Ok(())
    }
}

