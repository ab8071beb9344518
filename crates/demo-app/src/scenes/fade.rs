use anyhow::Result;

use super::{Scene, Stage};

pub struct FadeScene;

impl Scene for FadeScene {
    fn name(&self) -> &'static str {
        "fade"
    }

    fn description(&self) -> &'static str {
        "discard a card into the deck, then draw a new one from it"
    }

    fn play(&self, stage: &Stage) -> Result<()> {
        let manager = &stage.manager;
        stage.run(manager.fade_out_and_destroy(&stage.cards[0], Some(&stage.deck), None))??;

        let drawn = Stage::card_in(&stage.doc, stage.hand, "10");
        stage.run(manager.fade_in(&drawn, Some(&stage.deck), None))??;
        stage.run(manager.slide_in(&stage.cards[1], None, None))??;
        Ok(())
    }
}
