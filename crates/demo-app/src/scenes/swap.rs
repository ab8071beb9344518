use anyhow::Result;
use boardfx_engine::AnimationSettings;

use super::{Scene, Stage};

pub struct SwapScene;

impl Scene for SwapScene {
    fn name(&self) -> &'static str {
        "swap"
    }

    fn description(&self) -> &'static str {
        "swap the outer cards of the hand, then swap one with the deck slot"
    }

    fn play(&self, stage: &Stage) -> Result<()> {
        let cards = &stage.cards;
        stage.run(stage.manager.swap(&[cards[0], cards[2]], None))??;

        let on_deck = Stage::card_in(&stage.doc, stage.deck, "J");
        let slow = AnimationSettings::new().duration(900.0);
        stage.run(stage.manager.swap(&[on_deck, cards[1]], Some(&slow)))??;
        Ok(())
    }
}
