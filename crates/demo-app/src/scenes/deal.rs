use anyhow::Result;
use boardfx_engine::AnimationSettings;

use super::{Scene, Stage};

pub struct DealScene;

impl Scene for DealScene {
    fn name(&self) -> &'static str {
        "deal"
    }

    fn description(&self) -> &'static str {
        "deal four cards from the deck to the table, staggered"
    }

    fn play(&self, stage: &Stage) -> Result<()> {
        let dealt: Vec<_> = ["2", "3", "4", "5"]
            .into_iter()
            .map(|label| Stage::card_in(&stage.doc, stage.deck, label))
            .collect();
        let settings = AnimationSettings::new().no_bump();
        let deals = dealt
            .iter()
            .map(|card| {
                let settings = &settings;
                move |_| {
                    stage
                        .manager
                        .slide_and_attach(card, &stage.table, Some(settings), None)
                }
            })
            .collect();
        for result in stage.run(stage.manager.play_interval(deals, None))? {
            result?;
        }

        // A chip flying from the table to the player, then gone.
        let chip = stage.doc.create("div");
        stage.doc.set_size(chip, 16.0, 16.0);
        stage.run(stage.manager.slide_floating_element(
            &chip,
            Some(&stage.table),
            &stage.player,
            None,
        ))??;
        Ok(())
    }
}
