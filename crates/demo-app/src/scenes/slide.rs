use anyhow::Result;

use super::{Scene, Stage};

pub struct SlideScene;

impl Scene for SlideScene {
    fn name(&self) -> &'static str {
        "slide"
    }

    fn description(&self) -> &'static str {
        "play the first card of the hand onto the tilted table"
    }

    fn play(&self, stage: &Stage) -> Result<()> {
        stage.run(stage.manager.slide_and_attach(&stage.cards[0], &stage.table, None, None))??;
        Ok(())
    }
}
