use anyhow::Result;
use boardfx_config::BoardFxConfig;
use boardfx_dom::{Document, MemoryDocument, NodeId};
use boardfx_engine::{AnimationManager, InstantaneousFlag};

pub type Manager = AnimationManager<MemoryDocument, InstantaneousFlag>;

/// A scripted sequence of engine calls against the stage.
pub trait Scene {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn play(&self, stage: &Stage) -> Result<()>;
}

pub fn all() -> Vec<Box<dyn Scene>> {
    vec![
        Box::new(slide::SlideScene),
        Box::new(swap::SwapScene),
        Box::new(sequence::SequenceScene),
        Box::new(scoring::ScoringScene),
        Box::new(fade::FadeScene),
        Box::new(deal::DealScene),
        Box::new(legacy::LegacyScene),
    ]
}

pub mod deal;
pub mod fade;
pub mod legacy;
pub mod scoring;
pub mod sequence;
pub mod slide;
pub mod swap;

/// A small card table: a deck, a hand of three cards, a tilted play area and
/// a player badge, in a 1280x720 viewport.
pub struct Stage {
    pub doc: MemoryDocument,
    pub manager: Manager,
    pub deck: NodeId,
    pub hand: NodeId,
    pub table: NodeId,
    pub player: NodeId,
    pub cards: Vec<NodeId>,
}

pub const CARD_SIZE: (f64, f64) = (60.0, 90.0);

impl Stage {
    pub fn new(config: &BoardFxConfig) -> Result<Self> {
        let doc = MemoryDocument::new();
        doc.set_viewport(1280.0, 720.0);
        let game = InstantaneousFlag::new(config.animations.instantaneous);
        let manager = AnimationManager::from_config(doc.clone(), game, config)?;

        let body = doc.body();
        let deck = doc.create_in(body, "div", CARD_SIZE.0, CARD_SIZE.1);
        doc.set_position(deck, 40.0, 300.0);
        let hand = doc.create_in(body, "div", 400.0, CARD_SIZE.1);
        doc.set_position(hand, 440.0, 600.0);
        let table = doc.create_in(body, "div", 300.0, 160.0);
        doc.set_position(table, 490.0, 220.0);
        doc.set_style(&table, "transform", "rotate(8deg)")?;
        let player = doc.create_in(body, "div", 140.0, 40.0);
        doc.set_position(player, 1100.0, 30.0);
        doc.set_text(&player, "player");

        let cards = ["A", "K", "Q"]
            .into_iter()
            .map(|label| Self::card_in(&doc, hand, label))
            .collect();

        Ok(Self {
            doc,
            manager,
            deck,
            hand,
            table,
            player,
            cards,
        })
    }

    pub fn card_in(doc: &MemoryDocument, parent: NodeId, label: &str) -> NodeId {
        let card = doc.create_in(parent, "div", CARD_SIZE.0, CARD_SIZE.1);
        doc.set_text(&card, label);
        card
    }

    pub fn containers(&self) -> [(&'static str, NodeId); 3] {
        [("deck", self.deck), ("hand", self.hand), ("table", self.table)]
    }

    /// Drive `future` on the virtual clock.
    pub fn run<F: Future>(&self, future: F) -> Result<F::Output> {
        Ok(self.doc.run(future)?)
    }
}
