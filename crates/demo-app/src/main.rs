use anyhow::{Result, anyhow};
use boardfx_config::BoardFxConfig;
use boardfx_dom::Document;
use tracing::info;

mod scenes;
use scenes::{Scene, Stage};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = BoardFxConfig::load();
    // `--scene=<name>` beats DEMO_SCENE / BOARDFX_SCENE and the config file.
    if let Some(scene) = std::env::args().find_map(|a| a.strip_prefix("--scene=").map(str::to_string))
    {
        config.demo.scene = scene;
    }
    if std::env::args().any(|a| a == "--instant") {
        config.animations.instantaneous = true;
    }

    let scenes = scenes::all();
    let scene: &dyn Scene = scenes
        .iter()
        .find(|scene| scene.name() == config.demo.scene)
        .map(|scene| scene.as_ref())
        .ok_or_else(|| {
            let names: Vec<_> = scenes.iter().map(|scene| scene.name()).collect();
            anyhow!(
                "unknown scene `{}` (available: {})",
                config.demo.scene,
                names.join(", ")
            )
        })?;

    let stage = Stage::new(&config)?;
    info!(scene = scene.name(), "{}", scene.description());
    scene.play(&stage)?;

    report(&stage);
    Ok(())
}

/// Print what happened: every keyframe animation in start order, then where
/// the cards ended up.
fn report(stage: &Stage) {
    let doc = &stage.doc;
    println!("finished at t={}ms", doc.now());
    for animation in doc.animations() {
        let properties: Vec<_> = animation
            .effect
            .keyframes
            .iter()
            .flat_map(|frame| frame.properties.iter().map(|(name, _)| name.as_str()))
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        println!(
            "  {:>6.0}ms +{:<5.0} {:<10} {:<24} {:?}",
            animation.started_at,
            animation.effect.timing.duration_ms,
            format!("{:?}", animation.element),
            properties.join(","),
            animation.outcome,
        );
    }
    for (name, container) in stage.containers() {
        let children: Vec<_> = doc
            .children(container)
            .into_iter()
            .filter(|child| doc.is_connected(child))
            .map(|child| doc.text(child))
            .collect();
        println!("  {name:<6} [{}]", children.join(", "));
    }
}
