use anyhow::Result;
use boardfx_dom::{Document, MemoryDocument, NodeId, RecordedAnimation};
use boardfx_engine::display::{MESSAGE_CLASS, SCORING_CLASS};
use boardfx_engine::space::FILLING_SPACE_CLASS;
use boardfx_engine::surface::WRAPPER_CLASS;
use boardfx_engine::{
    AnimationError, AnimationManager, AnimationSettings, InstantaneousFlag, LegSettings,
    SequenceLeg,
};
use boardfx_geometry::Transform2D;

type Manager = AnimationManager<MemoryDocument, InstantaneousFlag>;

struct Board {
    doc: MemoryDocument,
    manager: Manager,
    from: NodeId,
    to: NodeId,
    card: NodeId,
}

/// Two 50x50 containers at (100, 100) and (300, 100), a card in the first.
fn board() -> Result<Board> {
    let doc = MemoryDocument::new();
    let manager = AnimationManager::new(doc.clone(), InstantaneousFlag::default())?;
    let from = doc.create_in(doc.body(), "div", 50.0, 50.0);
    doc.set_position(from, 100.0, 100.0);
    let to = doc.create_in(doc.body(), "div", 50.0, 50.0);
    doc.set_position(to, 300.0, 100.0);
    let card = doc.create_in(from, "div", 50.0, 50.0);
    Ok(Board {
        doc,
        manager,
        from,
        to,
        card,
    })
}

/// Primary wrapper motions, in start order.
fn wrapper_motions(doc: &MemoryDocument) -> Vec<RecordedAnimation> {
    doc.animations()
        .into_iter()
        .filter(|a| {
            a.effect.keyframes.len() == 2 && a.effect.keyframes[0].get("transform").is_some()
        })
        .collect()
}

fn top_wrappers(doc: &MemoryDocument, manager: &Manager) -> Vec<NodeId> {
    doc.children(*manager.surface().root())
}

#[test]
fn slide_and_attach_moves_card_between_containers() -> Result<()> {
    let Board {
        doc,
        manager,
        from,
        to,
        card,
    } = board()?;

    let probe = async {
        let at_start = top_wrappers(&doc, &manager)
            .first()
            .map(|wrapper| doc.bounding_rect(wrapper).center());
        doc.sleep(250.0).await;
        (
            at_start,
            top_wrappers(&doc, &manager).len(),
            doc.find_by_class(FILLING_SPACE_CLASS).len(),
        )
    };
    let (result, (at_start, wrappers, spaces)) = doc.run(async {
        futures::join!(manager.slide_and_attach(&card, &to, None, None), probe)
    })?;
    result?;

    let (x, y) = at_start.expect("wrapper on the surface at start");
    assert!((x - 125.0).abs() < 1e-9 && (y - 125.0).abs() < 1e-9);
    assert_eq!(wrappers, 1);
    assert_eq!(spaces, 2, "one growing and one shrinking space");

    assert_eq!(doc.now(), 500.0);
    assert_eq!(doc.parent(&card), Some(to));
    assert!(doc.children(from).is_empty());
    assert!(doc.find_by_class(WRAPPER_CLASS).is_empty());
    assert!(doc.find_by_class(FILLING_SPACE_CLASS).is_empty());

    let motions = wrapper_motions(&doc);
    assert_eq!(motions.len(), 1);
    let frames = &motions[0].effect.keyframes;
    assert_eq!(
        frames[0].get("transform"),
        Some(Transform2D::translate(125.0, 125.0).to_css().as_str())
    );
    assert_eq!(
        frames[1].get("transform"),
        Some(Transform2D::translate(325.0, 125.0).to_css().as_str())
    );
    // the bump runs beside the motion and peaks at 1.2 halfway
    let peak = doc
        .animations()
        .iter()
        .find_map(|a| {
            a.effect
                .keyframe_at(0.5)
                .and_then(|frame| frame.get("transform"))
                .map(str::to_string)
        })
        .expect("bump keyframe at the midpoint");
    assert!(peak.ends_with("scale(1.2)"), "{peak}");
    Ok(())
}

#[test]
fn swap_exchanges_slots() -> Result<()> {
    let doc = MemoryDocument::new();
    let manager = AnimationManager::new(doc.clone(), InstantaneousFlag::default())?;
    let left = doc.create_in(doc.body(), "div", 200.0, 50.0);
    doc.set_position(left, 0.0, 0.0);
    let right = doc.create_in(doc.body(), "div", 200.0, 50.0);
    doc.set_position(right, 0.0, 300.0);
    let a = doc.create_in(left, "div", 40.0, 50.0);
    let a2 = doc.create_in(left, "div", 40.0, 50.0);
    let b0 = doc.create_in(right, "div", 40.0, 50.0);
    let b = doc.create_in(right, "div", 40.0, 50.0);

    // Halfway through, each element's slot is held by a fixed space.
    let probe = async {
        doc.sleep(250.0).await;
        let slot_holders = |parent: NodeId| -> Vec<bool> {
            doc.children(parent)
                .iter()
                .map(|child| doc.has_class(child, FILLING_SPACE_CLASS))
                .collect()
        };
        (slot_holders(left), slot_holders(right))
    };
    let pair = [a, b];
    let (result, (left_mid, right_mid)) =
        doc.run(async { futures::join!(manager.swap(&pair, None), probe) })?;
    result?;

    assert_eq!(left_mid, vec![true, false]);
    assert_eq!(right_mid, vec![false, true]);
    assert_eq!(doc.children(left), vec![b, a2]);
    assert_eq!(doc.children(right), vec![b0, a]);
    assert_eq!(doc.now(), 500.0);
    assert!(doc.find_by_class(FILLING_SPACE_CLASS).is_empty());
    assert!(top_wrappers(&doc, &manager).is_empty());
    assert_eq!(wrapper_motions(&doc).len(), 2);
    Ok(())
}

#[test]
fn scoring_label_floats_then_disappears() -> Result<()> {
    let doc = MemoryDocument::new();
    let manager = AnimationManager::new(doc.clone(), InstantaneousFlag::default())?;
    let player = doc.create_in(doc.body(), "div", 100.0, 40.0);
    doc.set_position(player, 20.0, 20.0);

    let probe = async {
        doc.sleep(1000.0).await;
        doc.find_by_class(SCORING_CLASS)
            .first()
            .map(|label| (doc.text(*label), doc.style(label, "color")))
    };
    let (result, seen) = doc.run(async {
        futures::join!(manager.display_scoring(&player, -3, "ff0000", None), probe)
    })?;
    result?;

    assert_eq!(
        seen,
        Some(("-3".to_string(), Some("#ff0000".to_string())))
    );
    assert_eq!(doc.now(), 2000.0);
    assert!(doc.find_by_class(SCORING_CLASS).is_empty());
    Ok(())
}

#[test]
fn instantaneous_mode_applies_final_state() -> Result<()> {
    let Board {
        doc,
        manager,
        to,
        card,
        ..
    } = board()?;
    manager.game().set(true);

    pollster::block_on(manager.slide_and_attach(&card, &to, None, None))?;
    assert_eq!(doc.parent(&card), Some(to));
    assert!(doc.animations().is_empty());
    assert!(top_wrappers(&doc, &manager).is_empty());

    pollster::block_on(manager.display_message(&to, "hello", None))?;
    assert!(doc.find_by_class(MESSAGE_CLASS).is_empty());
    Ok(())
}

#[test]
fn screen_center_sequence_chains_legs() -> Result<()> {
    let Board {
        doc,
        manager,
        to,
        card,
        ..
    } = board()?;
    doc.set_viewport(1000.0, 600.0);

    doc.run(manager.slide_to_screen_center_and_attach(&card, &to, LegSettings::Default, None))??;

    assert_eq!(doc.now(), 1000.0);
    assert_eq!(doc.parent(&card), Some(to));
    let motions = wrapper_motions(&doc);
    assert_eq!(motions.len(), 2);
    let center = Transform2D::translate(500.0, 300.0).to_css();
    assert_eq!(motions[0].effect.keyframes[1].get("transform"), Some(center.as_str()));
    assert_eq!(motions[1].effect.keyframes[0].get("transform"), Some(center.as_str()));
    assert_eq!(motions[1].started_at, 500.0);

    let spaces: Vec<_> = doc
        .animations()
        .into_iter()
        .filter(|a| doc.has_class(&a.element, FILLING_SPACE_CLASS))
        .collect();
    assert_eq!(spaces.len(), 2);
    let shrink = spaces
        .iter()
        .find(|a| doc.has_class(&a.element, "boardfx-filling-space-shrink"))
        .expect("shrink space");
    let grow = spaces
        .iter()
        .find(|a| doc.has_class(&a.element, "boardfx-filling-space-grow"))
        .expect("grow space");
    assert_eq!(shrink.started_at, 0.0);
    assert_eq!(grow.started_at, 500.0);
    Ok(())
}

#[test]
fn shared_settings_sequence_spaces_bracket_the_legs() -> Result<()> {
    let Board {
        doc,
        manager,
        to,
        card,
        ..
    } = board()?;
    let marker = doc.create_in(doc.body(), "div", 20.0, 20.0);
    doc.set_position(marker, 600.0, 400.0);
    let legs = [
        SequenceLeg::ScreenCenter,
        SequenceLeg::OverElement(marker),
        SequenceLeg::Destination,
    ];
    let shared = AnimationSettings::new().duration(300.0);

    let spaces = |kind: &str| doc.find_by_class(&format!("{FILLING_SPACE_CLASS}-{kind}")).len();
    let probe = async {
        let mut seen = Vec::new();
        for delay in [150.0, 300.0, 300.0] {
            doc.sleep(delay).await;
            seen.push((spaces("shrink"), spaces("grow")));
        }
        seen
    };
    let (result, seen) = doc.run(async {
        futures::join!(
            manager.sequence_animations_attach(
                &card,
                &to,
                &legs,
                LegSettings::Shared(&shared),
                None
            ),
            probe
        )
    })?;
    result?;

    // (shrink, grow) during legs 0, 1 and 2
    assert_eq!(seen, vec![(1, 0), (0, 0), (0, 1)]);
    assert_eq!(doc.now(), 900.0);
    assert_eq!(doc.parent(&card), Some(to));
    assert!(doc.find_by_class(FILLING_SPACE_CLASS).is_empty());

    let motions = wrapper_motions(&doc);
    assert_eq!(motions.len(), 3);
    assert!(motions.iter().all(|m| m.effect.timing.duration_ms == 300.0));
    for pair in motions.windows(2) {
        assert_eq!(
            pair[0].effect.keyframes[1].get("transform"),
            pair[1].effect.keyframes[0].get("transform")
        );
    }
    Ok(())
}

#[test]
fn sequence_with_pause_and_explicit_matrix() -> Result<()> {
    let Board {
        doc,
        manager,
        to,
        card,
        ..
    } = board()?;
    let waypoint = Transform2D::translate(50.0, 400.0).then(&Transform2D::rotate_deg(45.0));
    let legs = [
        SequenceLeg::Matrix(waypoint),
        SequenceLeg::Pause(200.0),
        SequenceLeg::Destination,
    ];

    doc.run(manager.sequence_animations_attach(&card, &to, &legs, LegSettings::Default, None))??;

    assert_eq!(doc.now(), 1200.0);
    let motions = wrapper_motions(&doc);
    assert_eq!(motions.len(), 3);
    let held = waypoint.to_css();
    assert_eq!(motions[1].effect.keyframes[0].get("transform"), Some(held.as_str()));
    assert_eq!(motions[1].effect.keyframes[1].get("transform"), Some(held.as_str()));
    assert_eq!(motions[1].effect.timing.duration_ms, 200.0);
    assert_eq!(doc.parent(&card), Some(to));
    Ok(())
}

#[test]
fn sequence_arguments_are_validated_first() -> Result<()> {
    let Board {
        doc,
        manager,
        to,
        card,
        from,
    } = board()?;
    manager.game().set(true);

    let err = pollster::block_on(manager.sequence_animations_attach(
        &card,
        &to,
        &[],
        LegSettings::Default,
        None,
    ))
    .unwrap_err();
    assert!(matches!(err, AnimationError::InvalidArgument(_)));

    let one = [AnimationSettings::new()];
    let err = pollster::block_on(manager.slide_to_element_and_attach(
        &card,
        &from,
        &to,
        LegSettings::PerLeg(&one),
        None,
    ))
    .unwrap_err();
    assert!(matches!(err, AnimationError::InvalidArgument(_)));
    assert_eq!(doc.parent(&card), Some(from));
    Ok(())
}
