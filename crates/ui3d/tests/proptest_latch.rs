use proptest::prelude::*;
use raypanel_core::{
    ActivationContext, InteractiveRegistry, InteractiveTarget, SceneGraph, SimTick, Transform,
};
use raypanel_ui3d::dispatch;
use std::cell::Cell;
use std::rc::Rc;

fn rising_edges(presses: &[bool]) -> u32 {
    let mut previous = false;
    let mut edges = 0;
    for &pressed in presses {
        if pressed && !previous {
            edges += 1;
        }
        previous = pressed;
    }
    edges
}

proptest! {
    #[test]
    fn fires_once_per_press_while_hit(presses in proptest::collection::vec(any::<bool>(), 0..64)) {
        let mut scene = SceneGraph::new();
        let node = scene.spawn(scene.root(), "button", Transform::default());
        let fired = Rc::new(Cell::new(0u32));
        let counter = fired.clone();
        let mut registry = InteractiveRegistry::new();
        registry
            .register(InteractiveTarget::new(node, "button", move |_: &mut ActivationContext<'_>| {
                counter.set(counter.get() + 1);
            }))
            .unwrap();
        let mut log: Vec<String> = Vec::new();

        for (tick, &pressed) in presses.iter().enumerate() {
            dispatch(pressed, Some(node), pressed, &mut registry, &mut scene, &mut log, SimTick(tick as u64));
            // The latch mirrors the trigger while the target stays under the ray.
            prop_assert_eq!(registry.get(node).unwrap().state.clicked, pressed);
        }

        prop_assert_eq!(fired.get(), rising_edges(&presses));
    }

    #[test]
    fn misses_never_fire_or_clear(presses in proptest::collection::vec(any::<bool>(), 1..32)) {
        let mut scene = SceneGraph::new();
        let node = scene.spawn(scene.root(), "button", Transform::default());
        let mut registry = InteractiveRegistry::new();
        registry
            .register(InteractiveTarget::new(node, "button", |_: &mut ActivationContext<'_>| {}))
            .unwrap();
        registry.get_mut(node).unwrap().state.clicked = true;
        let mut log: Vec<String> = Vec::new();

        for (tick, &pressed) in presses.iter().enumerate() {
            dispatch(pressed, None, pressed, &mut registry, &mut scene, &mut log, SimTick(tick as u64));
        }

        prop_assert!(registry.get(node).unwrap().state.clicked);
        prop_assert!(log.is_empty());
    }
}
