use mappo_core::{Timeline, MAX_CYCLE};
use mappo_sim::{CycleCoordinator, PlaybackRunner, VirtualClock};
use proptest::prelude::*;

proptest! {
    #[test]
    fn resolve_is_deterministic(cycle in 0u32..=MAX_CYCLE) {
        let timeline = Timeline::india();
        prop_assert_eq!(timeline.resolve(cycle), timeline.resolve(cycle));
    }

    #[test]
    fn scores_stay_in_unit_interval(cycle in 0u32..=MAX_CYCLE) {
        let snapshot = Timeline::india().resolve(cycle);
        for score in &snapshot.scores {
            prop_assert!((0.0..=1.0).contains(&score.probability), "{}-{} = {}", score.a, score.b, score.probability);
        }
    }

    #[test]
    fn baseline_holds_before_first_regime(cycle in 0u32..40) {
        let timeline = Timeline::india();
        let snapshot = timeline.resolve(cycle);
        for entity in &timeline.registry().entities {
            prop_assert_eq!(snapshot.status_of(&entity.id), Some(entity.status));
        }
        prop_assert_eq!(snapshot.broken_links().count(), 0);
    }

    #[test]
    fn events_are_a_prefix_of_the_script(cycle in 0u32..=MAX_CYCLE) {
        let timeline = Timeline::india();
        let snapshot = timeline.resolve(cycle);
        let expected: Vec<_> = timeline
            .registry()
            .events
            .iter()
            .take_while(|e| e.cycle <= cycle)
            .cloned()
            .collect();
        prop_assert_eq!(&snapshot.events, &expected);
    }

    #[test]
    fn monsoon_failure_visible_through_drought_onset(cycle in 42u32..=47) {
        let snapshot = Timeline::india().resolve(cycle);
        prop_assert!(snapshot.is_event_visible("11"));
        prop_assert!(snapshot.events.iter().all(|e| e.cycle <= cycle));
    }

    #[test]
    fn jump_clamps_any_input(raw in any::<i64>()) {
        let mut coordinator = CycleCoordinator::default();
        let cycle = coordinator.jump_to(raw);
        prop_assert!(cycle <= MAX_CYCLE);
        prop_assert_eq!(coordinator.snapshot().cycle, cycle);
    }

    #[test]
    fn ticking_never_passes_last_cycle(start in 0i64..=100, ticks in 0usize..250) {
        let mut coordinator = CycleCoordinator::default();
        coordinator.jump_to(start);
        coordinator.play();
        for _ in 0..ticks {
            coordinator.tick();
        }
        prop_assert!(coordinator.cycle() <= MAX_CYCLE);
        if start as usize + ticks > MAX_CYCLE as usize {
            prop_assert_eq!(coordinator.cycle(), MAX_CYCLE);
            prop_assert!(!coordinator.is_playing());
        }
    }

    #[test]
    fn reset_from_anywhere(start in 0i64..=100, select in proptest::bool::ANY) {
        let mut coordinator = CycleCoordinator::default();
        coordinator.jump_to(start);
        coordinator.play();
        if select {
            coordinator.select("RJ").unwrap();
        }
        coordinator.reset();
        prop_assert_eq!(coordinator.cycle(), 0);
        prop_assert!(!coordinator.is_playing());
        prop_assert!(coordinator.selected().is_none());
    }
}

#[test]
fn registries_validate_cleanly() {
    let report = Timeline::india().validate();
    assert!(report.is_clean(), "{}", report);
}

#[test]
fn speed_does_not_change_frames() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let collect = |speed: u32| {
        runtime.block_on(async {
            let mut coordinator = CycleCoordinator::default();
            coordinator.set_speed(speed);
            let runner = PlaybackRunner::new(VirtualClock::shared(0));
            let mut frames = Vec::new();
            runner.run(&mut coordinator, |s| frames.push(s.clone())).await;
            frames
        })
    };

    assert_eq!(collect(1), collect(5));
}
