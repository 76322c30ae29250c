//! Unit tests for mob-fsm.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use mob_core::{AgentId, AgentRng, AgentWorld, CueId, QueryFilter, Vec3, ZoneSet};
use mob_group::GroupRegistry;

use crate::{
    AgentStateMachine, Behavior, BehaviorCx, BehaviorRegistry, FsmError, FsmResult,
    TransitionTable,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

struct StubWorld;

impl AgentWorld for StubWorld {
    fn is_alive(&self, _agent: AgentId) -> bool {
        true
    }
    fn position(&self, _agent: AgentId) -> Option<Vec3> {
        Some(Vec3::ZERO)
    }
    fn move_to(&mut self, _agent: AgentId, _target: Vec3) {}
    fn stop(&mut self, _agent: AgentId) {}
    fn nearby(&self, _origin: Vec3, _radius: f32, _filter: QueryFilter) -> Vec<AgentId> {
        vec![]
    }
    fn play_cue(&mut self, _agent: AgentId, _cue: CueId) {}
    fn apply_damage(&mut self, _target: AgentId, _amount: f32) {}
    fn heal(&mut self, _agent: AgentId, _amount: f32) {}
    fn health(&self, _agent: AgentId) -> Option<(f32, f32)> {
        None
    }
    fn target_of(&self, _agent: AgentId) -> Option<AgentId> {
        None
    }
    fn set_mobile(&mut self, _agent: AgentId, _mobile: bool) {}
    fn deactivate(&mut self, _agent: AgentId) {}
}

const A: AgentId = AgentId(1);

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
enum S {
    Idle,
    Hunt,
    Dead,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
enum Tr {
    Spot,
    Lose,
    Die,
    Noise,
}

type Log = Rc<RefCell<Vec<String>>>;

/// Behavior that records every hook call, with optional scripted actions
/// performed from `on_enter`.
struct Probe {
    tag:         &'static str,
    log:         Log,
    enter_fire:  Option<Tr>,
    enter_timer: Option<(f32, Tr)>,
}

impl Probe {
    fn push(&self, what: &str) {
        self.log.borrow_mut().push(format!("{}:{what}", self.tag));
    }
}

impl Behavior<Tr> for Probe {
    fn on_enter(&mut self, cx: &mut BehaviorCx<'_, Tr>) {
        self.push("enter");
        if let Some((secs, trigger)) = self.enter_timer {
            cx.after("probe", secs, trigger);
        }
        if let Some(trigger) = self.enter_fire {
            cx.fire(trigger);
        }
    }
    fn on_exit(&mut self, _cx: &mut BehaviorCx<'_, Tr>) {
        self.push("exit");
    }
    fn tick(&mut self, _cx: &mut BehaviorCx<'_, Tr>, _dt: f32) {
        self.push("tick");
    }
}

fn table() -> TransitionTable<S, Tr> {
    TransitionTable::builder()
        .on(S::Idle, Tr::Spot, S::Hunt)
        .on(S::Hunt, Tr::Lose, S::Idle)
        .on(S::Idle, Tr::Die, S::Dead)
        .on(S::Hunt, Tr::Die, S::Dead)
        .on(S::Hunt, Tr::Noise, S::Hunt)
        .terminal(S::Dead)
        .build()
        .unwrap()
}

fn probes(log: &Log) -> BehaviorRegistry<S, Tr> {
    let mut reg = BehaviorRegistry::new();
    for (state, tag) in [(S::Idle, "idle"), (S::Hunt, "hunt"), (S::Dead, "dead")] {
        let log = log.clone();
        reg.register(state, move || Probe {
            tag,
            log: log.clone(),
            enter_fire: None,
            enter_timer: None,
        });
    }
    reg
}

struct Rig {
    world:   StubWorld,
    groups:  GroupRegistry,
    rng:     AgentRng,
    machine: AgentStateMachine<S, Tr>,
}

impl Rig {
    fn new(table: TransitionTable<S, Tr>, registry: &BehaviorRegistry<S, Tr>) -> Self {
        Self {
            world:   StubWorld,
            groups:  GroupRegistry::new(ZoneSet::default()),
            rng:     AgentRng::new(7, A),
            machine: AgentStateMachine::new(A, Arc::new(table), registry).unwrap(),
        }
    }

    fn init(&mut self, start: S) -> FsmResult<()> {
        self.machine
            .initialize(start, &mut self.world, &mut self.groups, &mut self.rng)
    }

    fn fire(&mut self, trigger: Tr) -> FsmResult<bool> {
        self.machine
            .fire(trigger, &mut self.world, &mut self.groups, &mut self.rng)
    }

    fn tick(&mut self, dt: f32) -> FsmResult<()> {
        self.machine
            .tick(dt, &mut self.world, &mut self.groups, &mut self.rng)
    }

    fn shutdown(&mut self) {
        self.machine
            .shutdown(&mut self.world, &mut self.groups, &mut self.rng);
    }
}

fn taken(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

// ── Table validation ──────────────────────────────────────────────────────────

#[cfg(test)]
mod table_tests {
    use super::*;

    #[test]
    fn duplicate_row_is_rejected() {
        let result = TransitionTable::builder()
            .on(S::Idle, Tr::Spot, S::Hunt)
            .on(S::Idle, Tr::Spot, S::Dead)
            .build();
        assert!(matches!(result, Err(FsmError::DuplicateTransition { .. })));
    }

    #[test]
    fn terminal_state_cannot_have_outgoing_rows() {
        let result = TransitionTable::<S, Tr>::builder()
            .on(S::Dead, Tr::Spot, S::Idle)
            .terminal(S::Dead)
            .build();
        assert!(matches!(result, Err(FsmError::TerminalOutgoing { .. })));
    }

    #[test]
    fn states_covers_sources_destinations_and_terminals() {
        let t = table();
        let states = t.states();
        assert!(states.contains(&S::Idle));
        assert!(states.contains(&S::Hunt));
        assert!(states.contains(&S::Dead));
        assert!(t.is_terminal(S::Dead));
        assert!(!t.is_terminal(S::Idle));
    }

    #[test]
    fn machine_creation_requires_full_behavior_coverage() {
        let log: Log = Log::default();
        let mut reg = BehaviorRegistry::new();
        let l = log.clone();
        reg.register(S::Idle, move || Probe {
            tag: "idle",
            log: l.clone(),
            enter_fire: None,
            enter_timer: None,
        });
        let result = AgentStateMachine::new(A, Arc::new(table()), &reg);
        assert!(matches!(result, Err(FsmError::MissingBehavior { .. })));
    }
}

// ── Transition discipline ─────────────────────────────────────────────────────

#[cfg(test)]
mod transition_tests {
    use super::*;

    #[test]
    fn exit_completes_before_enter() {
        let log: Log = Log::default();
        let mut rig = Rig::new(table(), &probes(&log));
        rig.init(S::Idle).unwrap();
        assert_eq!(taken(&log), vec!["idle:enter"]);

        rig.fire(Tr::Spot).unwrap();
        assert_eq!(taken(&log), vec!["idle:exit", "hunt:enter"]);
        assert_eq!(rig.machine.current(), Some(S::Hunt));
    }

    #[test]
    fn unknown_trigger_is_ignored_without_hooks() {
        let log: Log = Log::default();
        let mut rig = Rig::new(table(), &probes(&log));
        rig.init(S::Idle).unwrap();
        taken(&log);

        assert!(!rig.fire(Tr::Lose).unwrap());
        assert!(taken(&log).is_empty());
        assert_eq!(rig.machine.current(), Some(S::Idle));
    }

    #[test]
    fn self_transition_is_a_handled_noop() {
        let log: Log = Log::default();
        let mut rig = Rig::new(table(), &probes(&log));
        rig.init(S::Hunt).unwrap();
        taken(&log);

        assert!(rig.fire(Tr::Noise).unwrap());
        assert!(taken(&log).is_empty(), "self-transition must not exit/re-enter");
    }

    #[test]
    fn terminal_state_ignores_everything() {
        let log: Log = Log::default();
        let mut rig = Rig::new(table(), &probes(&log));
        rig.init(S::Idle).unwrap();
        rig.fire(Tr::Die).unwrap();
        taken(&log);

        for trigger in [Tr::Spot, Tr::Lose, Tr::Die, Tr::Noise] {
            assert!(!rig.fire(trigger).unwrap());
        }
        assert_eq!(rig.machine.current(), Some(S::Dead));
        assert!(taken(&log).is_empty());
    }

    #[test]
    fn fire_from_on_enter_is_applied_after_the_hook() {
        // Idle's on_enter fires Spot; the machine must finish entering Idle,
        // then transition to Hunt.
        let log: Log = Log::default();
        let mut reg = probes(&log);
        let l = log.clone();
        reg.register(S::Idle, move || Probe {
            tag: "idle",
            log: l.clone(),
            enter_fire: Some(Tr::Spot),
            enter_timer: None,
        });
        let mut rig = Rig::new(table(), &reg);
        rig.init(S::Idle).unwrap();
        assert_eq!(taken(&log), vec!["idle:enter", "idle:exit", "hunt:enter"]);
        assert_eq!(rig.machine.current(), Some(S::Hunt));
    }

    #[test]
    fn enter_fire_cycle_is_a_trigger_storm_error() {
        let log: Log = Log::default();
        let mut reg = probes(&log);
        let l1 = log.clone();
        reg.register(S::Idle, move || Probe {
            tag: "idle",
            log: l1.clone(),
            enter_fire: Some(Tr::Spot),
            enter_timer: None,
        });
        let l2 = log.clone();
        reg.register(S::Hunt, move || Probe {
            tag: "hunt",
            log: l2.clone(),
            enter_fire: Some(Tr::Lose),
            enter_timer: None,
        });
        let mut rig = Rig::new(table(), &reg);
        let err = rig.init(S::Idle).unwrap_err();
        assert!(matches!(err, FsmError::TriggerStorm { agent, .. } if agent == A));
    }

    #[test]
    fn lifecycle_misuse_is_an_error() {
        let log: Log = Log::default();
        let mut rig = Rig::new(table(), &probes(&log));
        assert!(matches!(rig.fire(Tr::Spot), Err(FsmError::NotInitialized(_))));
        rig.init(S::Idle).unwrap();
        assert!(matches!(rig.init(S::Idle), Err(FsmError::AlreadyInitialized(_))));
    }
}

// ── Tick and timers ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_tests {
    use super::*;

    #[test]
    fn only_the_active_behavior_ticks() {
        let log: Log = Log::default();
        let mut rig = Rig::new(table(), &probes(&log));
        rig.init(S::Idle).unwrap();
        taken(&log);

        rig.tick(0.1).unwrap();
        rig.tick(0.1).unwrap();
        assert_eq!(taken(&log), vec!["idle:tick", "idle:tick"]);
    }

    #[test]
    fn timers_are_cancelled_on_exit() {
        // Idle arms a 1 s Die timer on enter; leaving Idle before the
        // deadline must kill it, so the agent never dies.
        let log: Log = Log::default();
        let mut reg = probes(&log);
        let l = log.clone();
        reg.register(S::Idle, move || Probe {
            tag: "idle",
            log: l.clone(),
            enter_fire: None,
            enter_timer: Some((1.0, Tr::Die)),
        });
        let mut rig = Rig::new(table(), &reg);
        rig.init(S::Idle).unwrap();
        rig.fire(Tr::Spot).unwrap();

        for _ in 0..50 {
            rig.tick(0.1).unwrap();
        }
        assert_eq!(rig.machine.current(), Some(S::Hunt));
    }

    #[test]
    fn timer_transition_skips_the_exited_behaviors_tick() {
        // Idle arms a Spot timer shorter than the frame; the frame that
        // fires it must not also tick Idle (now exited) or Hunt (entered
        // mid-frame).
        let log: Log = Log::default();
        let mut reg = probes(&log);
        let l = log.clone();
        reg.register(S::Idle, move || Probe {
            tag: "idle",
            log: l.clone(),
            enter_fire: None,
            enter_timer: Some((0.5, Tr::Spot)),
        });
        let mut rig = Rig::new(table(), &reg);
        rig.init(S::Idle).unwrap();
        taken(&log);

        rig.tick(1.0).unwrap();
        assert_eq!(taken(&log), vec!["idle:exit", "hunt:enter"]);

        rig.tick(0.1).unwrap();
        assert_eq!(taken(&log), vec!["hunt:tick"]);
    }

    #[test]
    fn shutdown_runs_exit_and_clears_state() {
        let log: Log = Log::default();
        let mut rig = Rig::new(table(), &probes(&log));
        rig.init(S::Hunt).unwrap();
        taken(&log);

        rig.shutdown();
        assert_eq!(taken(&log), vec!["hunt:exit"]);
        assert_eq!(rig.machine.current(), None);

        // Idempotent.
        rig.shutdown();
        assert!(taken(&log).is_empty());
    }
}
