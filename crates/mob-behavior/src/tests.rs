//! Unit tests for mob-behavior.

use std::collections::HashMap;
use std::sync::Arc;

use mob_core::{AgentId, AgentRng, AgentWorld, CueId, QueryFilter, Vec3, Zone, ZoneId, ZoneSet};
use mob_fsm::{
    AgentStateMachine, Behavior, BehaviorCx, BehaviorRegistry, StateKind, TransitionTable,
    TriggerKind,
};
use mob_group::GroupRegistry;

use crate::crawler::{CrawlerState, CrawlerTrigger, CrawlerTuning, crawler_wiring};
use crate::drone::{DroneState, DroneTrigger, DroneTuning, drone_wiring};
use crate::recover::{Recover, RecoverTuning};

// ── Mock world ────────────────────────────────────────────────────────────────

/// Scriptable world recording every command the behaviors issue.
struct MockWorld {
    positions: HashMap<AgentId, Vec3>,
    targets: HashMap<AgentId, AgentId>,
    health: HashMap<AgentId, (f32, f32)>,
    teleport_on_move: bool,
    moves: Vec<(AgentId, Vec3)>,
    damage: Vec<(AgentId, f32)>,
    heals: Vec<f32>,
    cues: Vec<(AgentId, CueId)>,
    immobilized: Vec<AgentId>,
    deactivated: Vec<AgentId>,
}

impl MockWorld {
    fn new(teleport_on_move: bool) -> Self {
        Self {
            positions: HashMap::new(),
            targets: HashMap::new(),
            health: HashMap::new(),
            teleport_on_move,
            moves: Vec::new(),
            damage: Vec::new(),
            heals: Vec::new(),
            cues: Vec::new(),
            immobilized: Vec::new(),
            deactivated: Vec::new(),
        }
    }

    fn place(&mut self, agent: AgentId, pos: Vec3) {
        self.positions.insert(agent, pos);
    }
}

impl AgentWorld for MockWorld {
    fn is_alive(&self, agent: AgentId) -> bool {
        self.positions.contains_key(&agent)
    }
    fn position(&self, agent: AgentId) -> Option<Vec3> {
        self.positions.get(&agent).copied()
    }
    fn move_to(&mut self, agent: AgentId, target: Vec3) {
        self.moves.push((agent, target));
        if self.teleport_on_move && self.positions.contains_key(&agent) {
            self.positions.insert(agent, target);
        }
    }
    fn stop(&mut self, _agent: AgentId) {}
    fn nearby(&self, origin: Vec3, radius: f32, _filter: QueryFilter) -> Vec<AgentId> {
        self.positions
            .iter()
            .filter(|&(_, &p)| p.distance(origin) <= radius)
            .map(|(&a, _)| a)
            .collect()
    }
    fn play_cue(&mut self, agent: AgentId, cue: CueId) {
        self.cues.push((agent, cue));
    }
    fn apply_damage(&mut self, target: AgentId, amount: f32) {
        self.damage.push((target, amount));
        if let Some((current, _)) = self.health.get_mut(&target) {
            *current -= amount;
        }
    }
    fn heal(&mut self, agent: AgentId, amount: f32) {
        self.heals.push(amount);
        if let Some((current, max)) = self.health.get_mut(&agent) {
            *current = (*current + amount).min(*max);
        }
    }
    fn health(&self, agent: AgentId) -> Option<(f32, f32)> {
        self.health.get(&agent).copied()
    }
    fn target_of(&self, agent: AgentId) -> Option<AgentId> {
        self.targets.get(&agent).copied()
    }
    fn set_mobile(&mut self, agent: AgentId, mobile: bool) {
        if !mobile {
            self.immobilized.push(agent);
        }
    }
    fn deactivate(&mut self, agent: AgentId) {
        self.deactivated.push(agent);
    }
}

// ── Harness ───────────────────────────────────────────────────────────────────

const DT: f32 = 1.0 / 60.0;

struct Rig<S: StateKind, T: TriggerKind> {
    world: MockWorld,
    groups: GroupRegistry,
    rng: AgentRng,
    machine: AgentStateMachine<S, T>,
}

impl<S: StateKind, T: TriggerKind> Rig<S, T> {
    fn new(
        agent: AgentId,
        table: Arc<TransitionTable<S, T>>,
        registry: &BehaviorRegistry<S, T>,
        zones: ZoneSet,
        world: MockWorld,
    ) -> Self {
        Self {
            world,
            groups: GroupRegistry::new(zones),
            rng: AgentRng::new(42, agent),
            machine: AgentStateMachine::new(agent, table, registry).unwrap(),
        }
    }

    fn init(&mut self, start: S) {
        self.machine
            .initialize(start, &mut self.world, &mut self.groups, &mut self.rng)
            .unwrap();
    }

    fn fire(&mut self, trigger: T) -> bool {
        self.machine
            .fire(trigger, &mut self.world, &mut self.groups, &mut self.rng)
            .unwrap()
    }

    fn run(&mut self, secs: f32) {
        let steps = (secs / DT).ceil() as usize;
        for _ in 0..steps {
            self.machine
                .tick(DT, &mut self.world, &mut self.groups, &mut self.rng)
                .unwrap();
        }
    }

    /// Tick until the machine reaches `state`, panicking past `max_secs`.
    fn run_until(&mut self, state: S, max_secs: f32) {
        let steps = (max_secs / DT).ceil() as usize;
        for _ in 0..steps {
            if self.machine.current() == Some(state) {
                return;
            }
            self.machine
                .tick(DT, &mut self.world, &mut self.groups, &mut self.rng)
                .unwrap();
        }
        panic!("never reached {state:?}, stuck in {:?}", self.machine.current());
    }
}

const CRAWLER: AgentId = AgentId(0);
const PLAYER: AgentId = AgentId(100);

fn crawler_rig(world: MockWorld, zones: ZoneSet) -> Rig<CrawlerState, CrawlerTrigger> {
    let (table, registry) = crawler_wiring(&CrawlerTuning::default()).unwrap();
    Rig::new(CRAWLER, table, &registry, zones, world)
}

// ── Wiring validation ─────────────────────────────────────────────────────────

#[cfg(test)]
mod wiring_tests {
    use super::*;

    #[test]
    fn crawler_wiring_builds_and_validates() {
        let (table, _) = crawler_wiring(&CrawlerTuning::default()).unwrap();
        assert!(table.is_terminal(CrawlerState::Death));
        assert_eq!(
            table.next(CrawlerState::Idle, CrawlerTrigger::SeeTarget),
            Some(CrawlerState::Chase)
        );
        assert_eq!(table.next(CrawlerState::Idle, CrawlerTrigger::Recovered), None);
    }

    #[test]
    fn drone_wiring_builds_and_validates() {
        let (table, _) = drone_wiring(&DroneTuning::default()).unwrap();
        assert!(table.is_terminal(DroneState::Death));
        assert_eq!(
            table.next(DroneState::Patrol, DroneTrigger::SeeTarget),
            Some(DroneState::Chase)
        );
    }
}

// ── The Idle → Chase → Attack scenario ────────────────────────────────────────

#[cfg(test)]
mod attack_scenario_tests {
    use super::*;

    fn hunting_rig() -> Rig<CrawlerState, CrawlerTrigger> {
        let mut world = MockWorld::new(true);
        world.place(CRAWLER, Vec3::ZERO);
        world.place(PLAYER, Vec3::new(10.0, 0.0, 0.0));
        crawler_rig(world, ZoneSet::default())
    }

    #[test]
    fn idle_spots_target_and_escalates_to_attack() {
        let mut rig = hunting_rig();
        rig.init(CrawlerState::Idle);
        assert_eq!(rig.machine.current(), Some(CrawlerState::Idle));

        // Perception hands the crawler its target; Idle fires the sighting.
        rig.world.targets.insert(CRAWLER, PLAYER);
        rig.run_until(CrawlerState::Chase, 1.0);

        // The teleporting world arrives instantly at the approach point.
        rig.run_until(CrawlerState::Attack, 1.0);
        let pos = rig.world.position(CRAWLER).unwrap();
        let target = rig.world.position(PLAYER).unwrap();
        assert!(pos.distance_xz(target) <= 2.4, "stopped at standoff range");
    }

    #[test]
    fn exactly_one_hit_per_activation_window() {
        let mut rig = hunting_rig();
        rig.init(CrawlerState::Idle);
        rig.world.targets.insert(CRAWLER, PLAYER);
        rig.run_until(CrawlerState::Attack, 2.0);

        // Target stays in range every tick of the window; the one-shot guard
        // still limits the window to a single application.
        rig.run(0.5);
        assert_eq!(rig.world.damage.len(), 1);
        assert_eq!(rig.world.damage[0].0, PLAYER);
        assert_eq!(rig.world.cues.len(), 1, "one cue per window");

        // Cooldown: still no second hit.
        rig.run(1.0);
        assert_eq!(rig.world.damage.len(), 1);

        // Next window opens and lands exactly one more.
        rig.run(1.5);
        assert_eq!(rig.world.damage.len(), 2);
    }

    #[test]
    fn chase_gives_up_beyond_lose_distance() {
        let mut rig = hunting_rig();
        rig.init(CrawlerState::Idle);
        rig.world.targets.insert(CRAWLER, PLAYER);
        rig.run_until(CrawlerState::Chase, 1.0);

        // Target blinks far away and perception drops it; one tick of Chase
        // fires the loss.
        rig.world.place(PLAYER, Vec3::new(500.0, 0.0, 0.0));
        rig.world.targets.remove(&CRAWLER);
        rig.run(0.01);
        assert_eq!(rig.machine.current(), Some(CrawlerState::Idle));
    }
}

// ── Flee and recovery ─────────────────────────────────────────────────────────

#[cfg(test)]
mod flee_recover_tests {
    use super::*;

    #[test]
    fn low_health_retreats_to_pocket_then_recovers() {
        let mut world = MockWorld::new(true);
        world.place(CRAWLER, Vec3::new(5.0, 0.0, 0.0));
        world.health.insert(CRAWLER, (20.0, 100.0));
        let mut rig = crawler_rig(world, ZoneSet::default());
        rig.init(CrawlerState::Idle);

        assert!(rig.fire(CrawlerTrigger::LowHealth));
        assert_eq!(rig.machine.current(), Some(CrawlerState::Flee));

        // Default pocket is the origin; the teleporting world arrives on the
        // first move command.
        rig.run_until(CrawlerState::Recover, 2.0);
        rig.run_until(CrawlerState::Idle, 10.0);

        let (current, _) = rig.world.health(CRAWLER).unwrap();
        assert!((current - 80.0).abs() < 0.01, "healed to the threshold, got {current}");
    }

    #[test]
    fn stuck_flee_resolves_through_the_failsafe() {
        let mut world = MockWorld::new(false); // move_to does nothing
        world.place(CRAWLER, Vec3::new(50.0, 0.0, 0.0));
        world.health.insert(CRAWLER, (20.0, 100.0));
        let mut rig = crawler_rig(world, ZoneSet::default());
        rig.init(CrawlerState::Flee);

        // Never arrives, but the guard forces the transition well before the
        // hard timeout plus slack.
        rig.run_until(CrawlerState::Recover, 12.0);
    }
}

#[cfg(test)]
mod recover_tests {
    use super::*;

    #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
    enum RS {
        Rest,
        Done,
    }
    #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
    enum RT {
        Recovered,
    }

    struct Still;
    impl Behavior<RT> for Still {
        fn tick(&mut self, _cx: &mut BehaviorCx<'_, RT>, _dt: f32) {}
    }

    #[test]
    fn heal_deltas_shrink_and_never_overshoot() {
        // Rate 0.1, max 100, start 50, target fraction 0.8.
        let table = Arc::new(
            TransitionTable::builder()
                .on(RS::Rest, RT::Recovered, RS::Done)
                .terminal(RS::Done)
                .build()
                .unwrap(),
        );
        let mut registry = BehaviorRegistry::new();
        registry.register(RS::Rest, || {
            Recover::new(RecoverTuning { rate_per_sec: 0.1, target_frac: 0.8 }, RT::Recovered)
        });
        registry.register(RS::Done, || Still);

        let mut world = MockWorld::new(true);
        world.place(CRAWLER, Vec3::ZERO);
        world.health.insert(CRAWLER, (50.0, 100.0));
        let mut rig = Rig::new(CRAWLER, table, &registry, ZoneSet::default(), world);
        rig.init(RS::Rest);

        let dt = 0.25;
        for _ in 0..2000 {
            rig.machine
                .tick(dt, &mut rig.world, &mut rig.groups, &mut rig.rng)
                .unwrap();
            let (current, _) = rig.world.health(CRAWLER).unwrap();
            assert!(current <= 80.0 + 1e-4, "overshot to {current}");
            if rig.machine.current() == Some(RS::Done) {
                break;
            }
        }
        assert_eq!(rig.machine.current(), Some(RS::Done));

        // Exponential approach: every step heals strictly less than the one
        // before (the deficit only shrinks).
        for pair in rig.world.heals.windows(2) {
            assert!(pair[1] < pair[0], "deltas not decreasing: {pair:?}");
        }
    }
}

// ── Relocation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod relocate_tests {
    use super::*;

    fn two_zone_layout() -> ZoneSet {
        ZoneSet::new(vec![
            Zone::new(Vec3::ZERO, 10.0),
            Zone::new(Vec3::new(100.0, 0.0, 0.0), 10.0),
        ])
    }

    #[test]
    fn solo_relocation_moves_to_the_other_zone() {
        let mut world = MockWorld::new(true);
        world.place(CRAWLER, Vec3::ZERO);
        let mut rig = crawler_rig(world, two_zone_layout());
        rig.groups.assign_zone(CRAWLER, ZoneId(0));
        rig.init(CrawlerState::Idle);

        assert!(rig.fire(CrawlerTrigger::RelocateNow));
        assert_eq!(rig.machine.current(), Some(CrawlerState::Relocate));
        rig.run_until(CrawlerState::Idle, 2.0);

        assert_eq!(rig.groups.zone_assignment(CRAWLER), Some(ZoneId(1)));
        let pos = rig.world.position(CRAWLER).unwrap();
        assert!(two_zone_layout().get(ZoneId(1)).unwrap().contains(pos));
    }

    #[test]
    fn relocation_with_no_alternative_resolves_immediately() {
        let mut world = MockWorld::new(true);
        world.place(CRAWLER, Vec3::ZERO);
        let single_zone = ZoneSet::new(vec![Zone::new(Vec3::ZERO, 10.0)]);
        let mut rig = crawler_rig(world, single_zone);
        rig.groups.assign_zone(CRAWLER, ZoneId(0));
        rig.init(CrawlerState::Idle);

        assert!(rig.fire(CrawlerTrigger::RelocateNow));
        // The queued done trigger resolves the transition inside the fire.
        assert_eq!(rig.machine.current(), Some(CrawlerState::Idle));
        assert_eq!(rig.groups.zone_assignment(CRAWLER), Some(ZoneId(0)));
    }
}

// ── Death ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod death_tests {
    use super::*;

    #[test]
    fn death_immobilizes_cues_and_deactivates_on_schedule() {
        let mut world = MockWorld::new(true);
        world.place(CRAWLER, Vec3::ZERO);
        let mut rig = crawler_rig(world, ZoneSet::default());
        rig.init(CrawlerState::Idle);

        assert!(rig.fire(CrawlerTrigger::Die));
        assert_eq!(rig.machine.current(), Some(CrawlerState::Death));
        assert_eq!(rig.world.immobilized, vec![CRAWLER]);
        assert!(rig.world.deactivated.is_empty());

        rig.run(0.3);
        assert_eq!(rig.world.cues.len(), 1);
        rig.run(2.5);
        assert_eq!(rig.world.deactivated, vec![CRAWLER]);

        // Terminal: nothing moves it again.
        assert!(!rig.fire(CrawlerTrigger::SeeTarget));
        assert_eq!(rig.machine.current(), Some(CrawlerState::Death));
    }
}

// ── Drone volley ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod volley_tests {
    use super::*;

    const DRONE: AgentId = AgentId(1);

    #[test]
    fn volley_fires_a_burst_then_cools_down() {
        let (table, registry) = drone_wiring(&DroneTuning::default()).unwrap();
        let mut world = MockWorld::new(true);
        world.place(DRONE, Vec3::ZERO);
        world.place(PLAYER, Vec3::new(5.0, 0.0, 0.0));
        world.targets.insert(DRONE, PLAYER);
        let mut rig = Rig::new(DRONE, table, &registry, ZoneSet::default(), world);
        rig.init(DroneState::Attack);

        // Three shots spaced inside the burst window.
        rig.run(1.0);
        assert_eq!(rig.world.damage.len(), 3);
        assert!(rig.world.damage.iter().all(|&(t, d)| t == PLAYER && d == 4.0));
        assert_eq!(rig.world.cues.len(), 1, "one cue per volley");

        // Cooldown holds fire, then the next volley lands three more.
        rig.run(2.0);
        assert_eq!(rig.world.damage.len(), 6);
    }

    #[test]
    fn out_of_range_shots_fizzle() {
        let (table, registry) = drone_wiring(&DroneTuning::default()).unwrap();
        let mut world = MockWorld::new(false);
        world.place(DRONE, Vec3::ZERO);
        world.place(PLAYER, Vec3::new(50.0, 0.0, 0.0));
        world.targets.insert(DRONE, PLAYER);
        let mut rig = Rig::new(DRONE, table, &registry, ZoneSet::default(), world);
        rig.init(DroneState::Attack);

        rig.run(1.0);
        assert!(rig.world.damage.is_empty(), "shots past range must not land");
    }
}
