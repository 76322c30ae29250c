//! Integration-style tests driving the Director with the crawler wiring.

use std::collections::HashMap;
use std::sync::Arc;

use mob_behavior::{
    CrawlerState, CrawlerTrigger, CrawlerTuning, crawler_wiring,
};
use mob_core::{AgentId, AgentWorld, CueId, GroupId, QueryFilter, Vec3, ZoneSet};
use mob_group::GroupEvent;

use crate::{Director, DirectorError, DirectorObserver, NoopObserver};

// ── Mock world ────────────────────────────────────────────────────────────────

struct MockWorld {
    positions: HashMap<AgentId, Vec3>,
    targets: HashMap<AgentId, AgentId>,
    teleport_on_move: bool,
    damage: Vec<(AgentId, f32)>,
}

impl MockWorld {
    fn new(teleport_on_move: bool) -> Self {
        Self {
            positions: HashMap::new(),
            targets: HashMap::new(),
            teleport_on_move,
            damage: Vec::new(),
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
    fn play_cue(&mut self, _agent: AgentId, _cue: CueId) {}
    fn apply_damage(&mut self, target: AgentId, amount: f32) {
        self.damage.push((target, amount));
    }
    fn heal(&mut self, _agent: AgentId, _amount: f32) {}
    fn health(&self, _agent: AgentId) -> Option<(f32, f32)> {
        Some((100.0, 100.0))
    }
    fn target_of(&self, agent: AgentId) -> Option<AgentId> {
        self.targets.get(&agent).copied()
    }
    fn set_mobile(&mut self, _agent: AgentId, _mobile: bool) {}
    fn deactivate(&mut self, agent: AgentId) {
        self.positions.remove(&agent);
    }
}

// ── Recording observer ────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    transitions:  Vec<(AgentId, CrawlerState, CrawlerState)>,
    group_events: Vec<(AgentId, GroupEvent)>,
    stale:        Vec<AgentId>,
    despawns:     Vec<AgentId>,
}

impl DirectorObserver<CrawlerState, CrawlerTrigger> for Recorder {
    fn on_transition(&mut self, agent: AgentId, from: CrawlerState, to: CrawlerState) {
        self.transitions.push((agent, from, to));
    }
    fn on_group_event(
        &mut self,
        agent: AgentId,
        event: GroupEvent,
        _mapped: Option<CrawlerTrigger>,
    ) {
        self.group_events.push((agent, event));
    }
    fn on_stale_handle(&mut self, agent: AgentId) {
        if !self.stale.contains(&agent) {
            self.stale.push(agent);
        }
    }
    fn on_despawn(&mut self, agent: AgentId) {
        self.despawns.push(agent);
    }
}

// ── Harness ───────────────────────────────────────────────────────────────────

const DT: f32 = 1.0 / 60.0;
const PLAYER: AgentId = AgentId(100);
const G: GroupId = GroupId(0);

fn map_crawler_event(event: GroupEvent) -> Option<CrawlerTrigger> {
    match event {
        GroupEvent::AmbushReady => Some(CrawlerTrigger::AmbushReady),
        GroupEvent::RelocateComplete => Some(CrawlerTrigger::RelocateDone),
    }
}

fn crawler_director(zones: ZoneSet) -> Director<CrawlerState, CrawlerTrigger> {
    let (table, behaviors) = crawler_wiring(&CrawlerTuning::default()).unwrap();
    Director::new(
        7,
        zones,
        Arc::clone(&table),
        behaviors,
        CrawlerState::Idle,
        map_crawler_event,
    )
    .unwrap()
}

fn run(
    director: &mut Director<CrawlerState, CrawlerTrigger>,
    world: &mut MockWorld,
    observer: &mut Recorder,
    secs: f32,
) {
    let steps = (secs / DT).ceil() as usize;
    for _ in 0..steps {
        director.tick(DT, world, observer).unwrap();
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn spawn_is_exclusive_and_despawn_unlinks() {
        let mut world = MockWorld::new(true);
        world.place(AgentId(0), Vec3::ZERO);
        let mut director = crawler_director(ZoneSet::default());
        let mut observer = Recorder::default();

        director.spawn(AgentId(0), &mut world).unwrap();
        assert!(matches!(
            director.spawn(AgentId(0), &mut world),
            Err(DirectorError::AgentExists(_))
        ));
        assert_eq!(director.state_of(AgentId(0)), Some(CrawlerState::Idle));

        director.create_group(G, Default::default()).unwrap();
        director.add_to_group(G, AgentId(0)).unwrap();

        director.despawn(AgentId(0), &mut world, &mut observer).unwrap();
        assert!(!director.is_spawned(AgentId(0)));
        assert_eq!(director.groups().group_of(AgentId(0)), None);
        assert_eq!(observer.despawns, vec![AgentId(0)]);
        assert!(matches!(
            director.despawn(AgentId(0), &mut world, &mut observer),
            Err(DirectorError::UnknownAgent(_))
        ));
    }

    #[test]
    fn operations_on_unknown_agents_are_errors() {
        let mut world = MockWorld::new(true);
        let mut director = crawler_director(ZoneSet::default());
        assert!(matches!(
            director.fire(AgentId(5), CrawlerTrigger::Die, &mut world, &mut NoopObserver),
            Err(DirectorError::UnknownAgent(_))
        ));
        director.create_group(G, Default::default()).unwrap();
        assert!(matches!(
            director.add_to_group(G, AgentId(5)),
            Err(DirectorError::UnknownAgent(_))
        ));
    }

    #[test]
    fn stale_handles_are_reported_not_fatal() {
        let mut world = MockWorld::new(true);
        world.place(AgentId(0), Vec3::ZERO);
        let mut director = crawler_director(ZoneSet::default());
        let mut observer = Recorder::default();
        director.spawn(AgentId(0), &mut world).unwrap();

        // Host removes the entity without telling the Director.
        world.positions.remove(&AgentId(0));
        run(&mut director, &mut world, &mut observer, 0.5);

        assert_eq!(observer.stale, vec![AgentId(0)]);
        assert!(director.is_spawned(AgentId(0)));
    }
}

// ── The hunt scenario end to end ──────────────────────────────────────────────

#[cfg(test)]
mod hunt_tests {
    use super::*;

    #[test]
    fn idle_chase_attack_with_one_hit_per_window() {
        let crawler = AgentId(0);
        let mut world = MockWorld::new(true);
        world.place(crawler, Vec3::ZERO);
        world.place(PLAYER, Vec3::new(10.0, 0.0, 0.0));
        let mut director = crawler_director(ZoneSet::default());
        let mut observer = Recorder::default();
        director.spawn(crawler, &mut world).unwrap();

        world.targets.insert(crawler, PLAYER);
        run(&mut director, &mut world, &mut observer, 1.5);

        assert_eq!(director.state_of(crawler), Some(CrawlerState::Attack));
        assert!(observer
            .transitions
            .contains(&(crawler, CrawlerState::Idle, CrawlerState::Chase)));
        assert!(observer
            .transitions
            .contains(&(crawler, CrawlerState::Chase, CrawlerState::Attack)));

        // 1.5 s covers the first activation window and most of its cooldown:
        // exactly one hit despite the target sitting in range throughout.
        assert_eq!(world.damage.len(), 1);
        assert_eq!(world.damage[0].0, PLAYER);
    }
}

// ── Group maneuvers through the Director ──────────────────────────────────────

#[cfg(test)]
mod group_tests {
    use super::*;

    fn grouped_setup(
        n: u32,
        teleport: bool,
        zones: ZoneSet,
    ) -> (MockWorld, Director<CrawlerState, CrawlerTrigger>, Vec<AgentId>) {
        let mut world = MockWorld::new(teleport);
        let members: Vec<AgentId> = (0..n).map(AgentId).collect();
        let mut director = crawler_director(zones);
        for &m in &members {
            world.place(m, Vec3::new(10.0 + m.0 as f32, 0.0, 10.0));
            director.spawn(m, &mut world).unwrap();
        }
        director.create_group(G, Default::default()).unwrap();
        for &m in &members {
            director.add_to_group(G, m).unwrap();
        }
        (world, director, members)
    }

    #[test]
    fn relocation_timeout_resolves_the_whole_group() {
        // Worst case: 4-member group, no reachable zones, nobody can move.
        // RelocateComplete must still arrive within the failsafe window.
        let (mut world, mut director, members) =
            grouped_setup(4, false, ZoneSet::default());
        let mut observer = Recorder::default();

        for &m in &members {
            director
                .fire(m, CrawlerTrigger::RelocateNow, &mut world, &mut observer)
                .unwrap();
            assert_eq!(director.state_of(m), Some(CrawlerState::Relocate));
        }

        run(&mut director, &mut world, &mut observer, 6.0);

        assert_eq!(observer.group_events.len(), 4);
        assert!(observer
            .group_events
            .iter()
            .all(|(_, e)| *e == GroupEvent::RelocateComplete));
        for &m in &members {
            assert_eq!(director.state_of(m), Some(CrawlerState::Idle));
        }
    }

    #[test]
    fn ambush_barrier_releases_members_into_swarm_together() {
        let (mut world, mut director, members) =
            grouped_setup(3, true, ZoneSet::default());
        let mut observer = Recorder::default();

        for &m in &members {
            director
                .fire(m, CrawlerTrigger::AmbushNow, &mut world, &mut observer)
                .unwrap();
        }

        run(&mut director, &mut world, &mut observer, 4.0);

        let releases: Vec<_> = observer
            .group_events
            .iter()
            .filter(|(_, e)| *e == GroupEvent::AmbushReady)
            .collect();
        assert_eq!(releases.len(), 3, "all members released together");
        for &m in &members {
            assert!(
                observer
                    .transitions
                    .contains(&(m, CrawlerState::Ambush, CrawlerState::Swarm)),
                "{m} never passed the barrier"
            );
        }
    }

    #[test]
    fn dead_member_leaves_queue_and_formation() {
        let (mut world, mut director, members) =
            grouped_setup(3, true, ZoneSet::default());
        let mut observer = Recorder::default();

        director
            .fire(members[0], CrawlerTrigger::Die, &mut world, &mut observer)
            .unwrap();
        assert_eq!(director.state_of(members[0]), Some(CrawlerState::Death));
        // Death unlinked the corpse; the next member is leader now.
        assert_eq!(director.groups().group_of(members[0]), None);
        assert_eq!(
            director.groups().cluster(G).unwrap().leader(),
            Some(members[1])
        );
    }
}
