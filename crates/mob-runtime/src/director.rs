//! `Director` — owns every session-lifetime object and drives the frame.
//!
//! Tick order is fixed: clock, coordinator (group movement + events), group
//! event delivery, then per-agent machine ticks in `AgentId` order.  Agents
//! never observe each other mid-frame except through the registry, so the
//! iteration order is a determinism convenience, not a correctness
//! requirement.

use std::collections::BTreeMap;
use std::sync::Arc;

use mob_core::{AgentId, AgentRng, AgentWorld, FrameClock, GroupId, ZoneId, ZoneSet};
use mob_fsm::{AgentStateMachine, BehaviorRegistry, StateKind, TransitionTable, TriggerKind};
use mob_group::{ClusterCoordinator, ClusterTuning, GroupEvent, GroupRegistry};

use crate::observer::DirectorObserver;
use crate::{DirectorError, DirectorResult};

/// Maps coordination outcomes onto the agent kind's trigger enum.  Return
/// `None` to drop an event the kind doesn't care about.
pub type EventMap<T> = fn(GroupEvent) -> Option<T>;

struct AgentSlot<S: StateKind, T: TriggerKind> {
    machine: AgentStateMachine<S, T>,
    rng:     AgentRng,
}

/// Session orchestrator for one agent kind.
///
/// Hosts running several kinds (crawlers and drones) run one Director per
/// kind; they may share the world but each owns its own groups and seed
/// stream.
pub struct Director<S: StateKind, T: TriggerKind> {
    table:        Arc<TransitionTable<S, T>>,
    behaviors:    BehaviorRegistry<S, T>,
    start:        S,
    map_event:    EventMap<T>,
    session_seed: u64,
    slots:        BTreeMap<AgentId, AgentSlot<S, T>>,
    groups:       GroupRegistry,
    coordinator:  ClusterCoordinator,
    clock:        FrameClock,
}

impl<S: StateKind, T: TriggerKind> Director<S, T> {
    /// Build a Director.  Wiring is validated up front: a table state with no
    /// registered behavior is a startup error, never a runtime one.
    pub fn new(
        session_seed: u64,
        zones: ZoneSet,
        table: Arc<TransitionTable<S, T>>,
        behaviors: BehaviorRegistry<S, T>,
        start: S,
        map_event: EventMap<T>,
    ) -> DirectorResult<Self> {
        behaviors.validate(&table)?;
        Ok(Self {
            table,
            behaviors,
            start,
            map_event,
            session_seed,
            slots: BTreeMap::new(),
            groups: GroupRegistry::new(zones),
            coordinator: ClusterCoordinator::new(session_seed),
            clock: FrameClock::new(),
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Spawn an agent into the start state.
    pub fn spawn(&mut self, agent: AgentId, world: &mut dyn AgentWorld) -> DirectorResult<()> {
        self.spawn_at(agent, self.start, world)
    }

    /// Spawn an agent into an explicit state (scripted encounters start some
    /// agents mid-graph, e.g. already in ambush).
    pub fn spawn_at(
        &mut self,
        agent: AgentId,
        start: S,
        world: &mut dyn AgentWorld,
    ) -> DirectorResult<()> {
        if self.slots.contains_key(&agent) {
            return Err(DirectorError::AgentExists(agent));
        }
        let mut machine = AgentStateMachine::new(agent, Arc::clone(&self.table), &self.behaviors)?;
        let mut rng = AgentRng::new(self.session_seed, agent);
        machine.initialize(start, world, &mut self.groups, &mut rng)?;
        self.slots.insert(agent, AgentSlot { machine, rng });
        Ok(())
    }

    /// Tear an agent down: cancel its timers, run its exit hook, unlink it
    /// from any group.
    pub fn despawn(
        &mut self,
        agent: AgentId,
        world: &mut dyn AgentWorld,
        observer: &mut dyn DirectorObserver<S, T>,
    ) -> DirectorResult<()> {
        let mut slot = self
            .slots
            .remove(&agent)
            .ok_or(DirectorError::UnknownAgent(agent))?;
        slot.machine.shutdown(world, &mut self.groups, &mut slot.rng);
        self.groups.remove_agent(agent);
        observer.on_despawn(agent);
        Ok(())
    }

    // ── Triggers ──────────────────────────────────────────────────────────

    /// Fire a host-side trigger (perception, health thresholds, scripts) at
    /// one agent.  Returns whether the table had a row for it.
    pub fn fire(
        &mut self,
        agent: AgentId,
        trigger: T,
        world: &mut dyn AgentWorld,
        observer: &mut dyn DirectorObserver<S, T>,
    ) -> DirectorResult<bool> {
        let slot = self
            .slots
            .get_mut(&agent)
            .ok_or(DirectorError::UnknownAgent(agent))?;
        let before = slot.machine.current();
        let handled = slot
            .machine
            .fire(trigger, world, &mut self.groups, &mut slot.rng)?;
        Self::report_transition(observer, agent, before, slot.machine.current());
        Ok(handled)
    }

    // ── The frame tick ────────────────────────────────────────────────────

    /// Advance the whole session by one host frame.
    pub fn tick(
        &mut self,
        dt: f32,
        world: &mut dyn AgentWorld,
        observer: &mut dyn DirectorObserver<S, T>,
    ) -> DirectorResult<()> {
        self.clock.advance(dt);

        // Group phase first: formation movement and maneuver resolutions,
        // then deliver the buffered outcomes as triggers.
        self.coordinator.tick(dt, &mut self.groups, world);
        for (agent, event) in self.groups.drain_events() {
            let mapped = (self.map_event)(event);
            observer.on_group_event(agent, event, mapped);
            if let Some(trigger) = mapped
                && let Some(slot) = self.slots.get_mut(&agent)
            {
                let before = slot.machine.current();
                slot.machine
                    .fire(trigger, world, &mut self.groups, &mut slot.rng)?;
                Self::report_transition(observer, agent, before, slot.machine.current());
            }
        }

        // Per-agent phase, in AgentId order.
        for (&agent, slot) in self.slots.iter_mut() {
            if !world.is_alive(agent) {
                observer.on_stale_handle(agent);
            }
            let before = slot.machine.current();
            slot.machine
                .tick(dt, world, &mut self.groups, &mut slot.rng)?;
            Self::report_transition(observer, agent, before, slot.machine.current());
        }

        observer.on_tick_end(self.clock.frame, self.slots.len());
        Ok(())
    }

    fn report_transition(
        observer: &mut dyn DirectorObserver<S, T>,
        agent: AgentId,
        before: Option<S>,
        after: Option<S>,
    ) {
        if let (Some(from), Some(to)) = (before, after)
            && from != to
        {
            observer.on_transition(agent, from, to);
        }
    }

    // ── Groups and zones (thin delegation) ────────────────────────────────

    pub fn create_group(&mut self, group: GroupId, tuning: ClusterTuning) -> DirectorResult<()> {
        self.groups.create_group(group, tuning)?;
        Ok(())
    }

    pub fn add_to_group(&mut self, group: GroupId, agent: AgentId) -> DirectorResult<()> {
        if !self.slots.contains_key(&agent) {
            return Err(DirectorError::UnknownAgent(agent));
        }
        self.groups.add_member(group, agent)?;
        Ok(())
    }

    pub fn destroy_group(&mut self, group: GroupId) {
        self.groups.destroy_group(group);
    }

    pub fn assign_zone(&mut self, agent: AgentId, zone: ZoneId) {
        self.groups.assign_zone(agent, zone);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The agent's current state, or `None` if it isn't spawned.
    pub fn state_of(&self, agent: AgentId) -> Option<S> {
        self.slots.get(&agent).and_then(|s| s.machine.current())
    }

    pub fn is_spawned(&self, agent: AgentId) -> bool {
        self.slots.contains_key(&agent)
    }

    pub fn agent_count(&self) -> usize {
        self.slots.len()
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut GroupRegistry {
        &mut self.groups
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}
