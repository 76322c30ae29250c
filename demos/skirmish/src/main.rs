//! skirmish — headless demo of the rust_mob behavior library.
//!
//! A pack of six crawlers idles in its home zone, gets ordered into an
//! ambush cluster, engages a stationary target through the turn queue, and
//! finally stands down.  One crawler is wounded mid-fight to show the
//! flee/recover loop.  The "engine" is a 40-line kinematic world; every
//! state change is narrated to stdout.

use std::collections::HashMap;

use anyhow::Result;

use mob_behavior::{CrawlerState, CrawlerTrigger, CrawlerTuning, crawler_wiring};
use mob_core::{AgentId, AgentWorld, CueId, GroupId, QueryFilter, Vec3, Zone, ZoneId, ZoneSet};
use mob_group::{ClusterTuning, GroupEvent};
use mob_runtime::{Director, DirectorObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const PACK_SIZE: usize = 6;
const SEED: u64 = 42;
const DT: f32 = 1.0 / 60.0;
const SIM_SECS: f32 = 30.0;

const PLAYER: AgentId = AgentId(99);
const PACK: GroupId = GroupId(0);

// Script timeline, seconds.
const AMBUSH_AT: f32 = 2.0;
// While still clustering: Ambush has no row for SeeTarget, so the pack holds
// position and comes out of the barrier already locked on.
const ENGAGE_AT: f32 = 2.5;
const WOUND_AT: f32 = 14.0;
const STAND_DOWN_AT: f32 = 25.0;

// ── Kinematic world ───────────────────────────────────────────────────────────

struct Body {
    pos: Vec3,
    dest: Option<Vec3>,
    speed: f32,
    health: f32,
    max_health: f32,
    mobile: bool,
}

impl Body {
    fn new(pos: Vec3, speed: f32, health: f32) -> Self {
        Self { pos, dest: None, speed, health, max_health: health, mobile: true }
    }
}

/// Straight-line movement at constant speed; no physics, no pathfinding.
#[derive(Default)]
struct ConsoleWorld {
    bodies: HashMap<AgentId, Body>,
    targets: HashMap<AgentId, AgentId>,
    cues_played: usize,
    hits_on_player: usize,
}

impl ConsoleWorld {
    fn step(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            if !body.mobile {
                continue;
            }
            if let Some(dest) = body.dest {
                let step = body.speed * dt;
                if body.pos.distance(dest) <= step {
                    body.pos = dest;
                    body.dest = None;
                } else {
                    body.pos = body.pos + (dest - body.pos).normalized() * step;
                }
            }
        }
    }
}

impl AgentWorld for ConsoleWorld {
    fn is_alive(&self, agent: AgentId) -> bool {
        self.bodies.contains_key(&agent)
    }
    fn position(&self, agent: AgentId) -> Option<Vec3> {
        self.bodies.get(&agent).map(|b| b.pos)
    }
    fn move_to(&mut self, agent: AgentId, target: Vec3) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.dest = Some(target);
        }
    }
    fn stop(&mut self, agent: AgentId) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.dest = None;
        }
    }
    fn nearby(&self, origin: Vec3, radius: f32, _filter: QueryFilter) -> Vec<AgentId> {
        self.bodies
            .iter()
            .filter(|(_, b)| b.pos.distance(origin) <= radius)
            .map(|(&a, _)| a)
            .collect()
    }
    fn play_cue(&mut self, _agent: AgentId, _cue: CueId) {
        self.cues_played += 1;
    }
    fn apply_damage(&mut self, target: AgentId, amount: f32) {
        if target == PLAYER {
            self.hits_on_player += 1;
        }
        if let Some(body) = self.bodies.get_mut(&target) {
            body.health = (body.health - amount).max(0.0);
        }
    }
    fn heal(&mut self, agent: AgentId, amount: f32) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.health = (body.health + amount).min(body.max_health);
        }
    }
    fn health(&self, agent: AgentId) -> Option<(f32, f32)> {
        self.bodies.get(&agent).map(|b| (b.health, b.max_health))
    }
    fn target_of(&self, agent: AgentId) -> Option<AgentId> {
        self.targets.get(&agent).copied()
    }
    fn set_mobile(&mut self, agent: AgentId, mobile: bool) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.mobile = mobile;
        }
    }
    fn deactivate(&mut self, agent: AgentId) {
        self.bodies.remove(&agent);
    }
}

// ── Narrating observer ────────────────────────────────────────────────────────

#[derive(Default)]
struct Narrator {
    now: f32,
    transitions: usize,
    group_events: usize,
}

impl DirectorObserver<CrawlerState, CrawlerTrigger> for Narrator {
    fn on_transition(&mut self, agent: AgentId, from: CrawlerState, to: CrawlerState) {
        self.transitions += 1;
        println!("[{:5.1}s] {agent}: {from} -> {to}", self.now);
    }
    fn on_group_event(
        &mut self,
        agent: AgentId,
        event: GroupEvent,
        _mapped: Option<CrawlerTrigger>,
    ) {
        self.group_events += 1;
        println!("[{:5.1}s] {agent}: group event {event:?}", self.now);
    }
}

fn map_crawler_event(event: GroupEvent) -> Option<CrawlerTrigger> {
    match event {
        GroupEvent::AmbushReady => Some(CrawlerTrigger::AmbushReady),
        GroupEvent::RelocateComplete => Some(CrawlerTrigger::RelocateDone),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== skirmish — rust_mob crawler pack demo ===");
    println!("Pack: {PACK_SIZE} crawlers  |  Duration: {SIM_SECS} s  |  Seed: {SEED}");
    println!();

    // 1. World: a stationary 200 hp target at the origin and the pack spread
    //    around its home zone 20 m away.
    let mut world = ConsoleWorld::default();
    let mut player = Body::new(Vec3::ZERO, 0.0, 200.0);
    player.mobile = false;
    world.bodies.insert(PLAYER, player);

    let home = Vec3::new(14.0, 0.0, 14.0);
    let pack: Vec<AgentId> = (0..PACK_SIZE as u32).map(AgentId).collect();
    for (i, &crawler) in pack.iter().enumerate() {
        let spawn = Vec3::ring_slot(home, 5.0, i, PACK_SIZE, 0.0);
        world.bodies.insert(crawler, Body::new(spawn, 6.0, 100.0));
    }

    // 2. Director: crawler wiring with a retreat pocket behind the zone and
    //    a tight attack ring so strikes connect.
    let mut tuning = CrawlerTuning::default();
    tuning.flee.pocket = Vec3::new(-10.0, 0.0, 30.0);
    let (table, behaviors) = crawler_wiring(&tuning)?;
    let zones = ZoneSet::new(vec![Zone::new(home, 8.0)]);
    let mut director = Director::new(SEED, zones, table, behaviors, CrawlerState::Idle, map_crawler_event)?;

    for &crawler in &pack {
        director.spawn(crawler, &mut world)?;
        director.assign_zone(crawler, ZoneId(0));
    }
    director.create_group(PACK, ClusterTuning { ring_radius: 1.5, ..Default::default() })?;
    for &crawler in &pack {
        director.add_to_group(PACK, crawler)?;
    }

    // 3. Run the scripted encounter.
    let mut narrator = Narrator::default();
    let frames = (SIM_SECS / DT) as usize;
    let mut ambushed = false;
    let mut engaged = false;
    let mut wounded = false;
    let mut stood_down = false;

    for frame in 0..frames {
        let t = frame as f32 * DT;

        if !ambushed && t >= AMBUSH_AT {
            println!("[{t:5.1}s] -- order: ambush cluster --");
            for &crawler in &pack {
                director.fire(crawler, CrawlerTrigger::AmbushNow, &mut world, &mut narrator)?;
            }
            ambushed = true;
        }
        if !engaged && t >= ENGAGE_AT {
            println!("[{t:5.1}s] -- perception: target spotted mid-cluster --");
            for &crawler in &pack {
                world.targets.insert(crawler, PLAYER);
            }
            engaged = true;
        }
        if !wounded && t >= WOUND_AT {
            println!("[{t:5.1}s] -- {} takes a heavy hit --", pack[2]);
            world.apply_damage(pack[2], 85.0);
            director.fire(pack[2], CrawlerTrigger::LowHealth, &mut world, &mut narrator)?;
            wounded = true;
        }
        if !stood_down && t >= STAND_DOWN_AT {
            println!("[{t:5.1}s] -- target escaped: calling the pack off --");
            world.targets.clear();
            stood_down = true;
        }

        world.step(DT);
        narrator.now = t;
        director.tick(DT, &mut world, &mut narrator)?;
    }

    // 4. Summary.
    println!();
    println!("Simulated {SIM_SECS} s ({frames} frames)");
    println!("  transitions  : {}", narrator.transitions);
    println!("  group events : {}", narrator.group_events);
    println!("  attack cues  : {}", world.cues_played);
    let (player_hp, _) = world.health(PLAYER).unwrap_or((0.0, 0.0));
    println!("  player       : {} hits taken, {player_hp:.0} hp left", world.hits_on_player);
    println!();

    println!("{:<12} {:<10} {:<22} {:<8}", "Agent", "State", "Position", "Health");
    println!("{}", "-".repeat(54));
    for &crawler in &pack {
        let state = director
            .state_of(crawler)
            .map(|s| format!("{s}"))
            .unwrap_or_else(|| "despawned".into());
        let pos = world
            .position(crawler)
            .map(|p| format!("{p}"))
            .unwrap_or_else(|| "-".into());
        let hp = world
            .health(crawler)
            .map(|(h, m)| format!("{h:.0}/{m:.0}"))
            .unwrap_or_else(|| "-".into());
        println!("{:<12} {:<10} {:<22} {:<8}", format!("{crawler}"), state, pos, hp);
    }

    Ok(())
}
