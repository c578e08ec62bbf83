//! In-memory services for tests, tools and the terminal driver.
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::trace;

use crate::config::BattleConfig;
use crate::element::TypeChart;
use crate::ids::{EntityId, ItemId, MapStatusId, Position, SkillId, StatusId};

use super::{
    AnimationCue, CharacterSnapshot, ContentOracle, HpChange, ItemData, LogMessage, MapOracle,
    Presenter, RngOracle, RosterOracle, SkillData, SkillSlot, StatusData,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Roster
// ============================================================================

/// Characters held in a map keyed by id.
#[derive(Debug, Default)]
pub struct MemoryRoster {
    characters: Mutex<BTreeMap<EntityId, CharacterSnapshot>>,
}

impl MemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, character: CharacterSnapshot) -> Self {
        self.insert(character);
        self
    }

    pub fn insert(&self, character: CharacterSnapshot) {
        lock(&self.characters).insert(character.id, character);
    }

    pub fn ids(&self) -> Vec<EntityId> {
        lock(&self.characters).keys().copied().collect()
    }

    fn update<R>(&self, id: EntityId, f: impl FnOnce(&mut CharacterSnapshot) -> R) -> Option<R> {
        lock(&self.characters).get_mut(&id).map(f)
    }
}

#[async_trait]
impl RosterOracle for MemoryRoster {
    fn character(&self, id: EntityId) -> Option<CharacterSnapshot> {
        lock(&self.characters).get(&id).cloned()
    }

    async fn inflict_damage(&self, id: EntityId, amount: u32) -> Option<HpChange> {
        self.update(id, |c| {
            let before = c.hp;
            c.hp = c.hp.saturating_sub(amount);
            HpChange {
                before,
                after: c.hp,
            }
        })
    }

    async fn restore_hp(&self, id: EntityId, amount: u32) -> Option<HpChange> {
        self.update(id, |c| {
            let before = c.hp;
            c.hp = c.hp.saturating_add(amount).min(c.max_hp);
            HpChange {
                before,
                after: c.hp,
            }
        })
    }

    async fn equip_item(&self, id: EntityId, item: ItemId) -> bool {
        self.update(id, |c| {
            if c.held_item.is_some() {
                return false;
            }
            c.held_item = Some(item);
            true
        })
        .unwrap_or(false)
    }

    async fn dequip_item(&self, id: EntityId) -> Option<ItemId> {
        self.update(id, |c| c.held_item.take()).flatten()
    }

    async fn give_item(&self, id: EntityId, item: ItemId) -> bool {
        self.update(id, |c| {
            if c.inventory_full() {
                return false;
            }
            c.inventory.push(item);
            true
        })
        .unwrap_or(false)
    }

    async fn take_item(&self, id: EntityId, item: &ItemId) -> bool {
        self.update(id, |c| match c.inventory.iter().position(|i| i == item) {
            Some(index) => {
                c.inventory.remove(index);
                true
            }
            None => false,
        })
        .unwrap_or(false)
    }

    async fn deduct_charges(&self, id: EntityId, slot: usize, amount: u32) -> u32 {
        self.update(id, |c| match c.skills.get_mut(slot) {
            Some(skill) => {
                let taken = amount.min(skill.charges);
                skill.charges -= taken;
                taken
            }
            None => 0,
        })
        .unwrap_or(0)
    }

    async fn restore_charges(&self, id: EntityId, slot: usize, amount: u32) -> u32 {
        self.update(id, |c| match c.skills.get_mut(slot) {
            Some(skill) => {
                let given = amount.min(skill.max_charges - skill.charges.min(skill.max_charges));
                skill.charges += given;
                given
            }
            None => 0,
        })
        .unwrap_or(0)
    }

    async fn learn_skill(&self, id: EntityId, slot: usize, skill: SkillId, charges: u32) -> bool {
        self.update(id, |c| {
            let learned = SkillSlot::new(skill, charges);
            match c.skills.get_mut(slot) {
                Some(existing) => {
                    *existing = learned;
                    true
                }
                None => c.skills.try_push(learned).is_ok(),
            }
        })
        .unwrap_or(false)
    }

    async fn add_status(&self, id: EntityId, status: StatusId) -> bool {
        self.update(id, |c| {
            if c.has_status(&status) {
                return false;
            }
            c.statuses.push(status);
            true
        })
        .unwrap_or(false)
    }

    async fn remove_status(&self, id: EntityId, status: &StatusId) -> bool {
        self.update(id, |c| {
            let before = c.statuses.len();
            c.statuses.retain(|s| s != status);
            c.statuses.len() != before
        })
        .unwrap_or(false)
    }

    async fn change_money(&self, id: EntityId, delta: i64) -> i64 {
        self.update(id, |c| {
            let before = i64::from(c.money);
            let after = (before + delta).clamp(0, i64::from(u32::MAX));
            c.money = u32::try_from(after).unwrap_or(u32::MAX);
            after - before
        })
        .unwrap_or(0)
    }
}

// ============================================================================
// Map
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryMap {
    positions: Mutex<BTreeMap<EntityId, Position>>,
    items: Mutex<Vec<(Position, ItemId)>>,
    statuses: Mutex<Vec<MapStatusId>>,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, id: EntityId, position: Position) -> Self {
        self.place(id, position);
        self
    }

    pub fn place(&self, id: EntityId, position: Position) {
        lock(&self.positions).insert(id, position);
    }
}

#[async_trait]
impl MapOracle for MemoryMap {
    fn position(&self, id: EntityId) -> Option<Position> {
        lock(&self.positions).get(&id).copied()
    }

    fn characters_within(&self, center: Position, radius: u32) -> Vec<EntityId> {
        // BTreeMap iteration keeps the result sorted by id.
        lock(&self.positions)
            .iter()
            .filter(|(_, pos)| pos.distance(center) <= radius)
            .map(|(id, _)| *id)
            .collect()
    }

    fn items_at(&self, position: Position) -> Vec<ItemId> {
        lock(&self.items)
            .iter()
            .filter(|(pos, _)| *pos == position)
            .map(|(_, item)| item.clone())
            .collect()
    }

    fn has_map_status(&self, status: &MapStatusId) -> bool {
        lock(&self.statuses).contains(status)
    }

    fn map_statuses(&self) -> Vec<MapStatusId> {
        lock(&self.statuses).clone()
    }

    async fn drop_item(&self, position: Position, item: ItemId) {
        lock(&self.items).push((position, item));
    }

    async fn remove_item(&self, position: Position, item: &ItemId) -> bool {
        let mut items = lock(&self.items);
        match items.iter().position(|(p, i)| *p == position && i == item) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        }
    }

    async fn add_map_status(&self, status: MapStatusId) -> bool {
        let mut statuses = lock(&self.statuses);
        if statuses.contains(&status) {
            return false;
        }
        statuses.push(status);
        true
    }

    async fn remove_map_status(&self, status: &MapStatusId) -> bool {
        let mut statuses = lock(&self.statuses);
        let before = statuses.len();
        statuses.retain(|s| s != status);
        statuses.len() != before
    }
}

// ============================================================================
// Presenter
// ============================================================================

/// Everything a presenter was asked to do, in call order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresentationEvent {
    Log(LogMessage),
    Sound(String),
    AnimationStarted(AnimationCue),
    AnimationFinished(AnimationCue),
    Waited(u32),
}

/// Presenter that records calls instead of rendering them.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<PresentationEvent>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PresentationEvent> {
        lock(&self.events).clone()
    }

    pub fn messages(&self) -> Vec<LogMessage> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                PresentationEvent::Log(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Keys of logged messages, in order.
    pub fn keys(&self) -> Vec<String> {
        self.messages().into_iter().map(|m| m.key).collect()
    }

    fn push(&self, event: PresentationEvent) {
        lock(&self.events).push(event);
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    fn log(&self, message: &LogMessage) {
        self.push(PresentationEvent::Log(message.clone()));
    }

    fn play_sound(&self, sound: &str) {
        self.push(PresentationEvent::Sound(sound.to_string()));
    }

    fn start_animation(&self, cue: &AnimationCue) {
        self.push(PresentationEvent::AnimationStarted(cue.clone()));
    }

    async fn play_animation(&self, cue: &AnimationCue) {
        self.push(PresentationEvent::AnimationStarted(cue.clone()));
        yield_now().await;
        self.push(PresentationEvent::AnimationFinished(cue.clone()));
    }

    async fn wait_frames(&self, frames: u32) {
        yield_now().await;
        self.push(PresentationEvent::Waited(frames));
    }
}

/// Yields once to the executor without depending on a runtime.
async fn yield_now() {
    struct YieldOnce(bool);

    impl std::future::Future for YieldOnce {
        type Output = ();

        fn poll(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<()> {
            if self.0 {
                return std::task::Poll::Ready(());
            }
            self.0 = true;
            cx.waker().wake_by_ref();
            std::task::Poll::Pending
        }
    }

    YieldOnce(false).await
}

// ============================================================================
// Content
// ============================================================================

/// Content index backed by hash maps.
#[derive(Clone, Debug)]
pub struct StaticContent {
    config: BattleConfig,
    chart: TypeChart,
    skills: HashMap<SkillId, SkillData>,
    items: HashMap<ItemId, ItemData>,
    statuses: HashMap<StatusId, StatusData>,
}

impl StaticContent {
    pub fn new(config: BattleConfig, chart: TypeChart) -> Self {
        Self {
            config,
            chart,
            skills: HashMap::new(),
            items: HashMap::new(),
            statuses: HashMap::new(),
        }
    }

    pub fn with_skill(mut self, skill: SkillData) -> Self {
        self.add_skill(skill);
        self
    }

    pub fn with_item(mut self, item: ItemData) -> Self {
        self.add_item(item);
        self
    }

    pub fn with_status(mut self, status: StatusData) -> Self {
        self.add_status(status);
        self
    }

    pub fn add_skill(&mut self, skill: SkillData) {
        trace!(skill = %skill.id, "registering skill");
        self.skills.insert(skill.id.clone(), skill);
    }

    pub fn add_item(&mut self, item: ItemData) {
        trace!(item = %item.id, "registering item");
        self.items.insert(item.id.clone(), item);
    }

    pub fn add_status(&mut self, status: StatusData) {
        trace!(status = %status.id, "registering status");
        self.statuses.insert(status.id.clone(), status);
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn status_count(&self) -> usize {
        self.statuses.len()
    }
}

impl ContentOracle for StaticContent {
    fn config(&self) -> &BattleConfig {
        &self.config
    }

    fn type_chart(&self) -> &TypeChart {
        &self.chart
    }

    fn skill(&self, id: &SkillId) -> Option<&SkillData> {
        self.skills.get(id)
    }

    fn item(&self, id: &ItemId) -> Option<&ItemData> {
        self.items.get(id)
    }

    fn status(&self, id: &StatusId) -> Option<&StatusData> {
        self.statuses.get(id)
    }
}

// ============================================================================
// Random sources
// ============================================================================

/// Returns the same raw value for every seed.
#[derive(Clone, Copy, Debug)]
pub struct FixedRng(pub u32);

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

/// Returns scripted raw values in call order, cycling when exhausted.
#[derive(Debug, Default)]
pub struct SequenceRng {
    values: Vec<u32>,
    cursor: AtomicUsize,
}

impl SequenceRng {
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn draws(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}

impl RngOracle for SequenceRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.values[index % self.values.len()]
    }
}
