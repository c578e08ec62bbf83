//! The mutable record of one in-flight action.
use tracing::trace;

use crate::env::{BattleEnv, LogMessage, compute_seed};
use crate::ids::{EntityId, ItemId};
use crate::state::{Counter, Multiplier, StateStore};

use super::data::{BattleData, Explosion};
use super::error::ActionError;
use super::outcome::{ActionOutcome, Change};
use crate::state::{Knockouts, TotalDamageDealt};

/// How the action was started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    /// A learned skill; one charge is spent from `slot` once the action is
    /// committed.
    Skill { slot: usize },
    /// An inventory item consumed by its owner.
    Item,
    /// An inventory item thrown at a target.
    Throw,
    /// A floor trap springing on whoever stepped on it.
    Trap,
    /// A sub-action started by another action's effect. Spends nothing.
    Invoked,
}

/// Everything one action attempt reads and writes.
///
/// Created per attempt, consumed by [`crate::pipeline::resolve`], never
/// persisted. `state` is reset for every strike and target; `global` lives
/// for the whole action.
#[derive(Clone, Debug)]
pub struct ActionContext {
    pub kind: ActionKind,
    pub user: EntityId,
    /// Target chosen when the action started, or the redirected one.
    /// Strikes aim here.
    pub aim: EntityId,
    /// Current recipient. Redirection changes it.
    pub target: EntityId,
    pub data: BattleData,
    pub explosion: Explosion,
    /// Item used or thrown, when the action came from one.
    pub item: Option<ItemId>,
    pub state: StateStore,
    pub global: StateStore,
    /// Zero-based index of the current strike.
    pub strike: u32,
    pub strikes: u32,
    session_seed: u64,
    nonce: u64,
    rolls: u32,
    depth: u32,
    cancelled: bool,
    strikes_started: u32,
    changes: Vec<Change>,
    messages: Vec<LogMessage>,
}

impl ActionContext {
    pub fn new(kind: ActionKind, user: EntityId, target: EntityId, data: BattleData) -> Self {
        Self {
            kind,
            user,
            aim: target,
            target,
            explosion: data.explosion,
            strikes: data.strikes,
            data,
            item: None,
            state: StateStore::new(),
            global: StateStore::new(),
            strike: 0,
            session_seed: 0,
            nonce: 0,
            rolls: 0,
            depth: 0,
            cancelled: false,
            strikes_started: 0,
            changes: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Builder: seed the random draws of this action.
    pub fn with_seed(mut self, session_seed: u64, nonce: u64) -> Self {
        self.session_seed = session_seed;
        self.nonce = nonce;
        self
    }

    pub fn with_item(mut self, item: ItemId) -> Self {
        self.item = Some(item);
        self
    }

    pub(crate) fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn session_seed(&self) -> u64 {
        self.session_seed
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Nesting level; 0 for a top-level action.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    // ===== cancellation =====

    /// Requests that the rest of the action be skipped. Takes effect at the
    /// next dispatch checkpoint.
    pub fn cancel(&mut self) {
        trace!(user = %self.user, "action cancelled");
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub(crate) fn begin_strike(&mut self) {
        self.strikes_started += 1;
    }

    // ===== state helpers =====

    pub fn store(&self, global: bool) -> &StateStore {
        if global { &self.global } else { &self.state }
    }

    pub fn store_mut(&mut self, global: bool) -> &mut StateStore {
        if global {
            &mut self.global
        } else {
            &mut self.state
        }
    }

    pub fn add<T: Counter>(&mut self, global: bool, delta: i32) {
        self.store_mut(global).add::<T>(delta);
    }

    pub fn multiply<T: Multiplier>(&mut self, global: bool, num: i32, den: i32) {
        self.store_mut(global).multiply::<T>(num, den);
    }

    // ===== randomness =====

    /// Draws a value in `[min, max]`. Each call uses a fresh seed derived from
    /// the session, nonce, user and draw index.
    pub fn roll(&mut self, env: &BattleEnv<'_>, min: u32, max: u32) -> Result<u32, ActionError> {
        let rng = env.rng()?;
        let seed = compute_seed(self.session_seed, self.nonce, self.user.0, self.rolls);
        self.rolls += 1;
        let value = rng.range(seed, min, max);
        trace!(roll = self.rolls - 1, min, max, value, "rng draw");
        Ok(value)
    }

    /// Nonce for a nested action. Consumes one draw index so sibling
    /// invocations never share a random stream.
    pub(crate) fn child_nonce(&mut self) -> u64 {
        let salt = (u64::from(self.rolls) << 32) | u64::from(self.depth + 1);
        self.rolls += 1;
        self.nonce.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ salt
    }

    /// True with `chance` percent probability. 100 and above never draw.
    pub fn chance(&mut self, env: &BattleEnv<'_>, chance: u32) -> Result<bool, ActionError> {
        if chance >= 100 {
            return Ok(true);
        }
        Ok(self.roll(env, 0, 99)? < chance)
    }

    // ===== reporting =====

    pub fn record(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Sends a message to the presenter (when one is wired) and keeps it for
    /// the outcome.
    pub fn log(&mut self, env: &BattleEnv<'_>, message: LogMessage) {
        if let Ok(presenter) = env.presenter() {
            presenter.log(&message);
        }
        self.messages.push(message);
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn messages(&self) -> &[LogMessage] {
        &self.messages
    }

    /// Folds a finished sub-action's report into this one.
    pub(crate) fn absorb(&mut self, nested: ActionOutcome) {
        self.changes.extend(nested.changes);
        self.messages.extend(nested.messages);
    }

    pub fn into_outcome(self) -> ActionOutcome {
        ActionOutcome {
            strikes: self.strikes_started,
            cancelled: self.cancelled,
            total_damage: self.global.count::<TotalDamageDealt>(),
            knockouts: self.global.count::<Knockouts>(),
            changes: self.changes,
            messages: self.messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::memory::FixedRng;
    use crate::state::{DamageDealt, DamageMult};
    use crate::stats::Category;

    fn context() -> ActionContext {
        ActionContext::new(
            ActionKind::Skill { slot: 0 },
            EntityId(1),
            EntityId(2),
            BattleData::new("normal", Category::Physical, 40).with_strikes(3),
        )
    }

    #[test]
    fn new_copies_geometry_and_strikes_from_data() {
        let ctx = context();
        assert_eq!(ctx.strikes, 3);
        assert_eq!(ctx.aim, ctx.target);
        assert_eq!(ctx.depth(), 0);
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn global_flag_selects_store() {
        let mut ctx = context();
        ctx.add::<DamageDealt>(false, 4);
        ctx.add::<DamageDealt>(true, 9);
        ctx.multiply::<DamageMult>(false, 0, 1);

        assert_eq!(ctx.state.count::<DamageDealt>(), 4);
        assert_eq!(ctx.global.count::<DamageDealt>(), 9);
        assert!(ctx.store(false).is_neutralized::<DamageMult>());
        assert!(!ctx.store(true).is_neutralized::<DamageMult>());
    }

    #[test]
    fn rolls_need_a_random_source() {
        let mut ctx = context();
        let empty = BattleEnv::empty();
        assert!(ctx.roll(&empty, 0, 10).is_err());

        let rng = FixedRng(7);
        let env = BattleEnv::new(None, None, None, Some(&rng), None);
        assert_eq!(ctx.roll(&env, 0, 99).ok(), Some(7));
        assert_eq!(ctx.chance(&env, 8).ok(), Some(true));
        assert_eq!(ctx.chance(&env, 7).ok(), Some(false));
    }

    #[test]
    fn outcome_collects_counters() {
        let mut ctx = context();
        ctx.global.add::<TotalDamageDealt>(12);
        ctx.cancel();
        let outcome = ctx.into_outcome();
        assert_eq!(outcome.total_damage, 12);
        assert!(outcome.cancelled);
    }
}
