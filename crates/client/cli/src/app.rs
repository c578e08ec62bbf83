//! Glue code tying content, in-memory services and the presenter together.
use std::time::Duration;

use anyhow::Result;
use combat_content::{ContentFactory, ContentRegistry, Scenario, ScriptedAction};
use combat_core::env::memory::{MemoryMap, MemoryRoster};
use combat_core::{
    ActionContext, ActionError, ActionOutcome, BattleEnv, CombatError, ErrorSeverity, MapOracle,
    PcgRng, RosterOracle, prepare_item, prepare_skill, prepare_throw, prepare_trap, resolve,
};
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::presenter::ConsolePresenter;

/// What happened to one scripted action.
#[derive(Debug)]
pub enum Turn {
    Resolved(ActionOutcome),
    /// The action was rejected before anything happened.
    Rejected(ActionError),
    /// The actor was already knocked out.
    Skipped,
}

/// A loaded encounter ready to play.
pub struct CliApp {
    registry: ContentRegistry,
    scenario: Scenario,
    seed: u64,
    roster: MemoryRoster,
    map: MemoryMap,
    presenter: ConsolePresenter,
    rng: PcgRng,
}

impl CliApp {
    /// Loads content and places the scenario's characters.
    pub async fn load(config: &CliConfig) -> Result<Self> {
        let factory = ContentFactory::new(&config.data_dir);
        let registry = factory.load_registry()?;
        let messages = factory.load_messages()?;
        let scenario = factory.load_scenario(&config.scenario)?;
        let seed = config.seed.or(scenario.seed).unwrap_or_default();

        let presenter = ConsolePresenter::new(messages, Duration::from_millis(config.frame_millis));
        Self::stage(registry, scenario, seed, presenter).await
    }

    /// Builds the services for an already loaded scenario.
    pub async fn stage(
        registry: ContentRegistry,
        scenario: Scenario,
        seed: u64,
        presenter: ConsolePresenter,
    ) -> Result<Self> {
        let roster = MemoryRoster::new();
        let map = MemoryMap::new();
        for placement in &scenario.characters {
            map.place(placement.character.id, placement.position);
            roster.insert(placement.character.clone());
        }
        for weather in &scenario.weather {
            map.add_map_status(weather.clone()).await;
        }
        info!(
            scenario = %scenario.name,
            seed,
            characters = scenario.characters.len(),
            actions = scenario.actions.len(),
            "scenario staged"
        );

        Ok(Self {
            registry,
            scenario,
            seed,
            roster,
            map,
            presenter,
            rng: PcgRng,
        })
    }

    fn env(&self) -> BattleEnv<'_> {
        BattleEnv::with_all(
            &self.roster,
            &self.map,
            &self.presenter,
            &self.rng,
            &self.registry,
        )
    }

    /// Plays every scripted action in order.
    ///
    /// Rejected actions are reported and skipped; infrastructure failures
    /// abort the run.
    pub async fn run(&self) -> Result<Vec<Turn>> {
        let mut turns = Vec::with_capacity(self.scenario.actions.len());
        for (index, action) in self.scenario.actions.iter().enumerate() {
            let nonce = index as u64 + 1;
            let turn = self.play(action, nonce).await?;
            if let Turn::Resolved(outcome) = &turn {
                info!(
                    nonce,
                    strikes = outcome.strikes,
                    damage = outcome.total_damage,
                    knockouts = outcome.knockouts,
                    cancelled = outcome.cancelled,
                    "action resolved"
                );
            }
            turns.push(turn);
        }
        Ok(turns)
    }

    async fn play(&self, action: &ScriptedAction, nonce: u64) -> Result<Turn> {
        let actor = action.actor();
        let standing = self
            .roster
            .character(actor)
            .is_some_and(|c| !c.is_knocked_out());
        if !standing && !matches!(action, ScriptedAction::Trap { .. }) {
            info!(%actor, nonce, "actor is down, turn skipped");
            return Ok(Turn::Skipped);
        }

        let env = self.env();
        let ctx = match self.prepare(&env, action) {
            Ok(ctx) => ctx.with_seed(self.seed, nonce),
            Err(err) => return self.reject(err),
        };
        match resolve(ctx, &env).await {
            Ok(outcome) => Ok(Turn::Resolved(outcome)),
            Err(err) => self.reject(err),
        }
    }

    fn prepare(
        &self,
        env: &BattleEnv<'_>,
        action: &ScriptedAction,
    ) -> Result<ActionContext, ActionError> {
        match action {
            ScriptedAction::Skill { user, slot, target } => {
                prepare_skill(env, *user, *slot, *target)
            }
            ScriptedAction::Item { user, item } => prepare_item(env, *user, item),
            ScriptedAction::Throw { user, item, target } => {
                prepare_throw(env, *user, item, *target)
            }
            ScriptedAction::Trap { trap, victim } => prepare_trap(env, trap, *victim),
        }
    }

    fn reject(&self, err: ActionError) -> Result<Turn> {
        match err.severity() {
            ErrorSeverity::Recoverable | ErrorSeverity::Validation => {
                warn!(error = %err, code = err.error_code(), "action rejected");
                Ok(Turn::Rejected(err))
            }
            ErrorSeverity::Internal | ErrorSeverity::Fatal => Err(err.into()),
        }
    }

    /// One line per character: name, HP, statuses and held item.
    pub fn standings(&self) -> Vec<String> {
        self.roster
            .ids()
            .into_iter()
            .filter_map(|id| self.roster.character(id))
            .map(|c| {
                let mut line = format!("{} {} HP {}/{}", c.id, c.name, c.hp, c.max_hp);
                if !c.statuses.is_empty() {
                    let statuses: Vec<String> =
                        c.statuses.iter().map(ToString::to_string).collect();
                    line.push_str(&format!(" [{}]", statuses.join(", ")));
                }
                if let Some(item) = &c.held_item {
                    line.push_str(&format!(" holding {item}"));
                }
                line
            })
            .collect()
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn presenter(&self) -> &ConsolePresenter {
        &self.presenter
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use combat_content::MessageCatalog;
    use combat_core::EntityId;

    use super::*;

    fn data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../combat/content/data")
    }

    async fn duel() -> CliApp {
        let factory = ContentFactory::new(data_dir());
        let registry = factory.load_registry().expect("bundled content should load");
        let messages = factory.load_messages().expect("bundled messages should load");
        let scenario = factory.load_scenario("duel").expect("duel should load");
        let presenter = ConsolePresenter::new(messages, Duration::ZERO).quiet();
        CliApp::stage(registry, scenario, 1, presenter)
            .await
            .expect("duel should stage")
    }

    #[tokio::test]
    async fn duel_plays_every_scripted_action() {
        let app = duel().await;
        let turns = app.run().await.expect("duel should run");

        assert_eq!(turns.len(), app.scenario().actions.len());
        assert!(
            turns.iter().any(|t| matches!(t, Turn::Resolved(o) if o.total_damage > 0)),
            "some action should land"
        );
        let transcript = app.presenter().transcript();
        assert_eq!(transcript.first().map(String::as_str), Some("Ash used Ember!"));
        assert!(transcript.iter().all(|line| !line.starts_with("battle.")));
    }

    #[tokio::test]
    async fn same_seed_replays_the_same_battle() {
        let first = duel().await;
        first.run().await.expect("first run");
        let second = duel().await;
        second.run().await.expect("second run");

        assert_eq!(first.presenter().transcript(), second.presenter().transcript());
        assert_eq!(first.standings(), second.standings());
    }

    #[tokio::test]
    async fn rejected_actions_do_not_stop_the_run() {
        let factory = ContentFactory::new(data_dir());
        let registry = factory.load_registry().expect("bundled content should load");
        let mut scenario = factory.load_scenario("duel").expect("duel should load");
        scenario.actions = vec![
            ScriptedAction::Skill {
                user: EntityId(1),
                slot: 3,
                target: EntityId(3),
            },
            ScriptedAction::Skill {
                user: EntityId(1),
                slot: 0,
                target: EntityId(3),
            },
        ];
        let presenter = ConsolePresenter::new(MessageCatalog::new(), Duration::ZERO).quiet();
        let app = CliApp::stage(registry, scenario, 1, presenter)
            .await
            .expect("stage");

        let turns = app.run().await.expect("run");
        assert!(matches!(
            turns[0],
            Turn::Rejected(ActionError::EmptySlot { slot: 3, .. })
        ));
        assert!(matches!(turns[1], Turn::Resolved(_)));
    }
}
