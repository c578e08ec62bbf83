use crate::action::{ActionContext, ActionError, Change};
use crate::env::{BattleEnv, LogMessage, msg};
use crate::ids::MapStatusId;

pub(super) async fn set(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    weather: &MapStatusId,
) -> Result<(), ActionError> {
    if !env.map()?.add_map_status(weather.clone()).await {
        return Ok(());
    }
    ctx.record(Change::Weather {
        status: weather.clone(),
        active: true,
    });
    ctx.log(env, LogMessage::new(msg::WEATHER_SET).arg(weather));
    Ok(())
}

pub(super) async fn clear(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    weather: &MapStatusId,
) -> Result<(), ActionError> {
    if !env.map()?.remove_map_status(weather).await {
        return Ok(());
    }
    ctx.record(Change::Weather {
        status: weather.clone(),
        active: false,
    });
    ctx.log(env, LogMessage::new(msg::WEATHER_CLEARED).arg(weather));
    Ok(())
}
