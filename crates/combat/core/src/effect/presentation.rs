//! Presentation steps. Missing presenters are skipped; the waits are the
//! suspension points of an effect list.
use crate::action::ActionContext;
use crate::env::{AnimationCue, BattleEnv, LogMessage};

pub(super) fn message(ctx: &mut ActionContext, env: &BattleEnv<'_>, key: &str) {
    let message = LogMessage::new(key)
        .arg(env.name_of(ctx.user))
        .arg(env.name_of(ctx.target));
    ctx.log(env, message);
}

pub(super) async fn animation(
    ctx: &ActionContext,
    env: &BattleEnv<'_>,
    animation: &str,
    wait: bool,
) {
    let Ok(presenter) = env.presenter() else {
        return;
    };
    let cue = AnimationCue {
        animation: animation.to_string(),
        origin: ctx.user,
        target: ctx.target,
    };
    if wait {
        presenter.play_animation(&cue).await;
    } else {
        presenter.start_animation(&cue);
    }
}

pub(super) fn sound(env: &BattleEnv<'_>, sound: &str) {
    if let Ok(presenter) = env.presenter() {
        presenter.play_sound(sound);
    }
}

pub(super) async fn wait(env: &BattleEnv<'_>, frames: u32) {
    if let Ok(presenter) = env.presenter() {
        presenter.wait_frames(frames).await;
    }
}
