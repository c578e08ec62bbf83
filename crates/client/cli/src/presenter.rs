//! Presenter that renders the battle log as plain text.
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use combat_content::MessageCatalog;
use combat_core::{AnimationCue, LogMessage, Presenter};
use tracing::debug;

/// Prints every log line through a message catalog and keeps a transcript.
///
/// Animations and waits sleep for `frame` per frame, so with a zero frame the
/// battle plays out instantly.
pub struct ConsolePresenter {
    messages: MessageCatalog,
    frame: Duration,
    echo: bool,
    transcript: Mutex<Vec<String>>,
}

impl ConsolePresenter {
    /// Frames an animation without its own length takes.
    pub const ANIMATION_FRAMES: u32 = 12;

    pub fn new(messages: MessageCatalog, frame: Duration) -> Self {
        Self {
            messages,
            frame,
            echo: true,
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// Keeps the transcript without printing to stdout.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn transcript(&self) -> Vec<String> {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn emit(&self, line: String) {
        if self.echo {
            println!("{line}");
        }
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }

    async fn sleep_frames(&self, frames: u32) {
        if self.frame.is_zero() || frames == 0 {
            return;
        }
        tokio::time::sleep(self.frame * frames).await;
    }
}

#[async_trait]
impl Presenter for ConsolePresenter {
    fn log(&self, message: &LogMessage) {
        self.emit(self.messages.format(message));
    }

    fn play_sound(&self, sound: &str) {
        debug!(sound, "sound");
    }

    fn start_animation(&self, cue: &AnimationCue) {
        debug!(
            animation = %cue.animation,
            origin = %cue.origin,
            target = %cue.target,
            "animation started"
        );
    }

    async fn play_animation(&self, cue: &AnimationCue) {
        debug!(
            animation = %cue.animation,
            origin = %cue.origin,
            target = %cue.target,
            "animation playing"
        );
        self.sleep_frames(Self::ANIMATION_FRAMES).await;
    }

    async fn wait_frames(&self, frames: u32) {
        self.sleep_frames(frames).await;
    }
}
