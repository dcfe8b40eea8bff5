//! Notification sink: the message log and the presentation event queue.
//!
//! Both are append-only from the core's point of view. The front end drains
//! them after each cycle; the core never reads them back.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Styling hint attached to a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum MessageStyle {
    Info,
    Warning,
    PlayerAttack,
    EnemyAttack,
    Good,
    Bad,
    Death,
    Impossible,
}

/// One rendered line of game text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub style: MessageStyle,
}

/// Append-only log of user-facing text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line with explicit styling.
    pub fn push(&mut self, text: impl Into<String>, style: MessageStyle) {
        self.messages.push(Message {
            text: text.into(),
            style,
        });
    }

    /// Append a plain informational line.
    pub fn info(&mut self, text: impl Into<String>) {
        self.push(text, MessageStyle::Info);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drain all pending lines, oldest first.
    pub fn drain(&mut self) -> Vec<Message> {
        core::mem::take(&mut self.messages)
    }
}

/// Sound cue identifiers consumed by the audio front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SoundCue {
    HitArmored,
    HitUnarmored,
    FinishingBlow,
    Block,
    Miss,
    Footstep,
    DoorOpen,
    DoorClose,
    ChestOpen,
    PickUp,
    BowShot,
    ArrowBreak,
    TorchBurnOut,
    ItemBreak,
}

/// Animation descriptors consumed by the rendering front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationCue {
    Slash { x: i32, y: i32 },
    Projectile { from: (i32, i32), to: (i32, i32) },
}

/// A presentation-layer event. The core appends these; playback (and playback
/// failure handling) lives entirely outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationEvent {
    Sound(SoundCue),
    Animation(AnimationCue),
}

/// Append-only queue of presentation events for the current cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresentationQueue {
    events: Vec<PresentationEvent>,
}

impl PresentationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.events.push(PresentationEvent::Sound(cue));
    }

    pub fn animation(&mut self, cue: AnimationCue) {
        self.events.push(PresentationEvent::Animation(cue));
    }

    pub fn events(&self) -> &[PresentationEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<PresentationEvent> {
        core::mem::take(&mut self.events)
    }
}
