//! Commands posted by UI handlers and applied by the loop at the next tick.

use crate::constants::*;
use crate::frame::FrameTask;
use crate::layers::{key, WaveLayer};
use crate::uniforms::UniformValue;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub enum Command {
    Transition {
        key: String,
        value: UniformValue,
        duration: f32,
    },
    Set {
        key: String,
        value: UniformValue,
    },
    Spawn(Box<dyn FrameTask>),
}

impl Command {
    pub fn transition(key: impl Into<String>, value: impl Into<UniformValue>, duration: f32) -> Self {
        Command::Transition {
            key: key.into(),
            value: value.into(),
            duration,
        }
    }

    pub fn set(key: impl Into<String>, value: impl Into<UniformValue>) -> Self {
        Command::Set {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Transition {
                key,
                value,
                duration,
            } => write!(f, "Transition({key} -> {value:?} over {duration}s)"),
            Command::Set { key, value } => write!(f, "Set({key} = {value:?})"),
            Command::Spawn(task) => write!(f, "Spawn({})", task.name()),
        }
    }
}

/// Single-threaded FIFO shared between DOM handlers and the loop.
#[derive(Clone, Default)]
pub struct CommandQueue {
    inner: Rc<RefCell<VecDeque<Command>>>,
}

impl CommandQueue {
    pub fn push(&self, command: Command) {
        self.inner.borrow_mut().push_back(command);
    }

    pub fn extend(&self, commands: impl IntoIterator<Item = Command>) {
        self.inner.borrow_mut().extend(commands);
    }

    pub fn drain(&self) -> Vec<Command> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

/// The on-screen buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlAction {
    SpeedUp,
    SpeedDown,
}

impl ControlAction {
    pub const ALL: [ControlAction; 2] = [ControlAction::SpeedUp, ControlAction::SpeedDown];

    pub fn element_id(self) -> &'static str {
        match self {
            ControlAction::SpeedUp => "ctrlUp",
            ControlAction::SpeedDown => "ctrlDown",
        }
    }

    pub fn commands(self) -> Vec<Command> {
        let (spd_1, spd_2, freq) = match self {
            ControlAction::SpeedUp => (SPEED_UP_SPD, SPEED_UP_SPD, SPEED_UP_FREQ),
            ControlAction::SpeedDown => (SPEED_DOWN_SPD_1, SPEED_DOWN_SPD_2, SPEED_DOWN_FREQ),
        };
        let mut out = Vec::with_capacity(WaveLayer::ALL.len() * 4);
        for layer in WaveLayer::ALL {
            out.push(Command::transition(key(layer, U_SPD_MODIFIER_1), spd_1, CONTROL_TWEEN_SEC));
            out.push(Command::transition(key(layer, U_SPD_MODIFIER_2), spd_2, CONTROL_TWEEN_SEC));
            out.push(Command::transition(key(layer, U_NOISE_FREQ_1), freq, CONTROL_TWEEN_SEC));
            out.push(Command::transition(key(layer, U_NOISE_FREQ_2), freq, CONTROL_TWEEN_SEC));
        }
        out
    }
}
