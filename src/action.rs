//! Action encoding shared with policies and controllers

use serde::{Deserialize, Serialize};

use crate::error::EnvError;

/// Number of discrete actions
pub const ACTION_COUNT: usize = 4;

/// A single tick's command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    /// Rotate gun counter-clockwise (+5 degrees)
    RotateLeft,
    /// Rotate gun clockwise (-5 degrees)
    RotateRight,
    /// Fire a bullet along the gun
    Fire,
    /// Do nothing
    #[default]
    Noop,
}

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::RotateLeft,
        Action::RotateRight,
        Action::Fire,
        Action::Noop,
    ];

    /// Wire value of this action
    pub fn index(self) -> u8 {
        match self {
            Action::RotateLeft => 0,
            Action::RotateRight => 1,
            Action::Fire => 2,
            Action::Noop => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::RotateLeft => "left",
            Action::RotateRight => "right",
            Action::Fire => "fire",
            Action::Noop => "noop",
        }
    }
}

impl TryFrom<i64> for Action {
    type Error = EnvError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::RotateLeft),
            1 => Ok(Action::RotateRight),
            2 => Ok(Action::Fire),
            3 => Ok(Action::Noop),
            other => Err(EnvError::InvalidAction(other)),
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = EnvError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Action::try_from(i64::from(value))
    }
}

impl TryFrom<usize> for Action {
    type Error = EnvError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        let value = i64::try_from(value).map_err(|_| EnvError::InvalidAction(i64::MAX))?;
        Action::try_from(value)
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        action.index()
    }
}
