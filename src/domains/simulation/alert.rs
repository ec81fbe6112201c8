use serde::{Deserialize, Serialize};

/// Global tsunami alert flag. While on, people only head into the
/// half-circle of angles [π, 2π).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertMode(bool);

impl AlertMode {
    pub const OFF: AlertMode = AlertMode(false);
    pub const ON: AlertMode = AlertMode(true);

    pub fn is_on(&self) -> bool {
        self.0
    }

    /// Flip the flag and return the new state.
    pub fn toggle(&mut self) -> AlertMode {
        self.0 = !self.0;
        *self
    }
}

impl From<bool> for AlertMode {
    fn from(on: bool) -> Self {
        AlertMode(on)
    }
}
