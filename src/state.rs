use std::ops::BitOr;

/// Activity reported on a stream's state channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum State {
  #[default]
  AtRest,
  Active,
}

impl State {
  #[inline]
  pub fn is_active(self) -> bool { self == State::Active }

  #[inline]
  pub fn from_active(active: bool) -> Self { if active { State::Active } else { State::AtRest } }
}

impl BitOr for State {
  type Output = State;
  #[inline]
  fn bitor(self, rhs: State) -> State { State::from_active(self.is_active() || rhs.is_active()) }
}
