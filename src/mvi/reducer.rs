//! Reducer trait.

use super::intent::Intent;
use super::state::StoreState;

/// Reducer transforms state based on intents: `(State, Intent) -> State`.
///
/// Takes `&self` so collaborators such as id sources are injected rather
/// than reached through globals. Apart from those, reducing must not have
/// side effects beyond logging.
pub trait Reducer {
    type State: StoreState;
    type Intent: Intent;

    fn reduce(&self, state: Self::State, intent: Self::Intent) -> Self::State;
}
