use serde::Serialize;
use std::collections::BTreeSet;

/// Final score of a participant that made it to the end of the game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PlayerScore {
    pub name: String,
    pub score: i32,
}

impl PlayerScore {
    pub fn new(name: impl Into<String>, score: i32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Outcome of a whole game, handed back to whoever organized it.
///
/// Every participant of the game appears exactly once: either ranked, or removed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct GameEndReport {
    /// Participants that were never removed, by descending score.
    ///
    /// Participants with equal scores keep their turn order.
    ranking: Vec<PlayerScore>,
    /// Participants removed for breaking the rules, failing, or not answering in time.
    removed: BTreeSet<String>,
}

impl GameEndReport {
    /// Builds a report out of unordered scores, ranking them.
    ///
    /// # Example
    /// ```
    /// use trains::report::{GameEndReport, PlayerScore};
    /// use std::collections::BTreeSet;
    ///
    /// let report = GameEndReport::new(
    ///     vec![
    ///         PlayerScore::new("ada", 12),
    ///         PlayerScore::new("bob", 30),
    ///         PlayerScore::new("cyd", 30),
    ///     ],
    ///     BTreeSet::from([String::from("eve")]),
    /// );
    ///
    /// assert_eq!(report.ranking()[0].name, "bob");
    /// assert_eq!(report.winners(), vec!["bob", "cyd"]);
    /// ```
    pub fn new(mut scores: Vec<PlayerScore>, removed: BTreeSet<String>) -> Self {
        // Stable sort: equal scores keep their turn order.
        scores.sort_by(|a, b| b.score.cmp(&a.score));

        Self {
            ranking: scores,
            removed,
        }
    }

    #[inline]
    pub fn ranking(&self) -> &[PlayerScore] {
        &self.ranking
    }

    #[inline]
    pub fn removed(&self) -> &BTreeSet<String> {
        &self.removed
    }

    /// Names of every participant tied at the top score. Empty if nobody made it to the end.
    pub fn winners(&self) -> Vec<&str> {
        let top = match self.ranking.first() {
            Some(first) => first.score,
            None => return Vec::new(),
        };

        self.ranking
            .iter()
            .take_while(|player| player.score == top)
            .map(|player| player.name.as_str())
            .collect()
    }

    /// Moves a ranked participant to the removed ones, e.g. when it fails after scoring.
    pub(crate) fn remove(&mut self, name: &str) {
        if let Some(position) = self.ranking.iter().position(|player| player.name == name) {
            let player = self.ranking.remove(position);
            self.removed.insert(player.name);
        }
    }
}
