//! The bracket engine: builds the pairing tree and resolves it.

use crate::decision::DecisionSource;
use crate::shuffle::Shuffler;
use crate::tree::{BracketTree, NodeId};
use crate::{BracketError, BracketResult, Contest, Match, MatchId, match_count};
use log::{debug, info, warn};

/// A single-elimination bracket.
///
/// Owns every match it creates. Matches are kept in creation order, which is
/// also round order: all round-1 matches first, then round 2, up to the final.
#[derive(Debug, Clone)]
pub struct Bracket {
    participants: Vec<String>,
    tree: BracketTree,
    matches: Vec<Match>,
    root: NodeId,
    next_match_id: MatchId,
    /// Post-order resolution schedule and how far through it we are.
    schedule: Vec<NodeId>,
    cursor: usize,
}

impl Bracket {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Shuffle `participants` once, pair them up and build parent rounds until
    /// a single final remains.
    ///
    /// Odd entrants left over in round 1 get a bye that is won on the spot. An
    /// odd node left over in a later round is promoted alone into its parent,
    /// which then resolves as a bye.
    pub fn build<S>(participants: &[String], shuffler: &mut S) -> BracketResult<Self>
    where
        S: Shuffler + ?Sized,
    {
        if participants.len() < 2 {
            return Err(BracketError::InvalidInput {
                count: participants.len(),
            });
        }

        let shuffled = shuffler.shuffle(participants);
        if shuffled.len() < 2 {
            return Err(BracketError::InvalidInput {
                count: shuffled.len(),
            });
        }

        let mut bracket = Self {
            participants: participants.to_vec(),
            tree: BracketTree::default(),
            matches: Vec::with_capacity(match_count(shuffled.len())),
            root: NodeId(0),
            next_match_id: 1,
            schedule: Vec::new(),
            cursor: 0,
        };

        let mut level = bracket.create_first_round(&shuffled)?;
        let mut round = 2;
        while level.len() > 1 {
            level = bracket.create_next_round(&level, round);
            round += 1;
        }

        let Some(&root) = level.first() else {
            return Err(BracketError::InvalidInput { count: 0 });
        };
        bracket.root = root;
        bracket.schedule = bracket.tree.post_order(root);
        debug_assert_eq!(bracket.tree.len(), bracket.matches.len());

        debug!(
            "built bracket: {} participants, {} matches, {} rounds",
            bracket.participants.len(),
            bracket.matches.len(),
            bracket.round_count()
        );
        Ok(bracket)
    }

    fn create_first_round(&mut self, shuffled: &[String]) -> BracketResult<Vec<NodeId>> {
        let mut leaves = Vec::with_capacity(shuffled.len().div_ceil(2));
        for pair in shuffled.chunks(2) {
            let index = self.create_match(1);
            self.matches[index].assign_slots(pair.first().cloned(), pair.get(1).cloned())?;
            if self.matches[index].is_bye() {
                debug!(
                    "match {}: {} receives a first-round bye",
                    self.matches[index].id(),
                    pair[0]
                );
            }
            leaves.push(self.tree.push_leaf(index));
        }
        Ok(leaves)
    }

    fn create_next_round(&mut self, nodes: &[NodeId], round: u32) -> Vec<NodeId> {
        let mut parents = Vec::with_capacity(nodes.len().div_ceil(2));
        for pair in nodes.chunks(2) {
            let index = self.create_match(round);
            parents.push(self.tree.push_parent(index, pair[0], pair.get(1).copied()));
        }
        parents
    }

    fn create_match(&mut self, round: u32) -> usize {
        let id = self.next_match_id;
        self.next_match_id += 1;
        self.matches.push(Match::new(id, round));
        self.matches.len() - 1
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    /// Resolve every remaining match in post-order, asking `source` for each
    /// two-sided match exactly once. Returns the champion.
    ///
    /// Stops at the first rejected or failed decision; matches already decided
    /// stay decided, and calling `resolve` again picks up where it stopped.
    /// Resolving a finished bracket is a no-op.
    pub fn resolve<D>(&mut self, source: &mut D) -> BracketResult<&str>
    where
        D: DecisionSource + ?Sized,
    {
        while let Some(contest) = self.next_contest()? {
            let winner = source
                .decide(&contest.slot_a, &contest.slot_b)
                .map_err(|reason| BracketError::DecisionFailed {
                    match_id: contest.match_id,
                    reason,
                })?;
            self.submit_winner(contest.match_id, &winner)?;
        }
        self.winner()
    }

    /// Advance to the next match that needs a decision and return it.
    ///
    /// Fills slots from feeder winners and completes byes along the way. Returns
    /// the same contest until a winner is submitted for it, and `None` once the
    /// bracket is resolved.
    pub fn next_contest(&mut self) -> BracketResult<Option<Contest>> {
        while let Some(&node_id) = self.schedule.get(self.cursor) {
            let node = *self.tree.node(node_id);
            let index = node.match_index;

            if !self.matches[index].has_slots() {
                let slot_a = node.left.map(|child| self.feeder_winner(child)).transpose()?;
                let slot_b = node.right.map(|child| self.feeder_winner(child)).transpose()?;
                self.matches[index].assign_slots(slot_a, slot_b)?;
                let placed = &self.matches[index];
                if let (true, Some(winner)) = (placed.is_bye(), placed.winner()) {
                    debug!("match {}: {winner} advances unopposed", placed.id());
                }
            }

            let current = &self.matches[index];
            if current.is_completed() {
                self.cursor += 1;
                continue;
            }

            let (Some(slot_a), Some(slot_b)) = (current.slot_a(), current.slot_b()) else {
                return Err(BracketError::EmptyMatch {
                    match_id: current.id(),
                });
            };
            return Ok(Some(Contest {
                match_id: current.id(),
                round: current.round(),
                slot_a: slot_a.to_string(),
                slot_b: slot_b.to_string(),
            }));
        }
        Ok(None)
    }

    /// Record the winner of the pending match.
    pub fn submit_winner(&mut self, match_id: MatchId, winner: &str) -> BracketResult<()> {
        let Some(contest) = self.next_contest()? else {
            return Err(BracketError::OutOfTurn {
                expected: None,
                got: match_id,
            });
        };
        if contest.match_id != match_id {
            return Err(BracketError::OutOfTurn {
                expected: Some(contest.match_id),
                got: match_id,
            });
        }

        let index = self.tree.node(self.schedule[self.cursor]).match_index;
        if let Err(e) = self.matches[index].record_winner(winner) {
            warn!("rejected decision for match {match_id}: {e}");
            return Err(e);
        }
        info!(
            "round {}, match {match_id}: {winner} beats {}",
            contest.round,
            if contest.slot_a == winner { &contest.slot_b } else { &contest.slot_a }
        );
        self.cursor += 1;

        // Trailing byes complete without input, so settle them now.
        self.next_contest()?;
        if let Ok(champion) = self.winner() {
            info!("champion: {champion}");
        }
        Ok(())
    }

    fn feeder_winner(&self, child: NodeId) -> BracketResult<String> {
        self.matches[self.tree.node(child).match_index]
            .winner()
            .map(str::to_string)
            .ok_or(BracketError::NotResolved)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The champion. Fails until the final has been decided.
    pub fn winner(&self) -> BracketResult<&str> {
        let root = self.root_match();
        match root.winner() {
            Some(winner) if root.is_completed() => Ok(winner),
            _ => Err(BracketError::NotResolved),
        }
    }

    /// The final completes last, so a decided final means every match is decided.
    pub fn is_resolved(&self) -> bool {
        self.root_match().is_completed()
    }

    /// Full history in creation order. Fails until the bracket is resolved.
    pub fn all_matches(&self) -> BracketResult<&[Match]> {
        if !self.is_resolved() {
            return Err(BracketError::NotResolved);
        }
        Ok(&self.matches)
    }

    /// Live view of every match in creation order, decided or not.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn root_match(&self) -> &Match {
        &self.matches[self.tree.node(self.root).match_index]
    }

    pub fn match_by_id(&self, id: MatchId) -> Option<&Match> {
        // Ids are handed out sequentially from 1.
        (id as usize)
            .checked_sub(1)
            .and_then(|index| self.matches.get(index))
    }

    pub fn round_count(&self) -> u32 {
        self.root_match().round()
    }

    pub fn matches_in_round(&self, round: u32) -> Vec<&Match> {
        self.matches.iter().filter(|m| m.round() == round).collect()
    }

    /// The match waiting on a decision, if its contestants are already known.
    pub fn pending(&self) -> Option<&Match> {
        let node = self.tree.node(*self.schedule.get(self.cursor)?);
        let current = &self.matches[node.match_index];
        (current.has_slots() && !current.is_completed()).then_some(current)
    }

    pub fn completed_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_completed()).count()
    }

    /// Id of the match the winner of `id` moves on to. `None` for the final.
    pub fn feeds_into(&self, id: MatchId) -> Option<MatchId> {
        let node = self.node_for(id)?;
        let parent = self.tree.node(node).parent?;
        Some(self.matches[self.tree.node(parent).match_index].id())
    }

    /// Matches from `id` up to and including the final.
    pub fn path_to_final(&self, id: MatchId) -> Vec<&Match> {
        let Some(node) = self.node_for(id) else {
            return Vec::new();
        };
        self.tree
            .ancestry(node)
            .into_iter()
            .map(|n| &self.matches[self.tree.node(n).match_index])
            .collect()
    }

    /// The champion's run, from their first-round match to the final.
    pub fn champion_path(&self) -> BracketResult<Vec<&Match>> {
        let champion = self.winner()?;
        let entered = |m: &&Match| m.slot_a() == Some(champion) || m.slot_b() == Some(champion);
        let Some(start) = self
            .matches
            .iter()
            .filter(|m| m.round() == 1)
            .find(entered)
        else {
            return Err(BracketError::NotResolved);
        };
        Ok(self.path_to_final(start.id()))
    }

    fn node_for(&self, id: MatchId) -> Option<NodeId> {
        // Node i wraps match i.
        let index = (id as usize).checked_sub(1)?;
        (index < self.tree.len()).then_some(NodeId(index))
    }
}
