// Round resolution for rock-paper-scissors.
//
// `outcome` is a pure function of the two submitted moves, computed from one
// side's perspective. The registry calls it twice per round, once per member,
// with the arguments swapped. Tie iff equal; otherwise the cyclic dominance
// relation decides: rock beats scissors, paper beats rock, scissors beats
// paper.

use roshambo_protocol::message::{Move, RoundOutcome};

/// The move that `mv` defeats under the cyclic dominance relation.
fn beats(mv: Move) -> Move {
    match mv {
        Move::Rock => Move::Scissors,
        Move::Paper => Move::Rock,
        Move::Scissors => Move::Paper,
    }
}

/// Resolve a round from one side's perspective.
pub fn outcome(mine: Move, theirs: Move) -> RoundOutcome {
    if mine == theirs {
        RoundOutcome::Tie
    } else if beats(mine) == theirs {
        RoundOutcome::Win
    } else {
        RoundOutcome::Lose
    }
}
