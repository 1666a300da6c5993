//! Legality of acquiring a connection, as a pure predicate over an [`ActiveView`].

use crate::board::{Board, RailConnection};
use crate::view::ActiveView;

/// Whether the active participant behind `view` may acquire `connection` on `board`.
///
/// All of the following must hold:
///   * The connection exists on the board, with the same length as proposed.
///   * Nobody owns it yet.
///   * The participant has at least as many pieces left as the connection's length.
///   * The participant holds at least as many cards of the connection's color as its length.
///
/// # Example
/// ```
/// use trains::board::{Board, RailConnection, SegmentLength};
/// use trains::checker::can_acquire;
/// use trains::city::{City, CityPair, Destination};
/// use trains::color::{Hand, RailColor};
/// use trains::record::ParticipantRecord;
/// use trains::view::ActiveView;
///
/// let (a, b, c) = (City::new("A", 0, 0), City::new("B", 1, 0), City::new("C", 2, 0));
/// let ab = RailConnection::between(&a, &b, SegmentLength::Three, RailColor::Blue).unwrap();
/// let board = Board::new([a.clone(), b.clone(), c.clone()], [ab.clone()]).unwrap();
///
/// let destinations = [
///     Destination::new(CityPair::new(a.clone(), b.clone()).unwrap()),
///     Destination::new(CityPair::new(a, c).unwrap()),
/// ];
/// let hand = Hand::from_cards(&[RailColor::Blue; 3]);
/// let view = ActiveView::new(ParticipantRecord::new(hand, 45, destinations), Vec::new());
///
/// assert!(can_acquire(&view, &board, &ab));
/// ```
pub fn can_acquire(view: &ActiveView, board: &Board, connection: &RailConnection) -> bool {
    exists_on_board(board, connection)
        && !view.is_owned(connection)
        && has_enough_pieces(view, connection)
        && has_enough_cards(view, connection)
}

/// Every connection of the board the active participant may acquire right now.
pub fn acquirable_connections<'a>(
    view: &'a ActiveView,
    board: &'a Board,
) -> impl Iterator<Item = &'a RailConnection> + 'a {
    view.unoccupied_connections(board).filter(move |connection| {
        has_enough_pieces(view, connection) && has_enough_cards(view, connection)
    })
}

#[inline]
fn exists_on_board(board: &Board, connection: &RailConnection) -> bool {
    board
        .connection(connection)
        .map_or(false, |on_board| on_board.length() == connection.length())
}

#[inline]
fn has_enough_pieces(view: &ActiveView, connection: &RailConnection) -> bool {
    view.pieces() >= connection.length().value()
}

#[inline]
fn has_enough_cards(view: &ActiveView, connection: &RailConnection) -> bool {
    view.hand().count(connection.color()) >= connection.length().value()
}
