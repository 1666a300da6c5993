use crate::board::{Board, RailConnection, SegmentLength};
use crate::city::{City, CityPair, Destination};
use crate::color::RailColor;
use crate::record::NUM_DESTINATIONS;

pub fn city(name: &str) -> City {
    City::new(name, 0, 0)
}

pub fn connection(a: &str, b: &str, length: u8, color: RailColor) -> RailConnection {
    RailConnection::between(
        &city(a),
        &city(b),
        SegmentLength::try_from(length).unwrap(),
        color,
    )
    .unwrap()
}

pub fn destination(a: &str, b: &str) -> Destination {
    Destination::new(CityPair::new(city(a), city(b)).unwrap())
}

/// A-B and A-C.
pub fn destinations() -> [Destination; NUM_DESTINATIONS] {
    [destination("A", "B"), destination("A", "C")]
}

/// Cities A, B and C, with A-B (3, blue) and B-C (4, red).
pub fn three_city_board() -> Board {
    Board::new(
        [city("A"), city("B"), city("C")],
        [
            connection("A", "B", 3, RailColor::Blue),
            connection("B", "C", 4, RailColor::Red),
        ],
    )
    .unwrap()
}
