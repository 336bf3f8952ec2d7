use itertools::Itertools;
use log::debug;
use unordered_pair::UnorderedPair;

use crate::bridge::{BridgeId, CandidateBridge, Segment};
use crate::island::Islands;

/// Two candidate bridges which cannot both be built because their paths would intersect.
pub type CrossingPair = UnorderedPair<BridgeId>;

fn segments_cross(a: &Segment, b: &Segment) -> bool {
    if a.axis == b.axis {
        // two segments on one line may meet at a shared island but never run over each other
        return a.line == b.line && a.span.0.max(b.span.0) < a.span.1.min(b.span.1);
    }

    // touching an endpoint is not a crossing, hence the strict bounds
    (a.span.0 < b.line && b.line < a.span.1) && (b.span.0 < a.line && a.line < b.span.1)
}

/// Find every pair of candidate bridges whose segments intersect, each pair reported once.
pub fn crossing_pairs(bridges: &[CandidateBridge], islands: &Islands) -> Vec<CrossingPair> {
    let segments = bridges.iter()
        .map(|bridge| (bridge.id, bridge.segment(islands)))
        .collect_vec();

    let crossings = segments.iter()
        .tuple_combinations()
        .filter(|((_, a), (_, b))| segments_cross(a, b))
        .map(|((a, _), (b, _))| UnorderedPair(*a, *b))
        .collect_vec();

    debug!("{} of {} candidate bridges take part in {} crossings",
        crossings.iter().flat_map(|pair| [pair.0, pair.1]).unique().count(),
        bridges.len(),
        crossings.len());
    crossings
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::bridge::candidate_bridges;
    use crate::direction::Axis;
    use crate::grid::Grid;

    fn crossings_of(text: &str) -> Vec<CrossingPair> {
        let grid: Grid = text.parse().unwrap();
        let islands = Islands::extract(&grid);
        let bridges = candidate_bridges(&grid, &islands);
        crossing_pairs(&bridges, &islands)
    }

    #[test]
    fn plus_shape_crosses() {
        // (0, 1)-(2, 1) is bridge 0, (1, 0)-(1, 2) is bridge 1
        let crossings = crossings_of("0,1,0\n1,0,1\n0,1,0");
        assert_eq!(crossings, vec![UnorderedPair(BridgeId(0), BridgeId(1))]);
        assert_eq!(crossings[0], UnorderedPair(BridgeId(1), BridgeId(0)));
    }

    #[test]
    fn square_does_not_cross() {
        assert!(crossings_of("2,0,2\n0,0,0\n2,0,2").is_empty());
    }

    #[test]
    fn touching_endpoint_is_not_a_crossing() {
        let horizontal = Segment { axis: Axis::Horizontal, line: 2, span: (0, 4) };
        // vertical bridge ending on the horizontal bridge's row
        let ending_on_line = Segment { axis: Axis::Vertical, line: 2, span: (0, 2) };
        // vertical bridge on the horizontal bridge's end column
        let at_end_column = Segment { axis: Axis::Vertical, line: 4, span: (1, 3) };
        let through = Segment { axis: Axis::Vertical, line: 1, span: (1, 3) };

        assert!(!segments_cross(&horizontal, &ending_on_line));
        assert!(!segments_cross(&horizontal, &at_end_column));
        assert!(segments_cross(&horizontal, &through));
        assert!(segments_cross(&through, &horizontal));
    }

    #[test]
    fn same_axis_segments() {
        let left = Segment { axis: Axis::Horizontal, line: 0, span: (0, 2) };
        let right = Segment { axis: Axis::Horizontal, line: 0, span: (2, 5) };
        let overlapping = Segment { axis: Axis::Horizontal, line: 0, span: (1, 3) };
        let other_row = Segment { axis: Axis::Horizontal, line: 1, span: (0, 2) };

        assert!(!segments_cross(&left, &right));
        assert!(!segments_cross(&left, &other_row));
        assert!(segments_cross(&left, &overlapping));
    }
}
