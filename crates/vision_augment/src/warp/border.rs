use crate::config::FillMode;

/// Maps a (possibly out-of-range) source coordinate back into `[0, len - 1]`
/// according to the fill mode.
///
/// `Constant` leaves the coordinate untouched; the sampler substitutes the
/// fill value for anything outside the image.
pub fn map_coordinate(coord: f32, len: usize, mode: FillMode) -> f32 {
    if mode == FillMode::Constant {
        return coord;
    }
    if len <= 1 {
        return 0.0;
    }

    let last = (len - 1) as f32;
    if (0.0..=last).contains(&coord) {
        return coord;
    }

    let mapped = match mode {
        FillMode::Reflect => {
            let period = 2.0 * len as f32;
            let r = coord.rem_euclid(period);
            if r >= len as f32 {
                period - r - 1.0
            } else {
                r
            }
        }
        FillMode::Wrap => coord.rem_euclid(len as f32),
        FillMode::Nearest | FillMode::Constant => coord,
    };
    mapped.clamp(0.0, last)
}

#[cfg(test)]
mod tests {
    use super::map_coordinate;
    use crate::config::FillMode;

    #[test]
    fn nearest_clamps_to_edges() {
        assert_eq!(map_coordinate(-3.0, 5, FillMode::Nearest), 0.0);
        assert_eq!(map_coordinate(2.5, 5, FillMode::Nearest), 2.5);
        assert_eq!(map_coordinate(7.0, 5, FillMode::Nearest), 4.0);
    }

    #[test]
    fn reflect_repeats_edge_pixels() {
        // d c b a | a b c d | d c b a
        let cases = [
            (-6.0, 2.0),
            (-5.0, 3.0),
            (-4.0, 3.0),
            (-3.0, 2.0),
            (-2.0, 1.0),
            (-1.0, 0.0),
            (0.0, 0.0),
            (3.0, 3.0),
            (4.0, 3.0),
            (5.0, 2.0),
            (7.0, 0.0),
            (8.0, 0.0),
            (9.0, 1.0),
        ];
        for (coord, expected) in cases {
            assert_eq!(map_coordinate(coord, 4, FillMode::Reflect), expected, "coord {coord}");
        }
    }

    #[test]
    fn wrap_tiles_the_image() {
        // a b c d | a b c d | a b c d
        let cases = [(-5.0, 3.0), (-4.0, 0.0), (-1.0, 3.0), (4.0, 0.0), (6.0, 2.0), (9.0, 1.0)];
        for (coord, expected) in cases {
            assert_eq!(map_coordinate(coord, 4, FillMode::Wrap), expected, "coord {coord}");
        }
    }

    #[test]
    fn constant_and_degenerate_lengths() {
        assert_eq!(map_coordinate(-2.5, 4, FillMode::Constant), -2.5);
        assert_eq!(map_coordinate(10.0, 4, FillMode::Constant), 10.0);
        for mode in [FillMode::Reflect, FillMode::Wrap, FillMode::Nearest] {
            assert_eq!(map_coordinate(-3.0, 1, mode), 0.0);
            assert_eq!(map_coordinate(3.0, 1, mode), 0.0);
        }
    }
}
