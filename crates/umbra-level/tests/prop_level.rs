use proptest::prelude::*;
use umbra_level::{Level, LevelFile, Tile, decode_run_length};

fn tile() -> impl Strategy<Value = Tile> {
    prop::sample::select(Tile::ALL.to_vec())
}

fn runs() -> impl Strategy<Value = Vec<(usize, Tile)>> {
    prop::collection::vec((0usize..=40, tile()), 0..=12)
}

fn encode(runs: &[(usize, Tile)]) -> String {
    runs.iter().map(|(n, t)| format!("{n}{}", t.code())).collect()
}

fn tile_rows() -> impl Strategy<Value = Vec<Vec<Tile>>> {
    (1usize..=10, 1usize..=10)
        .prop_flat_map(|(w, h)| prop::collection::vec(prop::collection::vec(tile(), w), h))
}

proptest! {
    // Decoded length is the sum of the run counts, in run order
    #[test]
    fn run_length_expands_to_counts(runs in runs()) {
        let decoded = decode_run_length(&encode(&runs)).unwrap();
        prop_assert_eq!(decoded.chars().count(), runs.iter().map(|(n, _)| n).sum::<usize>());
        let expected: String = runs.iter().flat_map(|(n, t)| std::iter::repeat_n(t.code(), *n)).collect();
        prop_assert_eq!(decoded, expected);
    }

    // A level file and plain rows of the same tiles load identically
    #[test]
    fn level_file_matches_rows(rows in tile_rows()) {
        let (w, h) = (rows[0].len(), rows.len());
        let runs: Vec<_> = rows.iter().flatten().map(|t| (1, *t)).collect();
        let file = LevelFile {
            name: "p".into(),
            width: w,
            height: h,
            tiles: encode(&runs),
            player: umbra_level::LightSpec { col: 0, row: 0, light: 255 },
            lights: Vec::new(),
        };
        let from_file = Level::from_file(file).unwrap();
        let codes: Vec<String> = rows.iter().map(|r| r.iter().map(|t| t.code()).collect()).collect();
        let code_refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        let from_rows = Level::from_rows("p", &code_refs).unwrap();
        prop_assert_eq!(from_file.tiles.to_rows(), from_rows.tiles.to_rows());
    }

    // Transparency and static lights follow the tile palette cell by cell
    #[test]
    fn maps_follow_tile_properties(rows in tile_rows()) {
        let codes: Vec<String> = rows.iter().map(|r| r.iter().map(|t| t.code()).collect()).collect();
        let code_refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        let level = Level::from_rows("p", &code_refs).unwrap();
        let transparency = level.transparency_map();
        for ((col, row), t) in level.tiles.iter() {
            prop_assert_eq!(transparency[(col, row)], t.is_transparent());
        }
        let lights = level.static_lights();
        prop_assert_eq!(lights.len(), rows.iter().flatten().filter(|t| t.is_luminous()).count());
        for l in lights {
            prop_assert_eq!(l.intensity, level.tiles[(l.col, l.row)].emission());
        }
    }
}
