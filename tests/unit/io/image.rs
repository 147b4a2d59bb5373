//! Tests for image file I/O and the tile naming scheme

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use std::fs;
    use tilestitch::TilingError;
    use tilestitch::io::image::{
        allowed_file, list_tile_files, load_rgb, load_tile, parse_tile_file_name, save_image,
        save_tile, split_tile_file_name, tile_file_name, tile_position,
    };
    use tilestitch::spatial::tiles::Tile;

    fn sample_block() -> RgbImage {
        RgbImage::from_fn(6, 4, |x, y| Rgb([(x * 40) as u8, (y * 60) as u8, 7]))
    }

    // Tests accepted extensions and modality exclusions
    // Verified by dropping the modality check
    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("slide.png"));
        assert!(allowed_file("slide_01.jpg"));
        assert!(allowed_file("slide.tif"));
        assert!(allowed_file("slide_r0_c1.png"));

        assert!(!allowed_file("slide.gif"));
        assert!(!allowed_file("slide.PNG"));
        assert!(!allowed_file("notes.txt"));
        assert!(!allowed_file("slide_Seg.png"));
        assert!(!allowed_file("slide_DAPI.tif"));
        assert!(!allowed_file("case_3_SegOverlaid.png"));
    }

    // Tests tile names encode row then column
    #[test]
    fn test_tile_file_name() {
        let tile = Tile::new(2, 5, sample_block());
        assert_eq!(tile_file_name("slide", &tile, "png"), "slide_r2_c5.png");
    }

    // Tests parsing recovers the position and tolerates underscores in the stem
    // Verified by swapping row and column in the parser
    #[test]
    fn test_parse_tile_file_name() {
        assert_eq!(parse_tile_file_name("slide_r2_c5.png"), Some((2, 5)));
        assert_eq!(parse_tile_file_name("case_01_r0_c10.jpg"), Some((0, 10)));

        assert_eq!(parse_tile_file_name("slide.png"), None);
        assert_eq!(parse_tile_file_name("slide_c5_r2.png"), None);
        assert_eq!(parse_tile_file_name("r2_c5.png"), None);
        assert_eq!(parse_tile_file_name("slide_r-1_c5.png"), None);
        assert_eq!(parse_tile_file_name("slide_rx_c5.png"), None);
    }

    // Tests an unparseable name surfaces as InvalidTileName
    #[test]
    fn test_tile_position_error() {
        let result = tile_position(std::path::Path::new("dir/unrelated.png"));
        assert!(matches!(
            result,
            Err(TilingError::InvalidTileName { ref name }) if name == "unrelated.png"
        ));
    }

    // Tests a saved tile loads back with identical pixels and position
    // Verified by writing tiles under the wrong name
    #[test]
    fn test_save_and_load_tile() {
        let dir = tempfile::tempdir().unwrap();
        let tile = Tile::new(1, 3, sample_block());

        let path = save_tile(&tile, dir.path(), "slide", "png").unwrap();
        assert!(path.ends_with("slide_r1_c3.png"));

        let loaded = load_tile(&path).unwrap();
        assert_eq!(loaded, tile);
    }

    // Tests missing parent directories are created on save
    #[test]
    fn test_save_image_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.png");

        save_image(&sample_block(), &path).unwrap();
        assert!(path.exists());
        assert_eq!(load_rgb(&path).unwrap(), sample_block());
    }

    // Tests loading a missing file reports its path
    #[test]
    fn test_load_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.png");

        match load_rgb(&path) {
            Err(TilingError::ImageLoad { path: reported, .. }) => assert_eq!(reported, path),
            other => unreachable!("Expected ImageLoad error, got {other:?}"),
        }
    }

    // Tests directory listing keeps only tile images, sorted by name
    // Verified by removing the naming filter
    #[test]
    fn test_list_tile_files() {
        let dir = tempfile::tempdir().unwrap();
        for (row, col) in [(1, 0), (0, 1), (0, 0)] {
            save_tile(&Tile::new(row, col, sample_block()), dir.path(), "s", "png").unwrap();
        }
        save_image(&sample_block(), &dir.path().join("s_Seg.png")).unwrap();
        save_image(&sample_block(), &dir.path().join("overview.png")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let files = list_tile_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["s_r0_c0.png", "s_r0_c1.png", "s_r1_c0.png"]);
    }

    // Tests a directory mixing tiles of two images is rejected
    // Verified by letting the later stem overwrite positions
    #[test]
    fn test_list_rejects_mixed_stems() {
        let dir = tempfile::tempdir().unwrap();
        for stem in ["left", "right"] {
            save_tile(&Tile::new(0, 0, sample_block()), dir.path(), stem, "png").unwrap();
        }

        match list_tile_files(dir.path()) {
            Err(TilingError::InvalidParameter { reason, .. }) => {
                assert!(reason.contains("left"));
                assert!(reason.contains("right"));
            }
            other => unreachable!("Expected InvalidParameter error, got {other:?}"),
        }
    }

    // Tests the source stem is recovered along with the position
    #[test]
    fn test_split_tile_file_name() {
        assert_eq!(split_tile_file_name("case_01_r3_c4.png"), Some(("case_01", 3, 4)));
        assert_eq!(split_tile_file_name("r3_c4.png"), None);
    }

    // Tests listing a missing directory fails with the directory path
    #[test]
    fn test_list_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        match list_tile_files(&missing) {
            Err(TilingError::FileSystem { path, .. }) => assert_eq!(path, missing),
            other => unreachable!("Expected FileSystem error, got {other:?}"),
        }
    }
}
