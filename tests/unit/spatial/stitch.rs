//! Tests for stitching tiles back into one image

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use tilestitch::TilingError;
    use tilestitch::math::fidelity::mean_squared_error;
    use tilestitch::spatial::grid::GridShape;
    use tilestitch::spatial::size::output_size;
    use tilestitch::spatial::stitch::{Stitcher, stitch};
    use tilestitch::spatial::tiles::{Tile, generate_tiles, resize_exact};

    fn ramp(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 2 % 256) as u8, (y * 3 % 256) as u8, 128])
        })
    }

    fn solid(size: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(size, size, Rgb([value, value, value]))
    }

    // Tests an identity round trip reproduces a normalized image exactly
    // Verified by offsetting the crop by one pixel
    #[test]
    fn test_identity_round_trip_is_exact() {
        for overlap in [0, 1, 8, 15] {
            let source = ramp(96, 64);
            let tiles = generate_tiles(&source, 32, overlap).unwrap();
            let stitched = stitch(&tiles, 32, overlap).unwrap();
            assert_eq!(stitched, source, "overlap {overlap}");
        }
    }

    // Tests an unnormalized source comes back at its normalized size
    #[test]
    fn test_round_trip_matches_normalized_source() {
        let source = ramp(100, 70);
        let (width, height) = output_size(100, 70, 32).unwrap();
        assert_eq!((width, height), (96, 64));

        let tiles = generate_tiles(&source, 32, 8).unwrap();
        let stitched = stitch(&tiles, 32, 8).unwrap();
        assert_eq!(stitched, resize_exact(&source, width, height));
    }

    // Tests the output doesn't depend on arrival order
    // Verified by pasting positions by sequence index
    #[test]
    fn test_order_independence() {
        let source = ramp(128, 96);
        let mut tiles = generate_tiles(&source, 32, 4).unwrap();
        let expected = stitch(&tiles, 32, 4).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5 {
            tiles.shuffle(&mut rng);
            assert_eq!(stitch(&tiles, 32, 4).unwrap(), expected);
        }
        tiles.reverse();
        assert_eq!(stitch(&tiles, 32, 4).unwrap(), expected);
    }

    // Tests a model that doubles resolution is resampled back before pasting
    #[test]
    fn test_resolution_changing_transform() {
        let source = ramp(100, 70);
        let reference = resize_exact(&source, 96, 64);

        let processed: Vec<Tile> = generate_tiles(&source, 32, 8)
            .unwrap()
            .into_iter()
            .map(|tile| {
                tile.try_map_block(|block| {
                    let (w, h) = block.dimensions();
                    Ok(resize_exact(&block, w * 2, h * 2))
                })
                .unwrap()
            })
            .collect();
        assert!(processed.iter().all(|t| t.block.width() == 96));

        let stitched = stitch(&processed, 32, 8).unwrap();
        assert_eq!(stitched.dimensions(), (96, 64));
        let mse = mean_squared_error(&stitched, &reference).unwrap();
        assert!(mse < 25.0, "mse {mse}");
    }

    // Tests canvas size comes from the largest indices present
    #[test]
    fn test_inferred_canvas_size() {
        let tiles = vec![
            Tile::new(0, 0, solid(10, 50)),
            Tile::new(2, 1, solid(10, 90)),
        ];
        let stitched = stitch(&tiles, 10, 0).unwrap();
        assert_eq!(stitched.dimensions(), (20, 30));

        assert_eq!(*stitched.get_pixel(5, 5), Rgb([50, 50, 50]));
        assert_eq!(*stitched.get_pixel(15, 25), Rgb([90, 90, 90]));
        // Positions nobody supplied stay black
        assert_eq!(*stitched.get_pixel(15, 5), Rgb([0, 0, 0]));
    }

    // Tests a declared grid keeps room for a missing trailing row
    // Verified by inferring the grid from the tiles
    #[test]
    fn test_declared_shape_tolerates_gaps() {
        let t = 16;
        let tiles = vec![Tile::new(0, 0, solid(t, 200)), Tile::new(0, 1, solid(t, 100))];
        let stitcher = Stitcher::new(t, 0)
            .unwrap()
            .with_shape(GridShape::new(2, 2));

        let stitched = stitcher.stitch(&tiles).unwrap();
        assert_eq!(stitched.dimensions(), (2 * t, 2 * t));
        assert_eq!(*stitched.get_pixel(0, 0), Rgb([200, 200, 200]));
        assert_eq!(*stitched.get_pixel(t, 0), Rgb([100, 100, 100]));
        for x in 0..2 * t {
            assert_eq!(*stitched.get_pixel(x, t), Rgb([0, 0, 0]));
            assert_eq!(*stitched.get_pixel(x, 2 * t - 1), Rgb([0, 0, 0]));
        }

        let inferred = stitch(&tiles, t, 0).unwrap();
        assert_eq!(inferred.dimensions(), (2 * t, t));
    }

    // Tests error paths
    #[test]
    fn test_errors() {
        assert!(matches!(
            stitch(&[], 16, 0),
            Err(TilingError::EmptyInput { .. })
        ));
        assert!(matches!(
            stitch(&[Tile::new(0, 0, solid(4, 0))], 0, 0),
            Err(TilingError::InvalidParameter { .. })
        ));

        let declared = Stitcher::new(8, 0)
            .unwrap()
            .with_shape(GridShape::new(1, 1));
        assert!(matches!(
            declared.stitch(&[Tile::new(0, 1, solid(8, 0))]),
            Err(TilingError::InvalidParameter { .. })
        ));

        // A declared grid doesn't excuse an empty result set
        let declared = Stitcher::new(8, 0)
            .unwrap()
            .with_shape(GridShape::new(2, 2));
        assert!(matches!(
            declared.stitch(&[]),
            Err(TilingError::EmptyInput { .. })
        ));
    }

    // Tests an overlap whose block size overflows is rejected up front
    // Verified by saturating the block size
    #[test]
    fn test_overflowing_overlap() {
        assert!(matches!(
            Stitcher::new(4, u32::MAX / 2),
            Err(TilingError::InvalidParameter { .. })
        ));
        assert!(matches!(
            stitch(&[Tile::new(0, 0, solid(4, 0))], 4, u32::MAX / 2),
            Err(TilingError::InvalidParameter { .. })
        ));
        assert_eq!(Stitcher::new(4, 2).unwrap().block_size(), 8);

        // A row index at the top of the range can't size an inferred grid
        assert!(matches!(
            stitch(&[Tile::new(u32::MAX, 0, solid(4, 0))], 4, 0),
            Err(TilingError::InvalidParameter { .. })
        ));
    }

    // Tests trimming resamples then removes the halo
    #[test]
    fn test_trim() {
        let stitcher = Stitcher::new(8, 2).unwrap();
        assert_eq!(stitcher.block_size(), 12);

        let mut block = solid(12, 255);
        for y in 2..10 {
            for x in 2..10 {
                block.put_pixel(x, y, Rgb([10, 20, 30]));
            }
        }
        let trimmed = stitcher.trim(&block);
        assert_eq!(trimmed, RgbImage::from_pixel(8, 8, Rgb([10, 20, 30])));

        assert_eq!(stitcher.trim(&solid(24, 77)), solid(8, 77));
    }

    // Tests the incremental canvas reports progress and keeps the latest duplicate
    #[test]
    fn test_canvas_tracks_placement() {
        let stitcher = Stitcher::new(4, 0).unwrap();
        let mut canvas = stitcher.canvas(GridShape::new(1, 2));
        assert_eq!(canvas.missing(), vec![(0, 0), (0, 1)]);

        canvas.place(&Tile::new(0, 1, solid(4, 10))).unwrap();
        assert_eq!(canvas.missing(), vec![(0, 0)]);
        assert!(!canvas.is_complete());

        canvas.place(&Tile::new(0, 0, solid(4, 20))).unwrap();
        canvas.place(&Tile::new(0, 0, solid(4, 30))).unwrap();
        assert!(canvas.is_complete());
        assert_eq!(canvas.shape(), GridShape::new(1, 2));

        let image = canvas.finish();
        assert_eq!(*image.get_pixel(0, 0), Rgb([30, 30, 30]));
        assert_eq!(*image.get_pixel(4, 0), Rgb([10, 10, 10]));
    }
}
