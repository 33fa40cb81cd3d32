//! Integration tests for module exports.
//!
//! Verify that the public modules and types are reachable via absolute paths
//! and compose the way a trial run uses them.

/// Random sources are accessible and interchangeable behind one trait.
#[test]
fn test_rng_module_exports() {
    use trials_core::rng::{
        ConstantRandom, CryptographicRandom, LinearCongruentialRandom, RandomSource,
        SystemPseudoRandom,
    };

    fn draw(source: &mut dyn RandomSource) -> i32 {
        source.next(0, 9).unwrap()
    }

    let mut sources: Vec<Box<dyn RandomSource>> = vec![
        Box::new(SystemPseudoRandom::from_seed(1)),
        Box::new(CryptographicRandom::new()),
        Box::new(LinearCongruentialRandom::new(0)),
        Box::new(ConstantRandom::new(4)),
    ];

    for source in sources.iter_mut() {
        let v = draw(source.as_mut());
        assert!((0..=9).contains(&v));
    }
}

/// Statistics, histogram and canvas types are accessible.
#[test]
fn test_numeric_module_exports() {
    use trials_core::canvas::{Canvas, MatchCounters, PixelMapper, PixelState};
    use trials_core::histogram::{Bin, Histogram};
    use trials_core::stats::{scale, update_mean, update_variance, RunningStats};
    use trials_core::CoreError;

    let _: fn(usize, usize) -> Result<Canvas, CoreError> = Canvas::new;
    let _ = MatchCounters::default();
    let _ = PixelState::default();

    let histogram = Histogram::new(2, 0.0, 1.0).unwrap();
    let bins: &[Bin] = histogram.bins();
    assert_eq!(bins.len(), 2);

    assert_eq!(update_mean(1, 0.0, 2.0).unwrap(), 2.0);
    assert_eq!(update_variance(1, 0.0, 0.0, 2.0).unwrap(), 8.0);
    assert_eq!(scale(1, 0, 2, 0.0, 1.0).unwrap(), 0.5);
    assert_eq!(RunningStats::new().count(), 0);

    let mapper = PixelMapper::new(3, 3, 100, 0).unwrap();
    assert_eq!(mapper.offset(99).unwrap(), 8);
}

/// A constant source puts every sample in the bin holding its scaled image.
#[test]
fn test_constant_source_single_bin() {
    use trials_core::histogram::Histogram;
    use trials_core::rng::{RandomSource, RandomnessSource, SourceKind};
    use trials_core::stats::scale;

    let mut source = RandomnessSource::from_kind(&SourceKind::Constant { value: 23 });
    let mut histogram = Histogram::new(20, 0.0, 1.0).unwrap();

    for _ in 0..500 {
        let raw = source.next(0, 99).unwrap();
        histogram.add(scale(raw, 0, 99, 0.0, 1.0).unwrap()).unwrap();
    }

    let expected = histogram
        .bin_index(scale(23, 0, 99, 0.0, 1.0).unwrap())
        .unwrap();
    assert_eq!(histogram.bins()[expected].count, 500);
    assert_eq!(histogram.total(), 500);
}
