//! Property-based tests for anchored adjustment previews.
//!
//! 1. The preview depends only on the final slider values
//! 2. Default sliders reproduce the anchor exactly
//! 3. Previews never add history entries

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use retouch_core::{AdjustmentPipeline, Adjustments, HistoryStore, Parameter, RgbaImage, Snapshot};

fn parameter_strategy() -> impl Strategy<Value = Parameter> {
    prop_oneof![
        Just(Parameter::BlurRadius),
        Just(Parameter::Brightness),
        Just(Parameter::Contrast),
    ]
}

fn moves_strategy() -> impl Strategy<Value = Vec<(Parameter, i64)>> {
    proptest::collection::vec((parameter_strategy(), -150i64..150), 0..12)
}

fn anchor_strategy() -> impl Strategy<Value = Snapshot> {
    proptest::collection::vec(any::<u8>(), 6 * 5 * 4).prop_map(|raw| {
        Snapshot::new(RgbaImage::from_raw(6, 5, raw).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn preview_depends_only_on_final_values(
        anchor in anchor_strategy(),
        moves in moves_strategy(),
    ) {
        let mut moved = AdjustmentPipeline::anchored_at(Some(anchor.clone()));
        for &(parameter, value) in &moves {
            moved.set_parameter(parameter, value);
            moved.recompute();
        }
        let final_values = *moved.parameters();

        // Replay only the final values, in reverse application order.
        let mut direct = AdjustmentPipeline::anchored_at(Some(anchor.clone()));
        for parameter in Parameter::ALL.iter().rev() {
            direct.set_parameter(*parameter, final_values.get(*parameter));
        }
        let direct_preview = direct.recompute().unwrap().clone();

        let moved_preview = moved.recompute().unwrap().clone();
        prop_assert_eq!(&moved_preview, &direct_preview);
        prop_assert_eq!(
            moved_preview.as_image(),
            &final_values.apply(anchor.as_image()),
        );
    }

    #[test]
    fn defaults_reproduce_anchor(anchor in anchor_strategy()) {
        let mut pipeline = AdjustmentPipeline::anchored_at(Some(anchor.clone()));
        prop_assert!(pipeline.parameters().is_neutral());
        prop_assert_eq!(pipeline.recompute().unwrap(), &anchor);
        prop_assert_eq!(&Adjustments::default().apply(anchor.as_image()), anchor.as_image());
    }

    #[test]
    fn previews_never_commit(anchor in anchor_strategy(), moves in moves_strategy()) {
        let mut store = HistoryStore::new(4).unwrap();
        store.commit(anchor);
        let mut pipeline = AdjustmentPipeline::anchored_at(store.current().cloned());
        for (parameter, value) in moves {
            pipeline.set_parameter(parameter, value);
            pipeline.recompute();
        }
        prop_assert_eq!(store.len(), 1);
        prop_assert_eq!(store.cursor(), Some(0));
    }
}
