use popforge::optimizer::{NoProgress, OptimizationOptions, Optimizer};
use popforge::output::{build_records, counts_from_records};
use popforge::sample::{Individual, SamplePool};
use popforge::table::{l1_error, Area, AttributeTable};
use popforge::SynthesisContext;
use proptest::prelude::*;

// --- STRATEGIES ---

prop_compose! {
    fn arb_pool()(values in proptest::collection::vec(0u8..2, 1..20)) -> SamplePool {
        SamplePool::new(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| Individual::new(format!("p{}", i), v).unwrap())
                .collect(),
        )
        .unwrap()
    }
}

prop_compose! {
    fn arb_table()(rows in proptest::collection::vec((0u32..15, 0u32..15), 1..8)) -> AttributeTable {
        AttributeTable::from_areas(
            rows.into_iter()
                .enumerate()
                .map(|(i, (a, b))| Area::new(format!("area{}", i), a, b))
                .collect(),
        )
        .unwrap()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_synthesis_invariants(pool in arb_pool(), target in arb_table(), seed in any::<u64>()) {
        let mut ctx = SynthesisContext::new(pool, target, Some(seed));
        let report = Optimizer::new(OptimizationOptions::default())
            .run(&mut ctx, Some(seed), NoProgress)
            .unwrap();

        for area in 0..ctx.num_areas() {
            let out = &report.outcomes[area];
            let size = ctx.world().population(area).len();

            // Population size is fixed by the target.
            prop_assert_eq!(size, ctx.target().total_population(area));

            // Rebuilt counts cover every member.
            let [c0, c1] = ctx.current_counts(area);
            prop_assert_eq!((c0 + c1) as usize, size);

            // Error is the L1 distance and never worsens.
            let err = ctx.error(area);
            prop_assert_eq!(err, l1_error(ctx.target().counts(area), ctx.current_counts(area)));
            prop_assert_eq!(err, out.final_error);
            prop_assert!(out.final_error <= out.initial_error);
        }
    }

    #[test]
    fn test_records_round_trip_counts(pool in arb_pool(), target in arb_table(), seed in any::<u64>()) {
        let mut ctx = SynthesisContext::new(pool, target, Some(seed));
        Optimizer::new(OptimizationOptions::default())
            .run(&mut ctx, Some(seed), NoProgress)
            .unwrap();

        let records = build_records(&ctx);
        prop_assert_eq!(records.len(), ctx.target().grand_total());

        let from_records = counts_from_records(&records).unwrap();
        for area in 0..ctx.num_areas() {
            let id = ctx.target().id(area);
            let expected = ctx.current_counts(area);
            let got = from_records.get(id).copied().unwrap_or([0, 0]);
            prop_assert_eq!(got, expected);
        }
    }
}
