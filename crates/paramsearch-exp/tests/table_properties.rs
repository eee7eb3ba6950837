use paramsearch_exp::{assemble, linspace, render_table, CombineMode, PsError};
use proptest::prelude::*;

fn names(count: usize) -> Vec<String> {
    (0..count).map(|idx| format!("p{idx}")).collect()
}

fn sequences(lengths: &[usize]) -> Vec<Vec<f64>> {
    lengths
        .iter()
        .enumerate()
        .map(|(seq, len)| (0..*len).map(|i| (seq * 100 + i) as f64).collect())
        .collect()
}

proptest! {
    #[test]
    fn linspace_endpoints_and_spacing(start in -1e3f64..1e3, stop in -1e3f64..1e3, n in 2usize..64) {
        let points = linspace(start, stop, n);
        prop_assert_eq!(points.len(), n);
        prop_assert_eq!(points[0], start);
        prop_assert_eq!(points[n - 1], stop);
        let step = (stop - start) / (n - 1) as f64;
        for pair in points.windows(2) {
            prop_assert!(((pair[1] - pair[0]) - step).abs() <= 1e-9 * (1.0 + step.abs()));
        }
    }

    #[test]
    fn product_row_count_is_product_of_lengths(lengths in prop::collection::vec(1usize..5, 1..4)) {
        let table = assemble(&names(lengths.len()), &sequences(&lengths), 0, None, CombineMode::Product)
            .unwrap();
        prop_assert_eq!(table.len(), lengths.iter().product::<usize>());
    }

    #[test]
    fn zip_row_count_is_common_length(len in 0usize..40, width in 1usize..5) {
        let lengths = vec![len; width];
        let table = assemble(&names(width), &sequences(&lengths), 0, None, CombineMode::Zip)
            .unwrap();
        prop_assert_eq!(table.len(), len);
    }

    #[test]
    fn zip_rejects_any_length_difference(len in 1usize..20, delta in 1usize..5) {
        let err = assemble(&names(2), &sequences(&[len, len + delta]), 0, None, CombineMode::Zip)
            .unwrap_err();
        prop_assert!(matches!(err, PsError::DimensionMismatch(_)));
    }

    #[test]
    fn devices_are_round_robin_and_balanced(rows in 1usize..200, devices in 1i64..9) {
        let table = assemble(&names(1), &sequences(&[rows]), devices, None, CombineMode::Zip)
            .unwrap();
        let mut counts = vec![0usize; devices as usize];
        for row in table.rows() {
            let id: usize = row.device_code.as_ref().unwrap().to_string().parse().unwrap();
            prop_assert_eq!(id, row.row_code % devices as usize);
            counts[id] += 1;
        }
        let max = *counts.iter().max().unwrap();
        let min = *counts.iter().min().unwrap();
        prop_assert!(max - min <= 1);
    }

    #[test]
    fn header_matches_every_row(lengths in prop::collection::vec(1usize..4, 1..4), devices in 0i64..3) {
        let table = assemble(&names(lengths.len()), &sequences(&lengths), devices, None, CombineMode::Product)
            .unwrap();
        prop_assert_eq!(table.width(), 1 + usize::from(devices > 0) + lengths.len());
        prop_assert_eq!(table.has_devices(), devices > 0);
        for (idx, row) in table.rows().iter().enumerate() {
            prop_assert_eq!(row.width(), table.width());
            prop_assert_eq!(row.row_code, idx);
        }
        let text = String::from_utf8(render_table(&table, 3).unwrap()).unwrap();
        for line in text.lines() {
            prop_assert_eq!(line.split(',').count(), table.width());
        }
    }
}
