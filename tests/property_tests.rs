use kmedian::cluster::{cluster, Clustering, KMedians};
use kmedian::normalize::normalize;
use proptest::prelude::*;

fn points(max: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(-100.0f64..100.0, 2), 1..max)
}

proptest! {
    #[test]
    fn prop_kmedians_all_assigned(
        data in points(30),
        k in 1usize..6
    ) {
        // Skip if k > n
        if k <= data.len() {
            let model = KMedians::new(k).with_seed(42);
            let labels = model.fit_predict(&data).unwrap();

            prop_assert_eq!(labels.len(), data.len());
            for &l in &labels {
                prop_assert!(l < k);
            }
        }
    }

    #[test]
    fn prop_exactly_k_medians(data in points(30), k in 1usize..6, seed in any::<u64>()) {
        if k <= data.len() {
            let fit = cluster(&data, k, 50, 1e-6, seed).unwrap();
            prop_assert_eq!(fit.medians().len(), k);
            prop_assert_eq!(fit.cluster_sizes().iter().sum::<usize>(), data.len());
            prop_assert!(fit.medians().iter().flatten().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn prop_deterministic(data in points(25), k in 1usize..5, seed in any::<u64>()) {
        if k <= data.len() {
            let a = cluster(&data, k, 50, 1e-6, seed).unwrap();
            let b = cluster(&data, k, 50, 1e-6, seed).unwrap();
            prop_assert_eq!(a.medians(), b.medians());
            prop_assert_eq!(a.labels(), b.labels());
            prop_assert_eq!(a.n_iter(), b.n_iter());
        }
    }

    #[test]
    fn prop_cost_non_increasing(data in points(40), k in 1usize..5, seed in any::<u64>()) {
        if k <= data.len() {
            let fit = cluster(&data, k, 50, 0.0, seed).unwrap();
            for w in fit.history().windows(2) {
                prop_assert!(w[1].cost <= w[0].cost + 1e-9 * (1.0 + w[0].cost));
            }
        }
    }

    #[test]
    fn prop_labels_are_nearest(data in points(30), k in 1usize..5, seed in any::<u64>()) {
        if k <= data.len() {
            let fit = cluster(&data, k, 50, 1e-6, seed).unwrap();
            for (p, &l) in data.iter().zip(fit.labels()) {
                let dist = |m: &Vec<f64>| -> f64 {
                    p.iter().zip(m).map(|(a, b)| (a - b).abs()).sum()
                };
                let own = dist(&fit.medians()[l]);
                for (j, m) in fit.medians().iter().enumerate() {
                    // Ties go to the lowest index.
                    if j < l {
                        prop_assert!(own < dist(m));
                    } else {
                        prop_assert!(own <= dist(m));
                    }
                }
            }
        }
    }

    #[test]
    fn prop_normalize_round_trip(data in points(30)) {
        let (z, params) = normalize(&data).unwrap();
        for (p, zp) in data.iter().zip(&z) {
            let back = params.denormalize(zp).unwrap();
            for (a, b) in back.iter().zip(p) {
                prop_assert!((a - b).abs() <= 1e-9 * (1.0 + b.abs()));
            }
        }
    }

    #[test]
    fn prop_k_equals_n_zero_cost(
        data in prop::collection::hash_set((-1000i32..1000, -1000i32..1000), 1..15)
    ) {
        let data: Vec<Vec<f64>> = data.into_iter().map(|(x, y)| vec![x as f64, y as f64]).collect();
        let fit = cluster(&data, data.len(), 10, 1e-9, 0).unwrap();
        prop_assert!(fit.converged());
        prop_assert_eq!(fit.n_iter(), 1);
        prop_assert_eq!(fit.cost(), 0.0);
    }
}
