//! Integer progress percentages.

/// Progress of a file after chunk `index` (zero-based) of `total` is acknowledged.
///
/// Rounds up, but holds at 99 until the final chunk so that 100 means the
/// server has the whole file.
pub fn chunk_progress(index: u64, total: u64) -> u8 {
    if total == 0 || index + 1 >= total {
        return 100;
    }
    let done = index + 1;
    let pct = (done * 100).div_ceil(total);
    pct.min(99) as u8
}

/// `floor(mean(values))`, or 0 for an empty set.
pub fn mean_progress<I>(values: I) -> u8
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(s, c), v| (s + u64::from(v), c + 1));
    if count == 0 {
        return 0;
    }
    (sum / count) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_chunks() {
        let seq: Vec<u8> = (0..3).map(|i| chunk_progress(i, 3)).collect();
        assert_eq!(seq, vec![34, 67, 100]);
    }

    #[test]
    fn single_chunk_is_complete() {
        assert_eq!(chunk_progress(0, 1), 100);
    }

    #[test]
    fn never_reports_100_early() {
        for total in [2u64, 3, 7, 150, 201, 1000] {
            let mut last = 0;
            for i in 0..total {
                let p = chunk_progress(i, total);
                assert!(p >= last, "regressed at {i}/{total}");
                if i + 1 < total {
                    assert!(p < 100, "100 before the last chunk at {i}/{total}");
                }
                last = p;
            }
            assert_eq!(last, 100);
        }
    }

    #[test]
    fn mean_floors() {
        assert_eq!(mean_progress([100, 0]), 50);
        assert_eq!(mean_progress([100, 0, 0]), 33);
        assert_eq!(mean_progress([67, 100]), 83);
        assert_eq!(mean_progress(std::iter::empty()), 0);
    }
}
