///
/// Exclusive prefix sum over a validity mask, used by PLOC's compaction
/// phase. The contract is the result, not the algorithm: the source uses a
/// Hillis-Steele scan, so that is what runs above a size threshold; small
/// slot counts fall back to a plain sequential scan, which is both faster
/// (no thread fan-out overhead) and trivially correct.
use rayon::prelude::*;

/// Below this length a sequential scan is cheaper than spinning up a
/// parallel Hillis-Steele pass.
const SEQUENTIAL_THRESHOLD: usize = 1024;

/// Returns `(S, L')` where `S[k]` is the count of `true` entries in
/// `valid[0..k)`, and `L'` is the total count of `true` entries.
pub fn exclusive_valid_prefix_sum(valid: &[bool]) -> (Vec<u32>, u32) {
    if valid.is_empty() {
        return (Vec::new(), 0);
    }

    let inclusive = if valid.len() < SEQUENTIAL_THRESHOLD {
        sequential_inclusive_scan(valid)
    } else {
        hillis_steele_inclusive_scan(valid)
    };

    let total = inclusive[inclusive.len() - 1];
    let exclusive = inclusive
        .iter()
        .zip(valid.iter())
        .map(|(&sum, &v)| sum - v as u32)
        .collect();
    (exclusive, total)
}

fn sequential_inclusive_scan(valid: &[bool]) -> Vec<u32> {
    let mut acc = 0u32;
    valid
        .iter()
        .map(|&v| {
            acc += v as u32;
            acc
        })
        .collect()
}

fn hillis_steele_inclusive_scan(valid: &[bool]) -> Vec<u32> {
    let len = valid.len();
    let mut buf: Vec<u32> = valid.iter().map(|&v| v as u32).collect();
    let mut tmp = vec![0u32; len];
    let mut step = 1usize;
    while step < len {
        tmp.par_iter_mut().enumerate().for_each(|(i, out)| {
            *out = if i >= step { buf[i] + buf[i - step] } else { buf[i] };
        });
        std::mem::swap(&mut buf, &mut tmp);
        step *= 2;
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mask_scans_to_empty() {
        let (s, total) = exclusive_valid_prefix_sum(&[]);
        assert!(s.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn sequential_and_parallel_paths_agree() {
        let valid: Vec<bool> = (0..5000).map(|i| i % 3 != 0).collect();

        let (exclusive_seq, total_seq) = exclusive_valid_prefix_sum(&valid[..900]);
        let (exclusive_par, total_par) = exclusive_valid_prefix_sum(&valid);

        assert_eq!(total_seq, valid[..900].iter().filter(|&&v| v).count() as u32);
        assert_eq!(total_par, valid.iter().filter(|&&v| v).count() as u32);

        let mut running = 0u32;
        for (i, &v) in valid[..900].iter().enumerate() {
            assert_eq!(exclusive_seq[i], running);
            running += v as u32;
        }
        let mut running = 0u32;
        for (i, &v) in valid.iter().enumerate() {
            assert_eq!(exclusive_par[i], running);
            running += v as u32;
        }
    }

    #[test]
    fn compaction_destinations_are_injective_over_valid_entries() {
        let valid = vec![true, false, true, true, false, true];
        let (s, total) = exclusive_valid_prefix_sum(&valid);
        assert_eq!(total, 4);
        let destinations: Vec<u32> = valid
            .iter()
            .enumerate()
            .filter(|(_, &v)| v)
            .map(|(i, _)| s[i])
            .collect();
        assert_eq!(destinations, vec![0, 1, 2, 3]);
    }
}
