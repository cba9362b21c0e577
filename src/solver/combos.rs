/*
* Copyright (C) 2026  Henrique Almeida
* This file is part of WAZebra.
*
* WAZebra is free software: you can redistribute it and/or modify
* it under the terms of the GNU Affero General Public License as published
* by the Free Software Foundation, either version 3 of the License, or
* (at your option) any later version.
*
* WAZebra is distributed in the hope that it will be useful,
* but WITHOUT ANY WARRANTY; without even the implied warranty of
* MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
* GNU Affero General Public License for more details.
*
* You should have received a copy of the GNU Affero General Public License
* along with WAZebra.  If not, see <https://www.gnu.org/licenses/>.
*/

//! Precomputed position subsets for the elimination engine.
//!
//! Computed once per solver so the hot loop only walks ready-made masks.
//! Subset sizes run over `1..n`; the empty and full subsets never eliminate
//! anything and are skipped outright.

/// All k-subsets of `[0, n)` as position bitmasks, grouped by k.
#[derive(Debug, Clone)]
pub struct SubsetMasks {
    positions: usize,
    by_size: Vec<Vec<u64>>,
}

impl SubsetMasks {
    pub fn new(positions: usize) -> SubsetMasks {
        let mut by_size = vec![Vec::new(); positions.max(1)];
        for (k, bucket) in by_size.iter_mut().enumerate().skip(1) {
            *bucket = subsets_of(positions, k);
        }
        SubsetMasks { positions, by_size }
    }

    pub fn positions(&self) -> usize {
        self.positions
    }

    /// Masks with exactly `size` bits set; empty for size 0 or ≥ n.
    pub fn of_size(&self, size: usize) -> &[u64] {
        self.by_size.get(size).map(|v| &v[..]).unwrap_or(&[])
    }
}

/// Lexicographic k-subset enumeration over an index array.
fn subsets_of(n: usize, k: usize) -> Vec<u64> {
    if k == 0 || k >= n {
        return Vec::new();
    }
    let mut indices: Vec<usize> = (0..k).collect();
    let mut masks = Vec::new();
    loop {
        masks.push(indices.iter().fold(0u64, |mask, &i| mask | (1 << i)));

        // Advance the rightmost index that still has room.
        let mut slot = k;
        while slot > 0 {
            slot -= 1;
            if indices[slot] != slot + n - k {
                indices[slot] += 1;
                for next in slot + 1..k {
                    indices[next] = indices[next - 1] + 1;
                }
                break;
            }
            if slot == 0 {
                return masks;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_binomials() {
        let masks = SubsetMasks::new(5);
        assert_eq!(masks.of_size(1).len(), 5);
        assert_eq!(masks.of_size(2).len(), 10);
        assert_eq!(masks.of_size(3).len(), 10);
        assert_eq!(masks.of_size(4).len(), 5);
        assert!(masks.of_size(0).is_empty());
        assert!(masks.of_size(5).is_empty());
    }

    #[test]
    fn every_mask_has_the_right_popcount() {
        let masks = SubsetMasks::new(6);
        for k in 1..6 {
            for &mask in masks.of_size(k) {
                assert_eq!(mask.count_ones() as usize, k);
                assert_eq!(mask & !0b111111, 0);
            }
        }
    }

    #[test]
    fn pair_masks_are_distinct() {
        let masks = SubsetMasks::new(4);
        let mut seen: Vec<u64> = masks.of_size(2).to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 6);
    }
}
