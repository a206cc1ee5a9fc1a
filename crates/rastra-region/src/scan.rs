//! Scan-line labeling core
//!
//! A single raster pass (row-major, top-to-bottom, left-to-right) assigns
//! a provisional label to every foreground pixel, recording equivalences
//! whenever previously-visited neighbors turn out to belong to the same
//! object. Four specialized routines cover the combinations of
//! {4-neighborhood, 8-neighborhood} x {thresholded source, pre-labeled
//! source}; generics monomorphize each per source-scalar and label type,
//! so the per-pixel loops carry no mode branching.
//!
//! In thresholded mode any foreground neighbor continues the current
//! object. In labeled mode a neighbor continues the object only if its
//! *source* value equals the current pixel's source value, so distinct
//! input regions are never merged even when adjacent.
//!
//! Background pixels receive the sentinel label, sized as
//! `min(L::MAX_INDEX, pixel_count - 1)`: one past the largest label
//! index the scan may assign. If the scan runs out of label space the
//! whole pass fails with [`RegionError::LabelOverflow`]; the partial
//! mask is unspecified in that case.

use crate::equiv::EquivTable;
use crate::error::{RegionError, RegionResult};
use rastra_core::Matrix;

/// Connectivity rule for component adjacency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// 4-way connectivity (orthogonal neighbors only)
    #[default]
    FourWay,
    /// 8-way connectivity (orthogonal plus diagonal neighbors)
    EightWay,
}

/// Scalar types usable as mask sources.
pub trait MaskValue: Copy + PartialEq + PartialOrd {
    /// Clamp an `i32` threshold into this type's range.
    fn clamp_threshold(t: i32) -> Self;
}

impl MaskValue for u8 {
    #[inline]
    fn clamp_threshold(t: i32) -> Self {
        t.clamp(0, u8::MAX as i32) as u8
    }
}

impl MaskValue for i32 {
    #[inline]
    fn clamp_threshold(t: i32) -> Self {
        t
    }
}

/// Integer types usable as provisional and final labels.
pub trait LabelValue: Copy + Eq + Ord + std::fmt::Debug {
    /// Largest index this label type can represent.
    const MAX_INDEX: usize;

    /// Convert a label index into the label type (truncating).
    fn from_index(index: usize) -> Self;

    /// Convert the label into a vector index.
    fn index(self) -> usize;
}

impl LabelValue for u8 {
    const MAX_INDEX: usize = u8::MAX as usize;

    #[inline]
    fn from_index(index: usize) -> Self {
        index as u8
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl LabelValue for i32 {
    const MAX_INDEX: usize = i32::MAX as usize;

    #[inline]
    fn from_index(index: usize) -> Self {
        index as i32
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Result of the scan phase, before the final labels are written out.
///
/// `mask` still holds provisional labels (background pixels hold the
/// sentinel); `equiv` is the compacted lookup table mapping every
/// provisional label to its final label, with the sentinel slot mapped
/// to 0. Finishing the mask is one pass:
/// `mask[p] = equiv[mask[p]]` for every pixel.
///
/// This intermediate form lets callers fuse extra per-pixel computation
/// into that finishing pass instead of re-walking the matrix afterwards.
#[derive(Debug, Clone)]
pub struct PartialLabeling<L> {
    /// Partially labeled mask (provisional labels + sentinel)
    pub mask: Matrix<L>,
    /// Lookup table from provisional to final label
    pub equiv: Vec<L>,
    /// Number of foreground objects (background not counted)
    pub num_objects: usize,
}

#[inline]
fn next_label<L: LabelValue>(current: &mut usize) -> L {
    let label = L::from_index(*current);
    *current += 1;
    label
}

/// Fold the gathered neighbor labels into one adopted label.
///
/// Zero neighbors start a new object; one neighbor is adopted directly;
/// several are merged pairwise right-to-left and the surviving
/// representative is adopted.
#[inline]
fn adopt<L: LabelValue>(equiv: &mut EquivTable<L>, neighbors: &[L], current: &mut usize) -> L {
    match neighbors.len() {
        0 => next_label(current),
        1 => neighbors[0],
        n => {
            let mut acc = neighbors[n - 1];
            for k in (0..n - 1).rev() {
                acc = equiv.merge(acc, neighbors[k]);
            }
            acc
        }
    }
}

/// Run the scan variant selected by `assume_labeled` and `connectivity`
/// and resolve the equivalences.
///
/// The source must be non-empty; empty inputs are handled by the public
/// entry points.
pub(crate) fn scan<T: MaskValue, L: LabelValue>(
    src: &Matrix<T>,
    min: T,
    max: T,
    assume_labeled: bool,
    connectivity: Connectivity,
) -> RegionResult<PartialLabeling<L>> {
    debug_assert!(!src.is_empty());

    let (mask, equiv, provisional) = match (connectivity, assume_labeled) {
        (Connectivity::FourWay, false) => scan_thresholded_4(src, min, max),
        (Connectivity::FourWay, true) => scan_labeled_4(src, min, max),
        (Connectivity::EightWay, false) => scan_thresholded_8(src, min, max),
        (Connectivity::EightWay, true) => scan_labeled_8(src, min, max),
    };

    let capacity = equiv.sentinel_index();
    if provisional >= capacity {
        return Err(RegionError::LabelOverflow {
            needed: provisional,
            capacity,
        });
    }

    let (lut, num_objects) = equiv.compact(provisional);
    Ok(PartialLabeling {
        mask,
        equiv: lut,
        num_objects,
    })
}

/// Thresholded source, 4-neighborhood: only the North and West neighbors
/// exist at scan time, and any foreground neighbor continues the object.
fn scan_thresholded_4<T: MaskValue, L: LabelValue>(
    src: &Matrix<T>,
    min: T,
    max: T,
) -> (Matrix<L>, EquivTable<L>, usize) {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let mut equiv = EquivTable::for_pixels(w * h);
    let bg = equiv.sentinel();
    let mut dest = Matrix::filled(src.width(), src.height(), bg);

    let s = src.as_slice();
    let d = dest.as_mut_slice();
    let fg = |v: T| v >= min && v <= max;
    let mut current = 0usize;

    // first row: only the West neighbor exists
    let mut last = if fg(s[0]) { next_label(&mut current) } else { bg };
    d[0] = last;
    for x in 1..w {
        last = if !fg(s[x]) {
            bg
        } else if last == bg {
            next_label(&mut current)
        } else {
            last
        };
        d[x] = last;
    }

    for y in 1..h {
        let row = y * w;
        let up = row - w;

        last = if !fg(s[row]) {
            bg
        } else if d[up] != bg {
            d[up]
        } else {
            next_label(&mut current)
        };
        d[row] = last;

        for x in 1..w {
            let i = row + x;
            if !fg(s[i]) {
                last = bg;
            } else {
                let north = d[up + x];
                if last != bg {
                    if north != bg && north != last {
                        last = equiv.merge(last, north);
                    }
                } else if north != bg {
                    last = north;
                } else {
                    last = next_label(&mut current);
                }
            }
            d[i] = last;
        }
    }

    (dest, equiv, current)
}

/// Pre-labeled source, 4-neighborhood: a neighbor continues the object
/// only if its source value equals the current pixel's.
fn scan_labeled_4<T: MaskValue, L: LabelValue>(
    src: &Matrix<T>,
    min: T,
    max: T,
) -> (Matrix<L>, EquivTable<L>, usize) {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let mut equiv = EquivTable::for_pixels(w * h);
    let bg = equiv.sentinel();
    let mut dest = Matrix::filled(src.width(), src.height(), bg);

    let s = src.as_slice();
    let d = dest.as_mut_slice();
    let fg = |v: T| v >= min && v <= max;
    let mut current = 0usize;

    // first row: a change of source value starts a new run
    let mut last_src = s[0];
    let mut last = if fg(s[0]) { next_label(&mut current) } else { bg };
    d[0] = last;
    for x in 1..w {
        let v = s[x];
        if !fg(v) {
            last = bg;
        } else if last_src != v {
            last = next_label(&mut current);
        }
        d[x] = last;
        last_src = v;
    }

    for y in 1..h {
        let row = y * w;
        let up = row - w;

        let v0 = s[row];
        last = if !fg(v0) {
            bg
        } else if s[up] != v0 {
            next_label(&mut current)
        } else {
            d[up]
        };
        d[row] = last;
        last_src = v0;

        for x in 1..w {
            let i = row + x;
            let v = s[i];
            if !fg(v) {
                last = bg;
            } else {
                let north = d[up + x];
                if last != bg {
                    if north == bg {
                        if last_src != v {
                            last = next_label(&mut current);
                        }
                    } else if v == last_src && v == s[up + x] {
                        // West and North both continue this object
                        last = equiv.merge(last, north);
                    } else if v == last_src {
                        // keep the West label
                    } else if v == s[up + x] {
                        last = north;
                    } else {
                        last = next_label(&mut current);
                    }
                } else if v == s[up + x] {
                    last = north;
                } else {
                    last = next_label(&mut current);
                }
            }
            d[i] = last;
            last_src = v;
        }
    }

    (dest, equiv, current)
}

/// Thresholded source, 8-neighborhood: West, North-West, North and
/// North-East neighbors are gathered from the partial mask; duplicates
/// against the most recently gathered label are skipped, the merger
/// handles the rest.
fn scan_thresholded_8<T: MaskValue, L: LabelValue>(
    src: &Matrix<T>,
    min: T,
    max: T,
) -> (Matrix<L>, EquivTable<L>, usize) {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let mut equiv = EquivTable::for_pixels(w * h);
    let bg = equiv.sentinel();
    let mut dest = Matrix::filled(src.width(), src.height(), bg);

    let s = src.as_slice();
    let d = dest.as_mut_slice();
    let fg = |v: T| v >= min && v <= max;
    let mut current = 0usize;
    let mut nb = [bg; 4];

    // first row: identical to the 4-neighborhood case
    let mut last = if fg(s[0]) { next_label(&mut current) } else { bg };
    d[0] = last;
    for x in 1..w {
        last = if !fg(s[x]) {
            bg
        } else if last == bg {
            next_label(&mut current)
        } else {
            last
        };
        d[x] = last;
    }

    for y in 1..h {
        let row = y * w;
        let up = row - w;

        // first column: North and North-East
        if !fg(s[row]) {
            d[row] = bg;
        } else {
            let mut n = 0;
            let t = d[up];
            if t != bg {
                nb[n] = t;
                n += 1;
            }
            if w > 1 {
                let t = d[up + 1];
                if t != bg && (n == 0 || t != nb[n - 1]) {
                    nb[n] = t;
                    n += 1;
                }
            }
            d[row] = adopt(&mut equiv, &nb[..n], &mut current);
        }

        if w > 1 {
            for x in 1..w - 1 {
                let i = row + x;
                if !fg(s[i]) {
                    d[i] = bg;
                    continue;
                }
                let mut n = 0;
                let t = d[i - 1];
                if t != bg {
                    nb[n] = t;
                    n += 1;
                }
                let t = d[up + x - 1];
                if t != bg && (n == 0 || t != nb[n - 1]) {
                    nb[n] = t;
                    n += 1;
                }
                let t = d[up + x];
                if t != bg && (n == 0 || t != nb[n - 1]) {
                    nb[n] = t;
                    n += 1;
                }
                let t = d[up + x + 1];
                if t != bg && (n == 0 || t != nb[n - 1]) {
                    nb[n] = t;
                    n += 1;
                }
                d[i] = adopt(&mut equiv, &nb[..n], &mut current);
            }

            // last column: no North-East
            let x = w - 1;
            let i = row + x;
            if !fg(s[i]) {
                d[i] = bg;
            } else {
                let mut n = 0;
                let t = d[i - 1];
                if t != bg {
                    nb[n] = t;
                    n += 1;
                }
                let t = d[up + x - 1];
                if t != bg && (n == 0 || t != nb[n - 1]) {
                    nb[n] = t;
                    n += 1;
                }
                let t = d[up + x];
                if t != bg && (n == 0 || t != nb[n - 1]) {
                    nb[n] = t;
                    n += 1;
                }
                d[i] = adopt(&mut equiv, &nb[..n], &mut current);
            }
        }
    }

    (dest, equiv, current)
}

/// Pre-labeled source, 8-neighborhood: neighbors are gathered by source
/// equality, so a neighbor with a different source value never continues
/// the object.
fn scan_labeled_8<T: MaskValue, L: LabelValue>(
    src: &Matrix<T>,
    min: T,
    max: T,
) -> (Matrix<L>, EquivTable<L>, usize) {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let mut equiv = EquivTable::for_pixels(w * h);
    let bg = equiv.sentinel();
    let mut dest = Matrix::filled(src.width(), src.height(), bg);

    let s = src.as_slice();
    let d = dest.as_mut_slice();
    let fg = |v: T| v >= min && v <= max;
    let mut current = 0usize;
    let mut nb = [bg; 4];

    // first row: identical to the 4-neighborhood labeled case
    let mut last_src = s[0];
    let mut last = if fg(s[0]) { next_label(&mut current) } else { bg };
    d[0] = last;
    for x in 1..w {
        let v = s[x];
        if !fg(v) {
            last = bg;
        } else if last_src != v {
            last = next_label(&mut current);
        }
        d[x] = last;
        last_src = v;
    }

    for y in 1..h {
        let row = y * w;
        let up = row - w;

        // first column: North and North-East by source equality
        let v0 = s[row];
        if !fg(v0) {
            d[row] = bg;
        } else {
            let mut n = 0;
            if s[up] == v0 {
                nb[n] = d[up];
                n += 1;
            }
            if w > 1 && s[up + 1] == v0 {
                let t = d[up + 1];
                if n == 0 || t != nb[n - 1] {
                    nb[n] = t;
                    n += 1;
                }
            }
            d[row] = adopt(&mut equiv, &nb[..n], &mut current);
        }

        if w > 1 {
            for x in 1..w - 1 {
                let i = row + x;
                let v = s[i];
                if !fg(v) {
                    d[i] = bg;
                    continue;
                }
                let mut n = 0;
                if s[i - 1] == v {
                    nb[n] = d[i - 1];
                    n += 1;
                }
                if s[up + x - 1] == v {
                    let t = d[up + x - 1];
                    if n == 0 || t != nb[n - 1] {
                        nb[n] = t;
                        n += 1;
                    }
                }
                if s[up + x] == v {
                    let t = d[up + x];
                    if n == 0 || t != nb[n - 1] {
                        nb[n] = t;
                        n += 1;
                    }
                }
                if s[up + x + 1] == v {
                    let t = d[up + x + 1];
                    if n == 0 || t != nb[n - 1] {
                        nb[n] = t;
                        n += 1;
                    }
                }
                d[i] = adopt(&mut equiv, &nb[..n], &mut current);
            }

            // last column: no North-East
            let x = w - 1;
            let i = row + x;
            let v = s[i];
            if !fg(v) {
                d[i] = bg;
            } else {
                let mut n = 0;
                if s[i - 1] == v {
                    nb[n] = d[i - 1];
                    n += 1;
                }
                if s[up + x - 1] == v {
                    let t = d[up + x - 1];
                    if n == 0 || t != nb[n - 1] {
                        nb[n] = t;
                        n += 1;
                    }
                }
                if s[up + x] == v {
                    let t = d[up + x];
                    if n == 0 || t != nb[n - 1] {
                        nb[n] = t;
                        n += 1;
                    }
                }
                d[i] = adopt(&mut equiv, &nb[..n], &mut current);
            }
        }
    }

    (dest, equiv, current)
}
