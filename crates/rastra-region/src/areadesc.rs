//! Area descriptors for labeled regions
//!
//! A geometric summary pass layered on the relabeling engine: per object
//! the pixel count, bounding rectangle and center of gravity. Instead of
//! relabeling first and walking the mask again, this module takes the
//! partial-labeling hook and folds the descriptor accumulation into the
//! same pass that writes the final labels.

use crate::error::RegionResult;
use crate::filter::{sort_by_size, suppress_small};
use crate::relabel::{RelabelOptions, apply_lut_with_area, partial};
use crate::scan::MaskValue;
use rastra_core::{Matrix, Rect};

/// Geometric summary of one labeled region.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaDescriptor {
    /// Final label of the region
    pub label: i32,
    /// Number of pixels
    pub area: u32,
    /// Bounding rectangle
    pub bounds: Rect,
    /// Center of gravity `(x, y)`
    pub centroid: (f64, f64),
}

/// Options for [`describe_regions`].
#[derive(Debug, Clone, Default)]
pub struct AreaDescOptions {
    /// Relabeling configuration (thresholds, connectivity, filtering)
    pub relabel: RelabelOptions,
    /// Keep only the n largest objects (0 = no limit)
    pub n_largest: usize,
}

impl AreaDescOptions {
    /// Create options with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relabeling configuration.
    pub fn with_relabel(mut self, relabel: RelabelOptions) -> Self {
        self.relabel = relabel;
        self
    }

    /// Limit the result to the n largest objects.
    pub fn with_n_largest(mut self, n_largest: usize) -> Self {
        self.n_largest = n_largest;
        self
    }
}

/// Compute area descriptors for every connected region of `src`.
///
/// Descriptors cover foreground labels only, ordered by final label
/// (`descriptors[i].label == i + 1`).
pub fn describe_regions<T: MaskValue>(
    src: &Matrix<T>,
    opts: &AreaDescOptions,
) -> RegionResult<Vec<AreaDescriptor>> {
    Ok(describe_regions_with_mask(src, opts)?.1)
}

/// As [`describe_regions`], also returning the finished label mask.
pub fn describe_regions_with_mask<T: MaskValue>(
    src: &Matrix<T>,
    opts: &AreaDescOptions,
) -> RegionResult<(Matrix<i32>, Vec<AreaDescriptor>)> {
    if src.is_empty() {
        return Ok((Matrix::filled(src.width(), src.height(), 0), Vec::new()));
    }

    let part = partial::<T, i32>(src, &opts.relabel)?;
    let mut mask = part.mask;
    let mut sizes = apply_lut_with_area(&mut mask, &part.equiv, part.num_objects);

    let ropts = &opts.relabel;
    let reindex: Vec<i32> = if ropts.sort_by_size {
        sort_by_size::<i32>(ropts.min_object_size, opts.n_largest, &mut sizes).0
    } else {
        let mut min_size = ropts.min_object_size;
        if opts.n_largest > 0 && opts.n_largest < sizes.len() - 1 {
            // the size of the n-th largest object becomes the effective
            // minimum; ties at the cutoff all survive
            let mut tmp = sizes.clone();
            tmp[0] = u32::MAX;
            tmp.sort_unstable_by_key(|&v| std::cmp::Reverse(v));
            min_size = min_size.max(tmp[opts.n_largest.min(tmp.len() - 1)]);
        }
        if min_size > 1 {
            suppress_small::<i32>(min_size, &mut sizes).0
        } else {
            (0..sizes.len() as i32).collect()
        }
    };

    struct Accum {
        min_x: u32,
        min_y: u32,
        max_x: u32,
        max_y: u32,
        sum_x: u64,
        sum_y: u64,
        area: u32,
    }

    let mut accs: Vec<Accum> = (1..sizes.len())
        .map(|_| Accum {
            min_x: u32::MAX,
            min_y: u32::MAX,
            max_x: 0,
            max_y: 0,
            sum_x: 0,
            sum_y: 0,
            area: 0,
        })
        .collect();

    // finish the mask and accumulate the descriptors in the same pass
    for y in 0..mask.height() {
        let row = mask.row_mut(y);
        for (x, v) in row.iter_mut().enumerate() {
            let label = reindex[*v as usize];
            *v = label;
            if label > 0 {
                let acc = &mut accs[(label - 1) as usize];
                let x = x as u32;
                acc.min_x = acc.min_x.min(x);
                acc.min_y = acc.min_y.min(y);
                acc.max_x = acc.max_x.max(x);
                acc.max_y = acc.max_y.max(y);
                acc.sum_x += x as u64;
                acc.sum_y += y as u64;
                acc.area += 1;
            }
        }
    }

    let descriptors = accs
        .iter()
        .enumerate()
        .map(|(i, a)| AreaDescriptor {
            label: (i + 1) as i32,
            area: a.area,
            bounds: Rect::from_corners(a.min_x, a.min_y, a.max_x, a.max_y),
            centroid: (
                a.sum_x as f64 / a.area as f64,
                a.sum_y as f64 / a.area as f64,
            ),
        })
        .collect();

    Ok((mask, descriptors))
}
