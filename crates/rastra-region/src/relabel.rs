//! Relabeling pipeline
//!
//! The public entry points of the relabeling engine. Every operation is
//! the same strict pipeline: scan (provisional labels + equivalences),
//! resolve, rewrite the mask through the final lookup table, and
//! optionally filter the label set by area. No state survives a call;
//! the options struct is read-only configuration.
//!
//! Full-pipeline operations scan with `i32` scratch labels and convert
//! to the destination label type during the final lookup pass, so the
//! destination type never constrains the number of *provisional* labels.
//! [`partial`] scans directly in the requested label type instead and is
//! the place where a narrow label type's capacity is enforced.

use crate::error::RegionResult;
use crate::filter::{sort_by_size, suppress_small};
use crate::scan::{self, Connectivity, LabelValue, MaskValue, PartialLabeling};
use rastra_core::{Matrix, Point};

/// Configuration for the relabeling operations.
///
/// Values in `[min_threshold, max_threshold]` are foreground; everything
/// else becomes background (final label 0). Thresholds are clamped into
/// the source scalar's range, so the `i32` defaults work for `u8`
/// sources too.
///
/// # Examples
///
/// ```
/// use rastra_region::{Connectivity, RelabelOptions};
///
/// let opts = RelabelOptions::new()
///     .with_assume_labeled(false)
///     .with_connectivity(Connectivity::EightWay)
///     .with_min_object_size(4);
/// assert_eq!(opts.min_threshold, 1);
/// ```
#[derive(Debug, Clone)]
pub struct RelabelOptions {
    /// Smallest source value considered foreground
    pub min_threshold: i32,
    /// Largest source value considered foreground
    pub max_threshold: i32,
    /// Treat the source as already labeled: neighbors continue an object
    /// only when their source values are equal
    pub assume_labeled: bool,
    /// Neighborhood used for adjacency
    pub connectivity: Connectivity,
    /// Reassign labels by descending object area
    pub sort_by_size: bool,
    /// Objects smaller than this fold into the background (1 disables)
    pub min_object_size: u32,
}

impl Default for RelabelOptions {
    fn default() -> Self {
        Self {
            min_threshold: 1,
            max_threshold: i32::MAX,
            assume_labeled: true,
            connectivity: Connectivity::FourWay,
            sort_by_size: false,
            min_object_size: 1,
        }
    }
}

impl RelabelOptions {
    /// Create options with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the foreground threshold interval.
    pub fn with_thresholds(mut self, min: i32, max: i32) -> Self {
        self.min_threshold = min;
        self.max_threshold = max;
        self
    }

    /// Select labeled- or thresholded-mask interpretation.
    pub fn with_assume_labeled(mut self, assume_labeled: bool) -> Self {
        self.assume_labeled = assume_labeled;
        self
    }

    /// Select the adjacency neighborhood.
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Enable or disable sorting labels by descending area.
    pub fn with_sort_by_size(mut self, sort_by_size: bool) -> Self {
        self.sort_by_size = sort_by_size;
        self
    }

    /// Set the minimum object size in pixels.
    pub fn with_min_object_size(mut self, min_object_size: u32) -> Self {
        self.min_object_size = min_object_size;
        self
    }
}

/// Mask, per-label areas and per-label point lists, as produced by
/// [`relabel_with_objects`].
///
/// `sizes` and `objects` are indexed by final label; index 0 belongs to
/// the background (its point list holds the background coordinates, kept
/// so the vectors stay index-aligned with the labels).
#[derive(Debug, Clone)]
pub struct LabeledObjects<L> {
    /// Final label mask
    pub mask: Matrix<L>,
    /// Pixel count per label, background at index 0
    pub sizes: Vec<u32>,
    /// Pixel coordinates per label, background at index 0
    pub objects: Vec<Vec<Point>>,
}

impl<L> LabeledObjects<L> {
    /// Number of foreground objects.
    pub fn num_objects(&self) -> usize {
        self.sizes.len().saturating_sub(1)
    }
}

// ---------------------------------------------------------------------
// Relabel appliers
// ---------------------------------------------------------------------

/// Rewrite a mask in place through a final-label lookup table.
pub(crate) fn apply_lut_in_place<L: LabelValue>(mask: &mut Matrix<L>, lut: &[L]) {
    for v in mask.as_mut_slice() {
        *v = lut[v.index()];
    }
}

/// Rewrite a mask in place through a lookup table, accumulating the
/// pixel count of every final label (background at index 0).
pub(crate) fn apply_lut_with_area<L: LabelValue>(
    mask: &mut Matrix<L>,
    lut: &[L],
    num_objects: usize,
) -> Vec<u32> {
    let mut sizes = vec![0u32; num_objects + 1];
    for v in mask.as_mut_slice() {
        let label = lut[v.index()];
        *v = label;
        sizes[label.index()] += 1;
    }
    sizes
}

/// Rewrite the `i32` scratch mask into a destination of another label
/// type, applying the lookup table and the type conversion in the same
/// pass.
fn convert_lut<L: LabelValue>(scratch: &Matrix<i32>, lut: &[i32]) -> Matrix<L> {
    scratch.map(|&v| L::from_index(lut[v as usize] as usize))
}

/// As [`convert_lut`], additionally accumulating per-label pixel counts.
fn convert_lut_with_area<L: LabelValue>(
    scratch: &Matrix<i32>,
    lut: &[i32],
    num_objects: usize,
) -> (Matrix<L>, Vec<u32>) {
    let mut sizes = vec![0u32; num_objects + 1];
    let dest = scratch.map(|&v| {
        let label = lut[v as usize] as usize;
        sizes[label] += 1;
        L::from_index(label)
    });
    (dest, sizes)
}

// ---------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------

fn scan_scratch<T: MaskValue>(
    src: &Matrix<T>,
    opts: &RelabelOptions,
) -> RegionResult<PartialLabeling<i32>> {
    let min = T::clamp_threshold(opts.min_threshold);
    let max = T::clamp_threshold(opts.max_threshold);
    scan::scan(src, min, max, opts.assume_labeled, opts.connectivity)
}

fn empty_mask<T, L: LabelValue>(src: &Matrix<T>) -> Matrix<L> {
    Matrix::filled(src.width(), src.height(), L::from_index(0))
}

/// Relabel `src` so that every connected region gets its own final label
/// (1, 2, ...; background 0).
///
/// An empty source yields an empty mask. If `L` is narrower than the
/// final label count (more than 255 objects into a `u8` mask), the
/// excess labels wrap; use `i32` destinations when many objects are
/// expected.
///
/// # Errors
///
/// Returns [`RegionError::LabelOverflow`](crate::RegionError::LabelOverflow)
/// if the scan exhausts the scratch label space. The destination is not
/// produced in that case.
///
/// # Examples
///
/// ```
/// use rastra_core::Matrix;
/// use rastra_region::{RelabelOptions, relabel};
///
/// #[rustfmt::skip]
/// let src = Matrix::from_vec(4, 2, vec![
///     9u8, 0, 0, 3,
///     9,   0, 0, 3,
/// ]).unwrap();
///
/// let labels: Matrix<i32> = relabel(&src, &RelabelOptions::new()).unwrap();
/// assert_eq!(labels[(0, 0)], 1);
/// assert_eq!(labels[(3, 1)], 2);
/// assert_eq!(labels[(1, 0)], 0);
/// ```
pub fn relabel<T: MaskValue, L: LabelValue>(
    src: &Matrix<T>,
    opts: &RelabelOptions,
) -> RegionResult<Matrix<L>> {
    Ok(relabel_with_count(src, opts)?.0)
}

/// As [`relabel`], also returning the number of foreground objects after
/// any size filtering.
pub fn relabel_with_count<T: MaskValue, L: LabelValue>(
    src: &Matrix<T>,
    opts: &RelabelOptions,
) -> RegionResult<(Matrix<L>, usize)> {
    if src.is_empty() {
        return Ok((empty_mask(src), 0));
    }
    let part = scan_scratch(src, opts)?;

    if opts.sort_by_size {
        let (mut dest, mut sizes) =
            convert_lut_with_area::<L>(&part.mask, &part.equiv, part.num_objects);
        let (reindex, num) = sort_by_size::<L>(opts.min_object_size, 0, &mut sizes);
        apply_lut_in_place(&mut dest, &reindex);
        Ok((dest, num))
    } else if opts.min_object_size <= 1 {
        Ok((convert_lut::<L>(&part.mask, &part.equiv), part.num_objects))
    } else {
        let (mut dest, mut sizes) =
            convert_lut_with_area::<L>(&part.mask, &part.equiv, part.num_objects);
        let (reindex, num) = suppress_small::<L>(opts.min_object_size, &mut sizes);
        apply_lut_in_place(&mut dest, &reindex);
        Ok((dest, num))
    }
}

/// As [`relabel`], also returning the pixel count of every final label.
///
/// The size vector has `num_objects + 1` entries; index 0 is the
/// background count (including every suppressed object's pixels), so the
/// entries always sum to the source pixel count.
pub fn relabel_with_sizes<T: MaskValue, L: LabelValue>(
    src: &Matrix<T>,
    opts: &RelabelOptions,
) -> RegionResult<(Matrix<L>, Vec<u32>)> {
    if src.is_empty() {
        return Ok((empty_mask(src), Vec::new()));
    }
    let part = scan_scratch(src, opts)?;
    let (mut dest, mut sizes) =
        convert_lut_with_area::<L>(&part.mask, &part.equiv, part.num_objects);

    if opts.sort_by_size {
        let (reindex, _) = sort_by_size::<L>(opts.min_object_size, 0, &mut sizes);
        apply_lut_in_place(&mut dest, &reindex);
    } else if opts.min_object_size > 1 {
        let (reindex, _) = suppress_small::<L>(opts.min_object_size, &mut sizes);
        apply_lut_in_place(&mut dest, &reindex);
    }

    Ok((dest, sizes))
}

/// As [`relabel_with_sizes`], additionally collecting the pixel
/// coordinates of every label.
pub fn relabel_with_objects<T: MaskValue, L: LabelValue>(
    src: &Matrix<T>,
    opts: &RelabelOptions,
) -> RegionResult<LabeledObjects<L>> {
    if src.is_empty() {
        return Ok(LabeledObjects {
            mask: empty_mask(src),
            sizes: Vec::new(),
            objects: Vec::new(),
        });
    }
    let part = scan_scratch(src, opts)?;
    let (mut dest, mut sizes) =
        convert_lut_with_area::<L>(&part.mask, &part.equiv, part.num_objects);

    let reindex: Vec<L> = if opts.sort_by_size {
        sort_by_size::<L>(opts.min_object_size, 0, &mut sizes).0
    } else if opts.min_object_size > 1 {
        suppress_small::<L>(opts.min_object_size, &mut sizes).0
    } else {
        (0..sizes.len()).map(L::from_index).collect()
    };

    let mut objects: Vec<Vec<Point>> = vec![Vec::new(); sizes.len()];
    for y in 0..dest.height() {
        let row = dest.row_mut(y);
        for (x, v) in row.iter_mut().enumerate() {
            let label = reindex[v.index()];
            *v = label;
            objects[label.index()].push(Point::new(x as u32, y));
        }
    }

    Ok(LabeledObjects {
        mask: dest,
        sizes,
        objects,
    })
}

/// Stop after the scan phase and expose the intermediate state.
///
/// Callers that want to fuse more per-pixel work into the finishing pass
/// get the partial mask, the compacted equivalence table and the object
/// count; see [`PartialLabeling`]. Size filtering and sorting options do
/// not apply here.
///
/// Unlike the full-pipeline operations this scans directly in `L`, so a
/// narrow label type limits the provisional label space: the sentinel is
/// `min(L::MAX_INDEX, pixel_count - 1)` and the scan fails with
/// [`RegionError::LabelOverflow`](crate::RegionError::LabelOverflow)
/// once provisional labels would collide with it.
pub fn partial<T: MaskValue, L: LabelValue>(
    src: &Matrix<T>,
    opts: &RelabelOptions,
) -> RegionResult<PartialLabeling<L>> {
    if src.is_empty() {
        return Ok(PartialLabeling {
            mask: empty_mask(src),
            equiv: Vec::new(),
            num_objects: 0,
        });
    }
    let min = T::clamp_threshold(opts.min_threshold);
    let max = T::clamp_threshold(opts.max_threshold);
    scan::scan(src, min, max, opts.assume_labeled, opts.connectivity)
}
