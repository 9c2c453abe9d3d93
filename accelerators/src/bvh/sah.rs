//! Surface Area Heuristic Algorithm

use super::common::*;
use std::cmp::Ordering;
use tessera_core::base::*;
use tessera_core::geometry::*;

const N_BUCKETS: usize = 12;

/// Largest number of shapes allowed in a leaf; bounded by the `u16` count in
/// `LinearBVHNode`.
const MAX_LEAF_PRIMITIVES: usize = u16::MAX as usize;

/// Recursively build the BVH structure for the Middle, EqualCounts or SAH
/// algorithm.
///
/// * `split_method`      - Middle|EqualCounts|SAH
/// * `max_prims_in_node` - Maximum number of shapes in the node.
/// * `primitive_info`    - Shape information.
/// * `start`             - Starting index. For first call it should be 0.
/// * `end`               - Ending index + 1. For first call it should be number
///                         of shapes.
/// * `total_nodes`       - Used to return total number of nodes.
/// * `ordered_prims`     - Used to return a list of shape indices ordered such
///                         that shapes in leaf nodes occupy contiguous ranges.
pub fn build(
    split_method: SplitMethod,
    max_prims_in_node: usize,
    primitive_info: &mut [BVHPrimitiveInfo],
    start: usize,
    end: usize,
    total_nodes: &mut usize,
    ordered_prims: &mut Vec<usize>,
) -> Box<BVHBuildNode> {
    *total_nodes += 1;

    // Compute bounds of all shapes in BVH node.
    let bounds = primitive_info[start..end]
        .iter()
        .fold(Bounds3f::empty(), |b, info| b.union(&info.bounds));

    let n_primitives = end - start;
    let mut dim = 0;

    let interior_midpoint = if n_primitives == 1 {
        None
    } else {
        // Compute bound of shape centroids, choose split dimension dim.
        let centroid_bounds = primitive_info[start..end]
            .iter()
            .fold(Bounds3f::empty(), |b, info| b.union_point(&info.centroid));
        dim = centroid_bounds.maximum_extent();

        if centroid_bounds.p_max[dim] == centroid_bounds.p_min[dim] {
            // All centroids coincide. Split by count only if the leaf would be
            // too large to store.
            if n_primitives > MAX_LEAF_PRIMITIVES {
                Some(split_equal_counts(primitive_info, start, end, dim))
            } else {
                None
            }
        } else {
            match split_method {
                SplitMethod::Middle => Some(split_middle(primitive_info, start, end, dim, &centroid_bounds)),
                SplitMethod::EqualCounts => Some(split_equal_counts(primitive_info, start, end, dim)),
                SplitMethod::SAH => split_sah(
                    primitive_info,
                    start,
                    end,
                    dim,
                    &centroid_bounds,
                    &bounds,
                    max_prims_in_node,
                ),
            }
        }
    };

    match interior_midpoint {
        Some(mid) => {
            let c0 = build(
                split_method,
                max_prims_in_node,
                primitive_info,
                start,
                mid,
                total_nodes,
                ordered_prims,
            );
            let c1 = build(
                split_method,
                max_prims_in_node,
                primitive_info,
                mid,
                end,
                total_nodes,
                ordered_prims,
            );
            Box::new(BVHBuildNode::new_interior_node(dim, c0, c1))
        }
        None => {
            let first_prim_offset = ordered_prims.len();
            ordered_prims.extend(primitive_info[start..end].iter().map(|info| info.primitive_number));
            Box::new(BVHBuildNode::Leaf {
                bounds,
                first_prim_offset,
                n_primitives,
            })
        }
    }
}

/// Reorder `v` so that all elements satisfying `pred` come first. Returns
/// the number of such elements.
///
/// * `v`    - Slice to partition.
/// * `pred` - Predicate.
fn partition<T, F: Fn(&T) -> bool>(v: &mut [T], pred: F) -> usize {
    let mut split = 0;
    for i in 0..v.len() {
        if pred(&v[i]) {
            v.swap(i, split);
            split += 1;
        }
    }
    split
}

/// Split at the midpoint of the centroid bounds along `dim`.
///
/// * `primitive_info`  - Vector containing all shape info.
/// * `start`           - Starting index in primitive_info.
/// * `end`             - Ending index + 1 in primitive_info.
/// * `dim`             - Axis used to partition shapes.
/// * `centroid_bounds` - Bounding box of shape centroids in primitive_info
///                       from start to end.
fn split_middle(
    primitive_info: &mut [BVHPrimitiveInfo],
    start: usize,
    end: usize,
    dim: usize,
    centroid_bounds: &Bounds3f,
) -> usize {
    let pmid = (centroid_bounds.p_min[dim] + centroid_bounds.p_max[dim]) / 2.0;
    let mid = start + partition(&mut primitive_info[start..end], |pi| pi.centroid[dim] < pmid);

    if mid != start && mid != end {
        mid
    } else {
        // Lots of shapes with large overlapping bounding boxes may fail to
        // partition; fall back to EqualCounts.
        split_equal_counts(primitive_info, start, end, dim)
    }
}

/// Partition shapes into equally sized subsets along `dim`.
///
/// * `primitive_info` - Vector containing all shape info.
/// * `start`          - Starting index in primitive_info.
/// * `end`            - Ending index + 1 in primitive_info.
/// * `dim`            - Axis used to partition shapes.
fn split_equal_counts(primitive_info: &mut [BVHPrimitiveInfo], start: usize, end: usize, dim: usize) -> usize {
    let mid = (start + end) / 2;
    primitive_info[start..end].select_nth_unstable_by(mid - start, |a, b| {
        a.centroid[dim].partial_cmp(&b.centroid[dim]).unwrap_or(Ordering::Equal)
    });
    mid
}

/// Returns the SAH bucket of a centroid.
///
/// * `centroid_bounds` - Bounding box of the centroids.
/// * `centroid`        - The centroid.
/// * `dim`             - Split axis.
#[inline]
fn bucket_index(centroid_bounds: &Bounds3f, centroid: &Point3f, dim: usize) -> usize {
    let b = (N_BUCKETS as Float * centroid_bounds.offset(centroid)[dim]) as usize;
    min(b, N_BUCKETS - 1)
}

/// Partition shapes using Surface Area Heuristic.
///
/// Returns the pivot index for interior node creation if splitting is
/// cheaper than a leaf; otherwise `None` to indicate leaf node creation.
///
/// * `primitive_info`    - Vector containing all shape info.
/// * `start`             - Start index in primitive_info.
/// * `end`               - End index in primitive_info.
/// * `dim`               - Axis used to partition shapes.
/// * `centroid_bounds`   - Bounding box of shape centroids.
/// * `bounds`            - Bound box of all shapes in BVH node.
/// * `max_prims_in_node` - Maximum shapes allowed in node.
fn split_sah(
    primitive_info: &mut [BVHPrimitiveInfo],
    start: usize,
    end: usize,
    dim: usize,
    centroid_bounds: &Bounds3f,
    bounds: &Bounds3f,
    max_prims_in_node: usize,
) -> Option<usize> {
    let n_primitives = end - start;
    if n_primitives <= 2 {
        return Some(split_equal_counts(primitive_info, start, end, dim));
    }

    // Initialize BucketInfo for SAH partition buckets.
    let mut buckets = [BucketInfo::default(); N_BUCKETS];
    for info in primitive_info[start..end].iter() {
        let b = bucket_index(centroid_bounds, &info.centroid, dim);
        buckets[b].count += 1;
        buckets[b].bounds = buckets[b].bounds.union(&info.bounds);
    }

    // Compute costs for splitting after each bucket.
    let mut cost = [0.0 as Float; N_BUCKETS - 1];
    for (i, cost_i) in cost.iter_mut().enumerate() {
        let (mut b0, mut b1) = (Bounds3f::empty(), Bounds3f::empty());
        let (mut count0, mut count1) = (0, 0);

        for bucket in buckets.iter().take(i + 1) {
            b0 = b0.union(&bucket.bounds);
            count0 += bucket.count;
        }
        for bucket in buckets.iter().skip(i + 1) {
            b1 = b1.union(&bucket.bounds);
            count1 += bucket.count;
        }

        let area = |b: &Bounds3f| if b.is_empty() { 0.0 } else { b.surface_area() };
        *cost_i = 1.0 + (count0 as Float * area(&b0) + count1 as Float * area(&b1)) / bounds.surface_area();
    }

    // Find bucket to split at that minimizes SAH metric.
    let (min_cost_split_bucket, min_cost) = cost
        .iter()
        .enumerate()
        .fold((0, cost[0]), |(bi, bc), (i, c)| if *c < bc { (i, *c) } else { (bi, bc) });

    // Either create leaf or split shapes at selected SAH bucket.
    let leaf_cost = n_primitives as Float;
    if n_primitives > max_prims_in_node || min_cost < leaf_cost {
        let mid = start
            + partition(&mut primitive_info[start..end], |pi| {
                bucket_index(centroid_bounds, &pi.centroid, dim) <= min_cost_split_bucket
            });
        if mid == start || mid == end {
            Some(split_equal_counts(primitive_info, start, end, dim))
        } else {
            Some(mid)
        }
    } else {
        None
    }
}
