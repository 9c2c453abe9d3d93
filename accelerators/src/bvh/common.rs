//! BVH Common

use tessera_core::geometry::*;

/// Splitting method to use to subdivide shapes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SplitMethod {
    /// Surface Area Heuristic.
    SAH,

    /// Splitting planes at the midpoint of each region of space.
    Middle,

    /// Partition shapes into equally sized subsets such that the first half
    /// of the shapes have smallest centroid coordinate values along the chosen
    /// axis, and second have the largest centroid coordinate values.
    EqualCounts,
}

/// SAH bucket information.
#[derive(Copy, Clone, Debug, Default)]
pub struct BucketInfo {
    /// Count of shapes.
    pub count: usize,

    /// Bounding box for the bucket.
    pub bounds: Bounds3f,
}

/// Stores information about a shape.
#[derive(Copy, Clone, Debug)]
pub struct BVHPrimitiveInfo {
    /// Index into the scene shapes.
    pub primitive_number: usize,

    /// The bounding box of the shape.
    pub bounds: Bounds3f,

    /// The centroid of the bounding box.
    pub centroid: Point3f,
}

impl BVHPrimitiveInfo {
    /// Create a `BVHPrimitiveInfo`.
    ///
    /// * `primitive_number` - Index into the scene shapes.
    /// * `bounds`           - The bounding box of the shape.
    pub fn new(primitive_number: usize, bounds: Bounds3f) -> Self {
        Self {
            primitive_number,
            bounds,
            centroid: bounds.centroid(),
        }
    }
}

/// A node of the Bounding Volume Hierarchy while it is being built.
pub enum BVHBuildNode {
    Leaf {
        /// Bounding box of the shapes.
        bounds: Bounds3f,

        /// Index of the first shape in the ordered shape list.
        first_prim_offset: usize,

        /// Number of shapes.
        n_primitives: usize,
    },
    Interior {
        /// Bounding box of both children.
        bounds: Bounds3f,

        /// Children of this node.
        children: [Box<BVHBuildNode>; 2],

        /// Coordinate axis along which shapes are partitioned.
        split_axis: usize,
    },
}

impl BVHBuildNode {
    /// Allocates an interior BVH node.
    ///
    /// * `axis` - Axis used for partitioning children.
    /// * `c0`   - First child.
    /// * `c1`   - Second child.
    pub fn new_interior_node(axis: usize, c0: Box<BVHBuildNode>, c1: Box<BVHBuildNode>) -> Self {
        Self::Interior {
            bounds: c0.bounds().union(&c1.bounds()),
            children: [c0, c1],
            split_axis: axis,
        }
    }

    /// Returns the bounding box.
    pub fn bounds(&self) -> Bounds3f {
        match self {
            Self::Leaf { bounds, .. } => *bounds,
            Self::Interior { bounds, .. } => *bounds,
        }
    }
}

/// Stores information needed to traverse the BVH.
#[derive(Copy, Clone, Debug, Default)]
pub struct LinearBVHNode {
    /// Bounding box for the node.
    pub bounds: Bounds3f,

    /// For leaf nodes, offset for the shapes in the node. For interior nodes,
    /// offset to the second child.
    pub offset: u32,

    /// For leaf nodes, the number of shapes in the node. For interior nodes, 0.
    pub n_primitives: u16,

    /// For interior nodes, which coordinate axis was used for partitioning.
    pub axis: u8,
}

impl LinearBVHNode {
    /// Creates a leaf linear bvh node.
    ///
    /// * `bounds`       - Bounding box for the node.
    /// * `offset`       - Offset for shapes in the node.
    /// * `n_primitives` - Number of shapes in the node.
    pub fn new_leaf_node(bounds: Bounds3f, offset: u32, n_primitives: u16) -> Self {
        Self {
            bounds,
            offset,
            n_primitives,
            axis: 0,
        }
    }

    /// Creates an interior linear bvh node.
    ///
    /// * `bounds` - Bounding box for the node.
    /// * `offset` - Offset to the second child.
    /// * `axis`   - Axis used for partitioning.
    pub fn new_interior_node(bounds: Bounds3f, offset: u32, axis: u8) -> Self {
        Self {
            bounds,
            offset,
            axis,
            n_primitives: 0,
        }
    }
}
