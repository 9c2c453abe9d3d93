//! Bounding Volume Hierarchy.

use tessera_core::aggregate::*;
use tessera_core::geometry::*;
use tessera_core::paramset::*;
use tessera_core::scene::ShapeId;
use tessera_core::shape::*;

mod common;
mod sah;

pub use common::*;

/// Depth of the traversal stack.
const MAX_TRAVERSAL_DEPTH: usize = 64;

/// Bounding Volume Hierarchy Accelerator over the scene shapes.
#[derive(Clone)]
pub struct BVHAccel {
    /// Shape indices ordered so that each leaf covers a contiguous range.
    pub primitives: Vec<usize>,

    /// Maximum number of shapes in a leaf.
    pub max_prims_in_node: usize,

    /// Spliting method.
    pub split_method: SplitMethod,

    /// The list of nodes.
    pub nodes: Vec<LinearBVHNode>,
}

impl BVHAccel {
    /// Create a new Bounding Volume Hierarchy Accelerator.
    ///
    /// * `shapes`            - The scene shapes.
    /// * `max_prims_in_node` - Maximum number of shapes in a node.
    /// * `split_method`      - The splitting method.
    pub fn new(shapes: &[Shape], max_prims_in_node: usize, split_method: SplitMethod) -> Self {
        let max_prims_in_node = max_prims_in_node.clamp(1, 255);
        let n_primitives = shapes.len();
        if n_primitives == 0 {
            return Self {
                primitives: vec![],
                max_prims_in_node,
                split_method,
                nodes: vec![],
            };
        }

        // Initialize primitive_info array for shapes.
        let mut primitive_info: Vec<BVHPrimitiveInfo> = shapes
            .iter()
            .enumerate()
            .map(|(i, s)| BVHPrimitiveInfo::new(i, s.kind.bounds()))
            .collect();

        // Build BVH tree for shapes using `primitive_info`.
        let mut total_nodes = 0;
        let mut ordered_prims = Vec::with_capacity(n_primitives);
        let root = sah::build(
            split_method,
            max_prims_in_node,
            &mut primitive_info,
            0,
            n_primitives,
            &mut total_nodes,
            &mut ordered_prims,
        );

        info!(
            "BVH created with {} nodes for {} shapes ({:.2} MB)",
            total_nodes,
            n_primitives,
            (total_nodes * std::mem::size_of::<LinearBVHNode>()) as f32 / (1024.0 * 1024.0),
        );

        // Compute representation of depth-first traversal of BVH tree.
        let mut nodes = vec![LinearBVHNode::default(); total_nodes];
        let mut offset = 0_u32;
        Self::flatten_bvh_tree(&root, &mut nodes, &mut offset);
        debug_assert!(total_nodes == offset as usize);

        Self {
            primitives: ordered_prims,
            max_prims_in_node,
            split_method,
            nodes,
        }
    }

    /// Flatten the tree to the linear representation.
    ///
    /// * `node`   - The node.
    /// * `nodes`  - The linear nodes.
    /// * `offset` - Tracks current offset into `nodes`.
    fn flatten_bvh_tree(node: &BVHBuildNode, nodes: &mut Vec<LinearBVHNode>, offset: &mut u32) -> u32 {
        let my_offset = *offset;
        *offset += 1;

        match node {
            BVHBuildNode::Leaf {
                bounds,
                first_prim_offset,
                n_primitives,
            } => {
                nodes[my_offset as usize] =
                    LinearBVHNode::new_leaf_node(*bounds, *first_prim_offset as u32, *n_primitives as u16);
            }
            BVHBuildNode::Interior {
                bounds,
                children,
                split_axis,
            } => {
                // The first child immediately follows its parent.
                Self::flatten_bvh_tree(&children[0], nodes, offset);
                let second_child_offset = Self::flatten_bvh_tree(&children[1], nodes, offset);
                nodes[my_offset as usize] =
                    LinearBVHNode::new_interior_node(*bounds, second_child_offset, *split_axis as u8);
            }
        }

        my_offset
    }

    /// Visit the leaves whose bounds the ray overlaps, front to back along
    /// the split axes. The visitor receives the ray, which it may shorten, and
    /// a shape index; returning `true` stops the traversal.
    ///
    /// * `ray`   - The ray.
    /// * `visit` - Leaf shape visitor.
    fn traverse<F: FnMut(&mut Ray, usize) -> bool>(&self, ray: &mut Ray, mut visit: F) {
        if self.nodes.is_empty() {
            return;
        }

        let dir_is_neg = [ray.inv_d.x < 0.0, ray.inv_d.y < 0.0, ray.inv_d.z < 0.0];
        let (mut to_visit_offset, mut current_node_index) = (0, 0);
        let mut nodes_to_visit = [0_usize; MAX_TRAVERSAL_DEPTH];

        loop {
            let node = &self.nodes[current_node_index];
            if node.bounds.intersect_p(ray).is_some() {
                if node.n_primitives > 0 {
                    // Intersect ray with shapes in leaf BVH node.
                    for i in 0..node.n_primitives as usize {
                        if visit(ray, self.primitives[node.offset as usize + i]) {
                            return;
                        }
                    }
                    if to_visit_offset == 0 {
                        break;
                    }
                    to_visit_offset -= 1;
                    current_node_index = nodes_to_visit[to_visit_offset];
                } else if to_visit_offset + 1 >= MAX_TRAVERSAL_DEPTH {
                    warn!("BVH traversal stack overflow; tree is too deep");
                    break;
                } else {
                    // Put far BVH node on nodes_to_visit stack, advance to near node.
                    if dir_is_neg[node.axis as usize] {
                        nodes_to_visit[to_visit_offset] = current_node_index + 1;
                        current_node_index = node.offset as usize;
                    } else {
                        nodes_to_visit[to_visit_offset] = node.offset as usize;
                        current_node_index += 1;
                    }
                    to_visit_offset += 1;
                }
            } else {
                if to_visit_offset == 0 {
                    break;
                }
                to_visit_offset -= 1;
                current_node_index = nodes_to_visit[to_visit_offset];
            }
        }
    }
}

impl Aggregate for BVHAccel {
    /// Returns a bounding box in the world space.
    fn bounds(&self) -> Bounds3f {
        self.nodes.first().map_or(Bounds3f::empty(), |n| n.bounds)
    }

    /// Returns the nearest hit.
    ///
    /// * `shapes` - The scene shapes.
    /// * `ray`    - The ray.
    fn intersect(&self, shapes: &[Shape], ray: &Ray) -> Option<(ShapeId, ShapeHit)> {
        let mut r = *ray;
        let mut nearest = None;
        self.traverse(&mut r, |r, i| {
            if let Some(hit) = shapes[i].kind.intersect(r) {
                r.t_max = hit.t;
                nearest = Some((ShapeId::from(i), hit));
            }
            false
        });
        nearest
    }

    /// Returns `true` if anything is hit.
    ///
    /// * `shapes` - The scene shapes.
    /// * `ray`    - The ray.
    fn intersect_p(&self, shapes: &[Shape], ray: &Ray) -> bool {
        let mut r = *ray;
        let mut hit = false;
        self.traverse(&mut r, |r, i| {
            hit = shapes[i].kind.intersect_p(r);
            hit
        });
        hit
    }

    fn name(&self) -> &'static str {
        "bvh"
    }
}

impl From<(&ParamSet, &[Shape])> for BVHAccel {
    /// Create a `BVHAccel` from given parameter set and shapes.
    ///
    /// * `p` - Tuple containing the parameter set and shapes.
    fn from(p: (&ParamSet, &[Shape])) -> Self {
        let (params, shapes) = p;
        let split_method_name = params.find_one_string("splitmethod", String::from("sah"));
        let split_method = match &split_method_name[..] {
            "sah" => SplitMethod::SAH,
            "middle" => SplitMethod::Middle,
            "equal" => SplitMethod::EqualCounts,
            sm => {
                warn!("BVH split method '{}' unknown.  Using 'sah'.", sm);
                SplitMethod::SAH
            }
        };

        let max_prims_in_node = params.find_one_int("maxnodeprims", 4).max(1) as usize;
        Self::new(shapes, max_prims_in_node, split_method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;
    use tessera_core::base::*;

    fn sphere_grid(n: usize) -> Vec<Shape> {
        let mut shapes = vec![];
        for i in 0..n {
            let x = (i % 10) as Float * 3.0;
            let y = (i / 10) as Float * 3.0;
            shapes.push(Shape::new(ShapeKind::Sphere(Sphere::new(Point3f::new(x, y, 10.0), 1.0))));
        }
        shapes
    }

    #[test]
    fn empty_bvh_misses() {
        let bvh = BVHAccel::new(&[], 4, SplitMethod::SAH);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0));
        assert!(bvh.intersect(&[], &ray).is_none());
        assert!(!bvh.intersect_p(&[], &ray));
        assert!(bvh.bounds().is_empty());
    }

    #[test]
    fn finds_nearest_of_stacked_spheres() {
        let shapes: Vec<Shape> = (0..20)
            .map(|i| {
                let z = 5.0 + 3.0 * (19 - i) as Float;
                Shape::new(ShapeKind::Sphere(Sphere::new(Point3f::new(0.0, 0.0, z), 1.0)))
            })
            .collect();
        let bvh = BVHAccel::new(&shapes, 2, SplitMethod::SAH);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0));
        let (id, hit) = bvh.intersect(&shapes, &ray).unwrap();
        assert_eq!(id, ShapeId(19));
        assert!(approx_eq!(Float, hit.t, 4.0, epsilon = 1e-4));
    }

    #[test]
    fn bounds_cover_all_shapes() {
        let shapes = sphere_grid(30);
        let bvh = BVHAccel::new(&shapes, 4, SplitMethod::Middle);
        let b = bvh.bounds();
        assert!(approx_eq!(Float, b.p_min.x, -1.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, b.p_max.x, 28.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, b.p_max.y, 7.0, epsilon = 1e-5));
    }

    #[test]
    fn unknown_split_method_falls_back_to_sah() {
        let params = ParamSet::new().with_string("splitmethod", String::from("hlbvh"));
        let shapes = sphere_grid(5);
        let bvh = BVHAccel::from((&params, &shapes[..]));
        assert_eq!(bvh.split_method, SplitMethod::SAH);
    }

    proptest! {
        #[test]
        fn agrees_with_linear_search(
            n in 1..60_usize,
            ox in -5.0..30.0 as Float,
            oy in -5.0..20.0 as Float,
            dx in -0.5..0.5 as Float,
            dy in -0.5..0.5 as Float,
            method in 0..3_usize,
        ) {
            let shapes = sphere_grid(n);
            let split = [SplitMethod::SAH, SplitMethod::Middle, SplitMethod::EqualCounts][method];
            let bvh = BVHAccel::new(&shapes, 3, split);
            let linear = LinearAggregate::new(&shapes);
            let ray = Ray::new(Point3f::new(ox, oy, 0.0), Vector3f::new(dx, dy, 1.0).normalize());

            let a = bvh.intersect(&shapes, &ray);
            let b = linear.intersect(&shapes, &ray);
            prop_assert_eq!(a.is_some(), b.is_some());
            if let (Some((_, ha)), Some((_, hb))) = (a, b) {
                prop_assert!((ha.t - hb.t).abs() < 1e-4);
            }
            prop_assert_eq!(bvh.intersect_p(&shapes, &ray), linear.intersect_p(&shapes, &ray));
        }
    }
}
