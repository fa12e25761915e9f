//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared [`Hittable`] children. Every node stores the box
//! of its two children, computed once at construction. Traversal rejects a
//! node whose box the ray misses, and tests the right child only up to the
//! closest hit found on the left.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::hittable::{HitRecord, HittableList};
use crate::{Hittable, Ray, SceneError, SceneResult};
use ember_math::{Aabb, Interval};
use rand::{Rng, RngCore};

/// Counters collected during one traversal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes whose box the ray hit, so their children were tested
    pub nodes_entered: usize,
    /// Nodes skipped because their box missed the current interval
    pub nodes_pruned: usize,
}

/// Interior node of the hierarchy.
///
/// A single-object range puts the same child on both sides; traversal tests
/// it once.
pub struct BvhNode {
    left: Arc<Hittable>,
    right: Arc<Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a hierarchy over `objects`, with boxes taken over
    /// `[time0, time1]`.
    ///
    /// The split axis of every node is drawn from `rng`, so the tree shape
    /// (not the hits it reports) depends on the seed.
    pub fn new(
        objects: Vec<Arc<Hittable>>,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> SceneResult<Self> {
        if objects.is_empty() {
            return Err(SceneError::EmptyScene);
        }

        let mut items = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| match object.bounding_box(time0, time1) {
                Some(bbox) => Ok((bbox, object)),
                None => Err(SceneError::UnboundedPrimitive {
                    index,
                    time0,
                    time1,
                }),
            })
            .collect::<SceneResult<Vec<_>>>()?;

        let node = Self::build(&mut items, rng);
        log::debug!(
            "Built BVH over {} objects, depth {}",
            items.len(),
            node.depth()
        );

        Ok(node)
    }

    /// Node over exactly two children, in the given order.
    pub fn from_pair(
        left: Arc<Hittable>,
        right: Arc<Hittable>,
        time0: f32,
        time1: f32,
    ) -> SceneResult<Self> {
        let unbounded = |index| SceneError::UnboundedPrimitive {
            index,
            time0,
            time1,
        };
        let left_box = left.bounding_box(time0, time1).ok_or_else(|| unbounded(0))?;
        let right_box = right.bounding_box(time0, time1).ok_or_else(|| unbounded(1))?;

        Ok(Self {
            left,
            right,
            bbox: Aabb::surrounding(&left_box, &right_box),
        })
    }

    fn build(items: &mut [(Aabb, Arc<Hittable>)], rng: &mut dyn RngCore) -> Self {
        let axis = rng.gen_range(0..3);
        let compare = |a: &(Aabb, Arc<Hittable>), b: &(Aabb, Arc<Hittable>)| -> Ordering {
            a.0.axis_interval(axis)
                .min
                .total_cmp(&b.0.axis_interval(axis).min)
        };

        match items {
            [] => unreachable!("BvhNode::new rejects empty input"),
            [(bbox, object)] => Self {
                left: object.clone(),
                right: object.clone(),
                bbox: *bbox,
            },
            [first, second] => {
                let (left, right) = if compare(first, second) == Ordering::Greater {
                    (second, first)
                } else {
                    (first, second)
                };
                Self {
                    left: left.1.clone(),
                    right: right.1.clone(),
                    bbox: Aabb::surrounding(&left.0, &right.0),
                }
            }
            _ => {
                items.sort_by(compare);
                let mid = items.len() / 2;
                let (left_items, right_items) = items.split_at_mut(mid);

                let left = Self::build(left_items, rng);
                let right = Self::build(right_items, rng);
                let bbox = Aabb::surrounding(&left.bbox, &right.bbox);

                Self {
                    left: Hittable::Bvh(left).shared(),
                    right: Hittable::Bvh(right).shared(),
                    bbox,
                }
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    pub fn left(&self) -> &Arc<Hittable> {
        &self.left
    }

    pub fn right(&self) -> &Arc<Hittable> {
        &self.right
    }

    /// Number of node levels below and including this one.
    pub fn depth(&self) -> usize {
        let child_depth = |child: &Hittable| match child {
            Hittable::Bvh(node) => node.depth(),
            _ => 0,
        };
        1 + child_depth(&self.left).max(child_depth(&self.right))
    }

    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let mut stats = TraversalStats::default();
        self.hit_with_stats(ray, ray_t, rng, &mut stats)
    }

    /// Same as [`BvhNode::hit`], counting every node entered or pruned in
    /// this subtree.
    pub fn hit_with_stats<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
        stats: &mut TraversalStats,
    ) -> Option<HitRecord<'a>> {
        if !self.bbox.hit(ray, ray_t) {
            stats.nodes_pruned += 1;
            return None;
        }
        stats.nodes_entered += 1;

        let hit_left = Self::hit_child(&self.left, ray, ray_t, rng, stats);
        if Arc::ptr_eq(&self.left, &self.right) {
            return hit_left;
        }

        // Only check right up to closest hit
        let right_max = hit_left.map_or(ray_t.max, |rec| rec.t);
        let hit_right = Self::hit_child(&self.right, ray, ray_t.with_max(right_max), rng, stats);

        hit_right.or(hit_left)
    }

    fn hit_child<'a>(
        child: &'a Hittable,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
        stats: &mut TraversalStats,
    ) -> Option<HitRecord<'a>> {
        match child {
            Hittable::Bvh(node) => node.hit_with_stats(ray, ray_t, rng, stats),
            other => other.hit(ray, ray_t, rng),
        }
    }
}

/// Scene root for a list of objects: a BVH over them, or the (empty) list
/// itself when there is nothing to build a hierarchy from.
pub fn build_world(
    list: HittableList,
    time0: f32,
    time1: f32,
    rng: &mut dyn RngCore,
) -> SceneResult<Hittable> {
    if list.is_empty() {
        log::warn!("Scene has no objects, every ray will see the background");
        return Ok(Hittable::List(list));
    }

    let node = BvhNode::new(list.into_objects(), time0, time1, rng)?;
    Ok(Hittable::Bvh(node))
}
