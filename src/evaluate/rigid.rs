//! Rigid-body transform evaluation
//!
//! Every rigid entity is dispatched through its [`RigidCategory`], which names a
//! [`TransformPolicy`]: the easing weight, the motion style and any extra mesh
//! layers that must follow the entity (the ribbons and bow of a gift box).

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

use crate::math::easing::eased_progress;
use crate::population::{OrnamentKind, RigidEntity};

/// Instanced mesh layers, one instance buffer each
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshLayer {
    LeafBlock,
    GiftBox,
    RibbonH,
    RibbonV,
    Bow,
    Ball,
    Star,
    Bauble,
    Heart,
    RedCube,
    SilverBauble,
    SilverStar,
    TopStar,
}

impl MeshLayer {
    pub const COUNT: usize = 13;

    pub const ALL: [MeshLayer; Self::COUNT] = [
        MeshLayer::LeafBlock,
        MeshLayer::GiftBox,
        MeshLayer::RibbonH,
        MeshLayer::RibbonV,
        MeshLayer::Bow,
        MeshLayer::Ball,
        MeshLayer::Star,
        MeshLayer::Bauble,
        MeshLayer::Heart,
        MeshLayer::RedCube,
        MeshLayer::SilverBauble,
        MeshLayer::SilverStar,
        MeshLayer::TopStar,
    ];

    /// Dense index into per-layer tables
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            MeshLayer::LeafBlock => "leaf_block",
            MeshLayer::GiftBox => "gift_box",
            MeshLayer::RibbonH => "ribbon_h",
            MeshLayer::RibbonV => "ribbon_v",
            MeshLayer::Bow => "bow",
            MeshLayer::Ball => "ball",
            MeshLayer::Star => "star",
            MeshLayer::Bauble => "bauble",
            MeshLayer::Heart => "heart",
            MeshLayer::RedCube => "red_cube",
            MeshLayer::SilverBauble => "silver_bauble",
            MeshLayer::SilverStar => "silver_star",
            MeshLayer::TopStar => "top_star",
        }
    }
}

/// How an entity moves on top of the scatter/target interpolation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionStyle {
    /// Ornaments: spin that slows on arrival, sway and wind once assembled
    Tumble,
    /// Leaf blocks: slow drift while scattered, gentle rocking once assembled
    Drift,
    /// Top star: constant spin, wobble and pulse
    Beacon,
}

/// Extra mesh layer that copies an entity's transform
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attachment {
    pub layer: MeshLayer,
    /// Offset in the entity's rotated but unscaled frame
    pub local_offset: Vec3,
}

const GIFT_ATTACHMENTS: [Attachment; 3] = [
    Attachment { layer: MeshLayer::RibbonH, local_offset: Vec3::ZERO },
    Attachment { layer: MeshLayer::RibbonV, local_offset: Vec3::ZERO },
    Attachment { layer: MeshLayer::Bow, local_offset: Vec3::new(0.0, 0.5, 0.0) },
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformPolicy {
    /// Easing exponent applied to progress
    pub weight: f32,
    pub motion: MotionStyle,
    /// Layer of the base mesh
    pub layer: MeshLayer,
    pub attachments: &'static [Attachment],
}

/// Rigid entity category
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RigidCategory {
    LeafBlock,
    Ornament(OrnamentKind),
    TopStar,
}

impl RigidCategory {
    pub fn policy(self) -> TransformPolicy {
        match self {
            RigidCategory::LeafBlock => TransformPolicy {
                weight: 1.3,
                motion: MotionStyle::Drift,
                layer: MeshLayer::LeafBlock,
                attachments: &[],
            },
            RigidCategory::Ornament(kind) => TransformPolicy {
                weight: kind.weight(),
                motion: MotionStyle::Tumble,
                layer: kind.layer(),
                attachments: if kind == OrnamentKind::Gift { &GIFT_ATTACHMENTS } else { &[] },
            },
            RigidCategory::TopStar => TransformPolicy {
                weight: 0.5,
                motion: MotionStyle::Beacon,
                layer: MeshLayer::TopStar,
                attachments: &[],
            },
        }
    }
}

/// Rotation from Euler angles applied in X, Y, Z order
pub fn euler_xyz(angles: Vec3) -> Quat {
    Quat::from_rotation_x(angles.x) * Quat::from_rotation_y(angles.y) * Quat::from_rotation_z(angles.z)
}

/// Evaluated transform of one entity
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl RigidPose {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.position)
    }

    /// Pose of an attachment: same rotation and scale, offset in the local frame
    pub fn attached(&self, local_offset: Vec3) -> RigidPose {
        RigidPose {
            position: self.position + self.rotation * local_offset,
            ..*self
        }
    }
}

/// Evaluate one entity at `time` with its population's smoothed `progress`
pub fn evaluate_pose(entity: &RigidEntity, time: f32, progress: f32) -> RigidPose {
    let policy = entity.category.policy();
    let eased = eased_progress(progress, policy.weight);
    let id = entity.id as f32;
    let r = entity.rotation;
    let t = time;
    let p = progress;

    match policy.motion {
        MotionStyle::Tumble => {
            let wind = Vec3::new(
                (t * 0.5 + entity.target.y * 0.3).sin() * 0.05 * p,
                0.0,
                (t * 0.4 + entity.target.y * 0.2).cos() * 0.05 * p,
            );
            let position = entity.scatter.lerp(entity.target + wind, eased);
            let spin = (1.0 - eased) * 0.5 + 0.05;
            let sway = (t * 0.3 + id).sin() * 0.1 * p;
            let angles = Vec3::new(
                r.x + t * spin + sway,
                r.y + t * spin * 1.1,
                r.z + t * spin * 0.9 + sway,
            );
            RigidPose { position, rotation: euler_xyz(angles), scale: entity.scale }
        }
        MotionStyle::Drift => {
            let position = entity.scatter.lerp(entity.target, eased);
            let angles = Vec3::new(
                r.x + t * 0.15 * (1.0 - p) + (t * 0.5 + id).sin() * 0.1 * p,
                r.y + t * 0.1 * (1.0 - p),
                r.z + (t * 0.4 + id).cos() * 0.05 * p,
            );
            RigidPose { position, rotation: euler_xyz(angles), scale: entity.scale }
        }
        MotionStyle::Beacon => {
            let position = entity.scatter.lerp(entity.target, eased);
            let angles = Vec3::new(0.0, t * 1.2, (t * 1.5).sin() * 0.15);
            let pulse = 0.85 + (t * 4.0).sin() * 0.15;
            RigidPose { position, rotation: euler_xyz(angles), scale: entity.scale * pulse }
        }
    }
}

/// Per-instance model matrix (must match the instance attributes in `mesh.wgsl`)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl InstanceRaw {
    pub fn from_matrix(m: Mat4) -> Self {
        Self { model: m.to_cols_array_2d() }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

impl Default for InstanceRaw {
    fn default() -> Self {
        Self::from_matrix(Mat4::IDENTITY)
    }
}

/// Destination for evaluated instances.
///
/// `slots` returns `None` when a layer has no backing storage this frame;
/// writers then skip that layer and carry on with the others.
pub trait InstanceSink {
    fn slots(&mut self, layer: MeshLayer) -> Option<&mut [InstanceRaw]>;
}

/// Running per-layer write cursor
#[derive(Debug, Default)]
pub struct LayerCursor {
    next: [usize; MeshLayer::COUNT],
}

impl LayerCursor {
    /// Instances written to `layer` so far
    pub fn count(&self, layer: MeshLayer) -> usize {
        self.next[layer.index()]
    }

    fn write(&mut self, sink: &mut dyn InstanceSink, layer: MeshLayer, instance: InstanceRaw) -> bool {
        let idx = self.next[layer.index()];
        let Some(slots) = sink.slots(layer) else {
            log::trace!("no instance storage for {}, skipped", layer.label());
            return false;
        };
        let Some(slot) = slots.get_mut(idx) else {
            log::trace!("{} instance {} out of range, skipped", layer.label(), idx);
            return false;
        };
        *slot = instance;
        self.next[layer.index()] += 1;
        true
    }
}

/// Evaluate `entities` and write their base and attachment instances.
///
/// Returns the number of instances written.
pub fn write_instances(
    entities: &[RigidEntity],
    time: f32,
    progress: f32,
    sink: &mut dyn InstanceSink,
    cursor: &mut LayerCursor,
) -> usize {
    let mut written = 0;
    for entity in entities {
        let policy = entity.category.policy();
        let pose = evaluate_pose(entity, time, progress);
        if cursor.write(sink, policy.layer, InstanceRaw::from_matrix(pose.matrix())) {
            written += 1;
        }
        for attachment in policy.attachments {
            let attached = pose.attached(attachment.local_offset);
            if cursor.write(sink, attachment.layer, InstanceRaw::from_matrix(attached.matrix())) {
                written += 1;
            }
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Sink backed by plain vectors; absent layers have no storage
    struct VecSink(HashMap<MeshLayer, Vec<InstanceRaw>>);

    impl VecSink {
        fn with(layers: &[(MeshLayer, usize)]) -> Self {
            Self(layers.iter().map(|&(l, n)| (l, vec![InstanceRaw::default(); n])).collect())
        }
    }

    impl InstanceSink for VecSink {
        fn slots(&mut self, layer: MeshLayer) -> Option<&mut [InstanceRaw]> {
            self.0.get_mut(&layer).map(|v| v.as_mut_slice())
        }
    }

    fn gift() -> RigidEntity {
        RigidEntity {
            id: 3,
            category: RigidCategory::Ornament(OrnamentKind::Gift),
            scatter: Vec3::new(6.0, -2.0, 3.0),
            target: Vec3::new(1.0, 0.5, -1.0),
            rotation: Vec3::new(0.3, 1.2, 2.0),
            scale: 0.38,
        }
    }

    fn translation(m: Mat4) -> Vec3 {
        m.w_axis.truncate()
    }

    #[test]
    fn test_instance_size() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 64);
    }

    #[test]
    fn test_layer_indices_are_dense() {
        for (i, layer) in MeshLayer::ALL.iter().enumerate() {
            assert_eq!(layer.index(), i);
        }
    }

    #[test]
    fn test_endpoints() {
        let e = gift();
        let start = evaluate_pose(&e, 0.0, 0.0);
        assert!((start.position - e.scatter).length() < 1e-6);

        let end = evaluate_pose(&e, 0.0, 1.0);
        let wind = Vec3::new((e.target.y * 0.3).sin() * 0.05, 0.0, (e.target.y * 0.2).cos() * 0.05);
        assert!((end.position - (e.target + wind)).length() < 1e-6);
    }

    #[test]
    fn test_euler_order_matches_xyz() {
        let angles = Vec3::new(0.4, -0.7, 1.1);
        let q = euler_xyz(angles);
        let expected = Mat4::from_rotation_x(angles.x) * Mat4::from_rotation_y(angles.y) * Mat4::from_rotation_z(angles.z);
        let v = Vec3::new(0.3, 0.5, -0.2);
        assert!((q * v - expected.transform_vector3(v)).length() < 1e-5);
    }

    #[test]
    fn test_bow_offset_in_local_frame() {
        let e = gift();
        for (i, p) in [0.0f32, 0.25, 0.5, 0.9, 1.0].iter().enumerate() {
            let time = i as f32 * 1.37;
            let mut sink = VecSink::with(&[
                (MeshLayer::GiftBox, 1),
                (MeshLayer::RibbonH, 1),
                (MeshLayer::RibbonV, 1),
                (MeshLayer::Bow, 1),
            ]);
            let mut cursor = LayerCursor::default();
            let written = write_instances(&[e], time, *p, &mut sink, &mut cursor);
            assert_eq!(written, 4);

            let pose = evaluate_pose(&e, time, *p);
            let box_m = sink.0[&MeshLayer::GiftBox][0].matrix();
            let bow_m = sink.0[&MeshLayer::Bow][0].matrix();
            let delta = translation(bow_m) - translation(box_m);
            assert!((delta - pose.rotation * Vec3::new(0.0, 0.5, 0.0)).length() < 1e-5);
            // In the box's local frame the offset is straight up, shrunk by the box scale
            let local = box_m.inverse().transform_point3(translation(bow_m));
            assert!((local - Vec3::new(0.0, 0.5 / e.scale, 0.0)).length() < 1e-3);

            assert_eq!(sink.0[&MeshLayer::RibbonH][0], sink.0[&MeshLayer::GiftBox][0]);
            assert_eq!(sink.0[&MeshLayer::RibbonV][0], sink.0[&MeshLayer::GiftBox][0]);
        }
    }

    #[test]
    fn test_missing_layer_leaves_others_written() {
        let mut sink = VecSink::with(&[(MeshLayer::GiftBox, 1), (MeshLayer::RibbonH, 1), (MeshLayer::RibbonV, 1)]);
        let mut cursor = LayerCursor::default();
        let written = write_instances(&[gift()], 2.0, 0.5, &mut sink, &mut cursor);
        assert_eq!(written, 3);
        assert_eq!(cursor.count(MeshLayer::Bow), 0);
        assert_ne!(sink.0[&MeshLayer::GiftBox][0], InstanceRaw::default());
        assert_ne!(sink.0[&MeshLayer::RibbonV][0], InstanceRaw::default());
    }

    #[test]
    fn test_overflow_is_skipped() {
        let mut sink = VecSink::with(&[(MeshLayer::LeafBlock, 1)]);
        let block = RigidEntity { category: RigidCategory::LeafBlock, ..gift() };
        let mut cursor = LayerCursor::default();
        assert_eq!(write_instances(&[block, block], 0.0, 0.0, &mut sink, &mut cursor), 1);
    }

    #[test]
    fn test_spin_slows_on_arrival() {
        let e = RigidEntity { rotation: Vec3::ZERO, ..gift() };
        // At p = 1 the tumble rate bottoms out at 0.05 rad/s
        let a = evaluate_pose(&e, 10.0, 1.0).rotation;
        let b = evaluate_pose(&e, 10.1, 1.0).rotation;
        let c = evaluate_pose(&e, 10.0, 0.0).rotation;
        let d = evaluate_pose(&e, 10.1, 0.0).rotation;
        assert!(a.angle_between(b) < c.angle_between(d));
    }

    #[test]
    fn test_beacon_pulse_and_weight() {
        let star = RigidEntity {
            id: 0,
            category: RigidCategory::TopStar,
            scatter: Vec3::new(3.0, 3.0, 3.0),
            target: Vec3::new(0.0, 4.5, 0.0),
            rotation: Vec3::ZERO,
            scale: 0.7,
        };
        for i in 0..50 {
            let pose = evaluate_pose(&star, i as f32 * 0.1, 0.25);
            assert!(pose.scale >= 0.7 * 0.7 - 1e-5 && pose.scale <= 0.7 + 1e-5);
        }
        // Weight 0.5: a quarter of the progress covers half the distance
        let pose = evaluate_pose(&star, 0.0, 0.25);
        let expected = star.scatter.lerp(star.target, 0.5);
        assert!((pose.position - expected).length() < 1e-5);
    }

    #[test]
    fn test_policies() {
        assert_eq!(RigidCategory::LeafBlock.policy().weight, 1.3);
        assert_eq!(RigidCategory::TopStar.policy().motion, MotionStyle::Beacon);
        let gift = RigidCategory::Ornament(OrnamentKind::Gift).policy();
        assert_eq!(gift.attachments.len(), 3);
        assert!(RigidCategory::Ornament(OrnamentKind::Ball).policy().attachments.is_empty());
    }
}
