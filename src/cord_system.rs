/// Which way `x × y` points, for anything that emits triangle winding.
///
/// The only observable effect of this choice is face winding in generated
/// meshes (`BBox::to_mesh`, `DiscreteMesher::generate_mesh`): left-handed
/// output swaps the second and third index of every emitted triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CordSystem {
    #[default]
    RightHanded,
    LeftHanded,
}

impl CordSystem {
    /// Reorders a triangle's last two indices to match handedness, given a
    /// triangle authored under the right-handed convention.
    #[inline]
    pub fn orient<T: Copy>(self, a: T, b: T, c: T) -> (T, T, T) {
        match self {
            CordSystem::RightHanded => (a, b, c),
            CordSystem::LeftHanded => (a, c, b),
        }
    }
}
